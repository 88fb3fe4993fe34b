use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{ApiError, Operation, RegistrationApi};
use crate::models::{Registration, RegistrationId, Status};

const MEMORY_ENDPOINT: &str = "memory://registrations";

/// A request as seen by the in-memory server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Get(RegistrationId),
    Create(Registration),
    Update(RegistrationId, Registration),
    Delete(RegistrationId),
}

#[derive(Debug, Default)]
struct State {
    records: Vec<Registration>,
    next_id: u64,
    calls: Vec<Call>,
    failing: HashSet<Operation>,
}

/// In-memory registrations collection
/// Behaves like the REST collection: numeric ids assigned on create,
/// insertion order preserved, 404 for unknown ids.
/// Clones share the same collection, so one handle can be given to the
/// worker while another inspects state.
#[derive(Debug, Clone)]
pub struct InMemoryApi {
    state: Arc<Mutex<State>>,
}

impl Default for InMemoryApi {
    fn default() -> Self {
        InMemoryApi::new()
    }
}

impl InMemoryApi {
    /// Create an empty collection
    pub fn new() -> Self {
        InMemoryApi {
            state: Arc::new(Mutex::new(State {
                next_id: 1,
                ..State::default()
            })),
        }
    }

    /// Create a collection holding `records`
    /// Records without an id are assigned one in order.
    pub fn with_records(records: Vec<Registration>) -> Self {
        let api = InMemoryApi::new();
        {
            let mut state = api.lock();
            for record in records {
                let id = match record.id.clone() {
                    Some(id) => {
                        if let RegistrationId::Number(n) = id {
                            state.next_id = state.next_id.max(n + 1);
                        }
                        id
                    }
                    None => {
                        let id = RegistrationId::Number(state.next_id);
                        state.next_id += 1;
                        id
                    }
                };
                state.records.push(record.without_id().with_id(id));
            }
        }
        api
    }

    /// Collection used by `--demo`
    pub fn with_sample_data() -> Self {
        InMemoryApi::with_records(vec![
            Registration::new("RustConf", "Conference", "2024-09-10", Status::Registered),
            Registration::new("Async Deep Dive", "Workshop", "2024-05-01", Status::Attended),
            Registration::new("Local Meetup", "Meetup", "2024-03-14", Status::Attended),
            Registration::new("Embedded Summit", "Conference", "2024-11-20", Status::Cancelled),
            Registration::new("Ratatui Office Hours", "Webinar", "2024-06-07", Status::Registered),
            Registration::new("Hack Night", "Social", "2024-07-19", Status::Other("Waitlisted".into())),
            Registration::new("Compiler Reading Group", "Study Group", "2024-08-02", Status::Registered),
            Registration::new("Year-end Retro", "Social", "2024-12-18", Status::Registered),
        ])
    }

    /// Make the next call of `operation` fail with a transport error
    pub fn fail_next(&self, operation: Operation) {
        self.lock().failing.insert(operation);
    }

    /// Snapshot of the stored records
    pub fn records(&self) -> Vec<Registration> {
        self.lock().records.clone()
    }

    /// All calls received so far, oldest first
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call and consume any injected failure for it
    fn begin(&self, operation: Operation, call: Call) -> Result<MutexGuard<'_, State>, ApiError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.failing.remove(&operation) {
            log::debug!("Simulating network failure for {}", operation);
            return Err(ApiError::transport(
                MEMORY_ENDPOINT,
                "simulated network failure",
            ));
        }
        Ok(state)
    }

    fn not_found(id: &RegistrationId) -> ApiError {
        ApiError::Status {
            url: format!("{}/{}", MEMORY_ENDPOINT, id),
            status: 404,
        }
    }
}

impl RegistrationApi for InMemoryApi {
    fn list_all(&self) -> Result<Vec<Registration>, ApiError> {
        let state = self.begin(Operation::List, Call::List)?;
        Ok(state.records.clone())
    }

    fn get_one(&self, id: &RegistrationId) -> Result<Registration, ApiError> {
        let state = self.begin(Operation::Get, Call::Get(id.clone()))?;
        state
            .records
            .iter()
            .find(|r| r.id.as_ref() == Some(id))
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    fn create(&self, record: &Registration) -> Result<(), ApiError> {
        let mut state = self.begin(Operation::Create, Call::Create(record.clone()))?;
        let id = RegistrationId::Number(state.next_id);
        state.next_id += 1;
        state.records.push(record.without_id().with_id(id));
        Ok(())
    }

    fn update(&self, id: &RegistrationId, record: &Registration) -> Result<(), ApiError> {
        let mut state = self.begin(
            Operation::Update,
            Call::Update(id.clone(), record.clone()),
        )?;
        let slot = state
            .records
            .iter_mut()
            .find(|r| r.id.as_ref() == Some(id))
            .ok_or_else(|| Self::not_found(id))?;
        *slot = record.without_id().with_id(id.clone());
        Ok(())
    }

    fn delete(&self, id: &RegistrationId) -> Result<(), ApiError> {
        let mut state = self.begin(Operation::Delete, Call::Delete(id.clone()))?;
        let before = state.records.len();
        state.records.retain(|r| r.id.as_ref() != Some(id));
        if state.records.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    fn endpoint(&self) -> String {
        MEMORY_ENDPOINT.to_string()
    }
}
