use std::sync::mpsc::{self, Receiver, Sender};

use crate::api::{ApiError, Operation, RegistrationApi};
use crate::models::{Registration, RegistrationId};

/// Request for the background worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    ListAll,
    GetOne(RegistrationId),
    Create(Registration),
    Update(RegistrationId, Registration),
    Delete(RegistrationId),
}

impl ApiRequest {
    pub fn operation(&self) -> Operation {
        match self {
            ApiRequest::ListAll => Operation::List,
            ApiRequest::GetOne(_) => Operation::Get,
            ApiRequest::Create(_) => Operation::Create,
            ApiRequest::Update(..) => Operation::Update,
            ApiRequest::Delete(_) => Operation::Delete,
        }
    }
}

/// Result of a request, sent back to the UI thread
#[derive(Debug)]
pub enum ApiOutcome {
    Listed(Result<Vec<Registration>, ApiError>),
    Fetched(RegistrationId, Result<Registration, ApiError>),
    Created(Result<(), ApiError>),
    Updated(RegistrationId, Result<(), ApiError>),
    Deleted(RegistrationId, Result<(), ApiError>),
}

fn execute(api: &dyn RegistrationApi, request: ApiRequest) -> ApiOutcome {
    match request {
        ApiRequest::ListAll => ApiOutcome::Listed(api.list_all()),
        ApiRequest::GetOne(id) => {
            let result = api.get_one(&id);
            ApiOutcome::Fetched(id, result)
        }
        ApiRequest::Create(record) => ApiOutcome::Created(api.create(&record)),
        ApiRequest::Update(id, record) => {
            let result = api.update(&id, &record);
            ApiOutcome::Updated(id, result)
        }
        ApiRequest::Delete(id) => {
            let result = api.delete(&id);
            ApiOutcome::Deleted(id, result)
        }
    }
}

/// Background thread that owns the API client
/// Requests run one at a time in the order submitted; nothing is cancelled.
pub struct Worker {
    request_tx: Sender<ApiRequest>,
    outcome_rx: Receiver<ApiOutcome>,
    in_flight: usize,
}

impl Worker {
    /// Spawn the worker thread
    pub fn spawn(api: Box<dyn RegistrationApi>) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<ApiRequest>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<ApiOutcome>();

        std::thread::spawn(move || {
            log::debug!("API worker started for {}", api.endpoint());
            while let Ok(request) = request_rx.recv() {
                log::debug!("API worker: {:?}", request.operation());
                let outcome = execute(api.as_ref(), request);

                if outcome_tx.send(outcome).is_err() {
                    log::debug!("API worker: UI thread disconnected, exiting");
                    break;
                }
            }
            log::debug!("API worker exiting");
        });

        Worker {
            request_tx,
            outcome_rx,
            in_flight: 0,
        }
    }

    /// Queue a request (non-blocking)
    pub fn submit(&mut self, request: ApiRequest) {
        if self.request_tx.send(request).is_ok() {
            self.in_flight += 1;
        } else {
            log::error!("API worker is gone, request dropped");
        }
    }

    /// Next finished outcome, if any (non-blocking)
    pub fn try_next(&mut self) -> Option<ApiOutcome> {
        let outcome = self.outcome_rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }

    /// Wait for the next outcome
    /// Returns None when nothing is in flight or the worker has died.
    pub fn next_blocking(&mut self) -> Option<ApiOutcome> {
        if self.in_flight == 0 {
            return None;
        }
        match self.outcome_rx.recv() {
            Ok(outcome) => {
                self.in_flight -= 1;
                Some(outcome)
            }
            Err(_) => {
                self.in_flight = 0;
                None
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
