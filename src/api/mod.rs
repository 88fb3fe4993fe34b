pub mod error;
pub mod http;
pub mod memory;

use std::fmt;

pub use error::{ApiError, BoxError, FailureKind};
pub use http::HttpApi;
pub use memory::InMemoryApi;

use crate::models::{Registration, RegistrationId};

/// Default collection endpoint
pub const DEFAULT_API_URL: &str = "http://localhost:3000/registrations";

/// Client for the registrations collection resource
/// Every call is a single request; nothing is cached or retried.
/// `create`, `update` and `delete` only report whether the server accepted the change;
/// callers re-fetch the collection themselves.
pub trait RegistrationApi: Send {
    /// Fetch the full collection in server order
    fn list_all(&self) -> Result<Vec<Registration>, ApiError>;

    /// Fetch a single registration
    fn get_one(&self, id: &RegistrationId) -> Result<Registration, ApiError>;

    /// Create a registration (any id on `record` is ignored)
    fn create(&self, record: &Registration) -> Result<(), ApiError>;

    /// Replace the registration with the given id
    fn update(&self, id: &RegistrationId, record: &Registration) -> Result<(), ApiError>;

    /// Remove the registration with the given id
    fn delete(&self, id: &RegistrationId) -> Result<(), ApiError>;

    /// Human-readable endpoint description (for logging)
    fn endpoint(&self) -> String;
}

/// The five collection operations, used to label outcomes and failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Operation::List => "fetching registrations",
            Operation::Get => "fetching registration for edit",
            Operation::Create => "creating registration",
            Operation::Update => "updating registration",
            Operation::Delete => "deleting registration",
        };
        f.write_str(text)
    }
}
