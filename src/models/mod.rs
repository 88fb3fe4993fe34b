pub mod registration;

pub use registration::{Registration, RegistrationId, Status};
