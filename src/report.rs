//! Failure reporting for collection requests
//!
//! Every failed request is handed to an [`ErrorReporter`]. The reporter decides
//! whether the user sees anything; displayed state is never touched on failure.

use serde::Deserialize;

use crate::api::{ApiError, Operation};

/// How failed requests are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log only; the view simply stays stale
    #[default]
    Silent,
    /// Log and show the error in a modal
    Surface,
}

/// Receives every failed request
pub trait ErrorReporter {
    /// Report a failure
    /// Returns a message to show the user, or `None` to stay silent
    fn report(&self, operation: Operation, error: &ApiError) -> Option<String>;
}

/// Writes failures to the diagnostic log and nothing else
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, operation: Operation, error: &ApiError) -> Option<String> {
        log::error!("Error {}: {}", operation, error);
        None
    }
}

/// Logs failures and asks the UI to show them
pub struct SurfaceReporter;

impl ErrorReporter for SurfaceReporter {
    fn report(&self, operation: Operation, error: &ApiError) -> Option<String> {
        log::error!("Error {}: {}", operation, error);
        Some(format!("Error {}:\n{}", operation, error))
    }
}

/// Build the reporter for a configured policy
pub fn reporter_for(policy: ErrorPolicy) -> Box<dyn ErrorReporter> {
    match policy {
        ErrorPolicy::Silent => Box::new(LogReporter),
        ErrorPolicy::Surface => Box::new(SurfaceReporter),
    }
}
