use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Boxed source for transport failures that don't come from reqwest
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors returned by a [`RegistrationApi`](super::RegistrationApi)
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never reached the server or no response came back
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    /// Server answered with a non-success status
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body was not the JSON we expected
    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configured endpoint cannot be used as a collection base
    #[error("Invalid endpoint URL '{0}'")]
    InvalidUrl(String),
}

/// Coarse failure classes, used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Status,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Transport => "network",
            FailureKind::Status => "status",
            FailureKind::Decode => "decode",
        };
        f.write_str(name)
    }
}

impl ApiError {
    pub fn transport(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ApiError::Transport {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Transport { .. } | ApiError::InvalidUrl(_) => FailureKind::Transport,
            ApiError::Status { .. } => FailureKind::Status,
            ApiError::Decode { .. } => FailureKind::Decode,
        }
    }

    /// HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_kinds() {
        let transport = ApiError::transport(
            "http://localhost:3000/registrations",
            io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
        );
        assert_eq!(transport.kind(), FailureKind::Transport);
        assert_eq!(transport.status(), None);
        assert!(transport.to_string().contains("connection refused"));

        let status = ApiError::Status {
            url: "http://localhost:3000/registrations/3".to_string(),
            status: 404,
        };
        assert_eq!(status.kind(), FailureKind::Status);
        assert_eq!(status.status(), Some(404));

        let decode = ApiError::Decode {
            url: "http://localhost:3000/registrations".to_string(),
            source: serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
        };
        assert_eq!(decode.kind(), FailureKind::Decode);
    }
}
