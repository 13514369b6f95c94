use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::models::AccessVerdict;

/// Errors from a single call to the cluster REST API
#[derive(Error, Debug)]
pub enum GateError {
    /// The cluster answered with something other than 200
    #[error("Cluster returned HTTP {0}")]
    Status(StatusCode),

    /// TCP or TLS connection could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// The cluster address does not form a valid URL
    #[error("Invalid cluster address: {0}")]
    InvalidAddress(String),

    /// No response within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// The login response did not carry a bearer token
    #[error("Login response has no bearer_token")]
    MissingToken,
}

impl GateError {
    /// Map a failed login call onto the gate verdict.
    ///
    /// Only a 4xx from the cluster means the credentials were rejected;
    /// everything else means the cluster could not vouch for them.
    pub fn verdict(&self) -> AccessVerdict {
        match self {
            Self::Status(status) if status.is_client_error() => AccessVerdict::Unauthorized,
            _ => AccessVerdict::Unreachable,
        }
    }
}

impl From<reqwest::Error> for GateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::InvalidAddress(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status)
        } else {
            Self::Connection(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_unauthorized() {
        assert_eq!(GateError::Status(StatusCode::UNAUTHORIZED).verdict(), AccessVerdict::Unauthorized);
        assert_eq!(GateError::Status(StatusCode::FORBIDDEN).verdict(), AccessVerdict::Unauthorized);
        assert_eq!(GateError::Status(StatusCode::NOT_FOUND).verdict(), AccessVerdict::Unauthorized);
    }

    #[test]
    fn test_everything_else_is_unreachable() {
        assert_eq!(
            GateError::Status(StatusCode::INTERNAL_SERVER_ERROR).verdict(),
            AccessVerdict::Unreachable
        );
        assert_eq!(GateError::Status(StatusCode::CREATED).verdict(), AccessVerdict::Unreachable);
        assert_eq!(GateError::Timeout.verdict(), AccessVerdict::Unreachable);
        assert_eq!(GateError::Connection("refused".into()).verdict(), AccessVerdict::Unreachable);
        assert_eq!(GateError::InvalidAddress("bad".into()).verdict(), AccessVerdict::Unreachable);
    }
}
