//! Domain errors for the cluster registry.

use thiserror::Error;

/// Errors that can occur while serving a registry operation.
///
/// Every variant is per-request; none of them is fatal to the process.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The requested cluster name (or id) is not in the store.
    #[error("Object not found: {0}")]
    NotFound(String),

    /// A create or update collided with an existing cluster name or filer id.
    #[error("Constraint violation: {0}")]
    Conflict(String),

    /// The credential gate did not authorize the caller. Wrong credentials
    /// and an unreachable cluster both end up here.
    #[error("Authentication failure")]
    AccessDenied,

    /// The caller asked for the bypass read from an origin that is not the
    /// service's own gateway.
    #[error("Untrusted origin: {0}")]
    UntrustedOrigin(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The cache collaborator could not be reached.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

impl RegistryError {
    /// HTTP status code the routing layer should answer with.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::AccessDenied | Self::UntrustedOrigin(_) => 401,
            Self::ValidationFailed(_) => 422,
            Self::DatabaseError(_) | Self::SerializationError(_) | Self::CacheUnavailable(_) => 500,
        }
    }

    /// Message safe to hand back to a caller.
    ///
    /// Not-found and access errors deliberately carry no detail so the caller
    /// cannot tell a bad password from an unreachable cluster.
    pub fn public_detail(&self) -> String {
        match self {
            Self::NotFound(_) => "Object not found".to_string(),
            Self::AccessDenied | Self::UntrustedOrigin(_) => "Authentication failure".to_string(),
            Self::Conflict(msg) => format!("Constraint violation: {msg}"),
            Self::ValidationFailed(msg) => msg.clone(),
            Self::DatabaseError(_) | Self::SerializationError(_) | Self::CacheUnavailable(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl From<sqlx::Error> for RegistryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::Conflict(db_err.message().to_string());
            }
        }
        Self::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RegistryError::NotFound("c1".into()).status_code(), 404);
        assert_eq!(RegistryError::Conflict("dup".into()).status_code(), 409);
        assert_eq!(RegistryError::AccessDenied.status_code(), 401);
        assert_eq!(RegistryError::UntrustedOrigin("10.0.0.9".into()).status_code(), 401);
        assert_eq!(RegistryError::DatabaseError("x".into()).status_code(), 500);
    }

    #[test]
    fn test_public_detail_hides_internals() {
        let err = RegistryError::NotFound("secret-cluster".into());
        assert_eq!(err.public_detail(), "Object not found");

        let err = RegistryError::UntrustedOrigin("10.1.2.3".into());
        assert!(!err.public_detail().contains("10.1.2.3"));

        let err = RegistryError::DatabaseError("disk I/O error at /var/lib".into());
        assert!(!err.public_detail().contains("/var/lib"));
    }
}
