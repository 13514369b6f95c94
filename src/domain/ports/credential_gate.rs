//! Credential gate port.

use async_trait::async_trait;

use crate::domain::models::{AccessCredentials, AccessVerdict};

/// Checks caller credentials against the cluster they name.
///
/// A gate never fails: network problems are part of the verdict
/// (`Unreachable`). Implementations hold no session state and perform no
/// retries.
#[async_trait]
pub trait CredentialGate: Send + Sync {
    async fn check(&self, credentials: &AccessCredentials) -> AccessVerdict;
}
