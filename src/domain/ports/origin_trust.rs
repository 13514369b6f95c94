//! Same-host trust port.

use crate::domain::models::CallerOrigin;

/// Decides whether a caller may use the cache-aware bypass read.
///
/// This is a network-topology trust boundary, not an authentication check:
/// anyone able to originate traffic from the trusted address is trusted.
pub trait OriginTrust: Send + Sync {
    fn is_trusted(&self, origin: &CallerOrigin) -> bool;
}
