//! Access types consumed by the credential gate and the bypass trust check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Caller-supplied cluster credentials. Transient: never persisted or cached.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AccessCredentials {
    /// Address of the cluster to log in to.
    pub cluster: String,
    pub username: String,
    pub password: String,
}

impl AccessCredentials {
    pub fn new(
        cluster: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            cluster: cluster.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AccessCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredentials")
            .field("cluster", &self.cluster)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Coarse outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessVerdict {
    Authorized,
    Unauthorized,
    Unreachable,
}

impl AccessVerdict {
    pub const fn is_authorized(self) -> bool {
        matches!(self, Self::Authorized)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authorized => "authorized",
            Self::Unauthorized => "unauthorized",
            Self::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for AccessVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network origin of an inbound request as observed by the routing layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerOrigin {
    /// Address of the directly connected peer.
    pub peer: Option<IpAddr>,
    /// Raw `X-Forwarded-For` header value, if any.
    pub forwarded_for: Option<String>,
}

impl CallerOrigin {
    pub const fn from_peer(peer: IpAddr) -> Self {
        Self {
            peer: Some(peer),
            forwarded_for: None,
        }
    }

    pub fn with_forwarded_for(mut self, value: impl Into<String>) -> Self {
        self.forwarded_for = Some(value.into());
        self
    }

    /// The forwarded-for header parsed as a single address.
    ///
    /// A header that lists several hops or does not parse yields `None`.
    pub fn forwarded_ip(&self) -> Option<IpAddr> {
        self.forwarded_for
            .as_deref()
            .map(str::trim)
            .and_then(|value| value.parse().ok())
    }
}

impl fmt::Display for CallerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.peer, &self.forwarded_for) {
            (Some(peer), Some(fwd)) => write!(f, "{peer} (forwarded for {fwd})"),
            (Some(peer), None) => write!(f, "{peer}"),
            (None, Some(fwd)) => write!(f, "unknown (forwarded for {fwd})"),
            (None, None) => f.write_str("unknown"),
        }
    }
}
