//! Same-host trust for the bypass read.
//!
//! A caller is trusted when its direct peer address, or the single address
//! in its `X-Forwarded-For` header, equals the service's gateway. This is a
//! topology-based boundary: any process that can send traffic from the
//! gateway address may read records, credentials included, without logging
//! in to a cluster.

pub mod gateway;

pub use gateway::{infer_gateway, GatewayResolver, InterfaceGateway, StaticGateway};

use tracing::{debug, warn};

use crate::domain::models::{CallerOrigin, TrustConfig};
use crate::domain::ports::OriginTrust;

/// `OriginTrust` that trusts exactly the resolved gateway address.
pub struct GatewayTrust {
    resolver: Box<dyn GatewayResolver>,
}

impl GatewayTrust {
    pub fn new(resolver: impl GatewayResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
        }
    }

    /// Static gateway when configured, interface inference otherwise.
    pub fn from_config(config: &TrustConfig) -> Self {
        match config.gateway {
            Some(addr) => Self::new(StaticGateway(Some(addr))),
            None => Self::new(InterfaceGateway::new(config.interface.clone())),
        }
    }
}

impl OriginTrust for GatewayTrust {
    fn is_trusted(&self, origin: &CallerOrigin) -> bool {
        let Some(gateway) = self.resolver.gateway().map(|ip| ip.to_canonical()) else {
            warn!(%origin, "gateway address unresolved, refusing bypass read");
            return false;
        };

        let peer_matches = origin.peer.map(|ip| ip.to_canonical()) == Some(gateway);
        let forwarded_matches = origin.forwarded_ip().map(|ip| ip.to_canonical()) == Some(gateway);

        debug!(%origin, %gateway, peer_matches, forwarded_matches, "evaluated same-host trust");
        peer_matches || forwarded_matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    fn trust(gateway: &str) -> GatewayTrust {
        GatewayTrust::new(StaticGateway(Some(gateway.parse().unwrap())))
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_peer_equal_to_gateway_is_trusted() {
        assert!(trust("172.18.0.1").is_trusted(&CallerOrigin::from_peer(ip("172.18.0.1"))));
    }

    #[test]
    fn test_ipv4_mapped_peer_is_trusted() {
        assert!(trust("172.18.0.1").is_trusted(&CallerOrigin::from_peer(ip("::ffff:172.18.0.1"))));
    }

    #[test]
    fn test_forwarded_for_equal_to_gateway_is_trusted() {
        let origin = CallerOrigin::from_peer(ip("172.18.0.9")).with_forwarded_for("172.18.0.1");
        assert!(trust("172.18.0.1").is_trusted(&origin));
    }

    #[test]
    fn test_other_origin_is_not_trusted() {
        let origin = CallerOrigin::from_peer(ip("10.9.9.9")).with_forwarded_for("10.9.9.8");
        assert!(!trust("172.18.0.1").is_trusted(&origin));
    }

    #[test]
    fn test_unresolved_gateway_is_never_trusted() {
        let trust = GatewayTrust::new(StaticGateway(None));
        assert!(!trust.is_trusted(&CallerOrigin::from_peer(ip("172.18.0.1"))));
        assert!(!trust.is_trusted(&CallerOrigin::default()));
    }

    #[test]
    fn test_from_config_prefers_static_gateway() {
        let config = TrustConfig {
            interface: "no-such-interface-xyz0".to_string(),
            gateway: Some(ip("192.168.5.1")),
        };
        let trust = GatewayTrust::from_config(&config);
        assert!(trust.is_trusted(&CallerOrigin::from_peer(ip("192.168.5.1"))));
    }
}
