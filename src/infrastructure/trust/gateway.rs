//! Gateway address resolution for the same-host trust check.
//!
//! Inside a container the host is reachable at the `.1` address of the
//! container's network, so the gateway is inferred from the container's
//! own IPv4 address.

use nix::ifaddrs::getifaddrs;
use std::net::{IpAddr, Ipv4Addr};
use tracing::debug;

/// Source of the gateway address the bypass read trusts.
pub trait GatewayResolver: Send + Sync {
    /// `None` when the gateway cannot be determined.
    fn gateway(&self) -> Option<IpAddr>;
}

/// Replace the last octet of `addr` with `1`.
pub fn infer_gateway(addr: Ipv4Addr) -> Ipv4Addr {
    let [a, b, c, _] = addr.octets();
    Ipv4Addr::new(a, b, c, 1)
}

/// Fixed gateway from configuration.
#[derive(Debug, Clone, Copy)]
pub struct StaticGateway(pub Option<IpAddr>);

impl GatewayResolver for StaticGateway {
    fn gateway(&self) -> Option<IpAddr> {
        self.0
    }
}

/// Gateway inferred from the IPv4 address of a network interface.
///
/// Resolved on every call so an address change on the interface is picked
/// up without a restart.
#[derive(Debug, Clone)]
pub struct InterfaceGateway {
    interface: String,
}

impl InterfaceGateway {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
        }
    }

    fn interface_ipv4(&self) -> Option<Ipv4Addr> {
        let addrs = match getifaddrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!(error = %e, "getifaddrs failed");
                return None;
            }
        };

        addrs
            .filter(|ifaddr| ifaddr.interface_name == self.interface)
            .find_map(|ifaddr| {
                ifaddr
                    .address
                    .as_ref()
                    .and_then(|addr| addr.as_sockaddr_in().map(|sin| Ipv4Addr::from(sin.ip())))
            })
    }
}

impl GatewayResolver for InterfaceGateway {
    fn gateway(&self) -> Option<IpAddr> {
        let gateway = self.interface_ipv4().map(infer_gateway).map(IpAddr::V4);
        if gateway.is_none() {
            debug!(interface = %self.interface, "no IPv4 address on interface, gateway unknown");
        }
        gateway
    }
}
