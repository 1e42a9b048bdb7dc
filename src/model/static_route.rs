//! Static routes.

use std::net::IpAddr;

use ipnetwork::IpNetwork;
use serde::Serialize;
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticRoute {
    pub prefix: IpNetwork,
    pub next_hop_ip: Option<IpAddr>,
    /// Canonical interface name.
    pub next_hop_interface: Option<SmolStr>,
    pub distance: u8,
    pub tag: Option<u32>,
    pub name: Option<String>,
    pub permanent: bool,
}

impl StaticRoute {
    pub fn new(prefix: IpNetwork, distance: u8) -> Self {
        Self {
            prefix,
            next_hop_ip: None,
            next_hop_interface: None,
            distance,
            tag: None,
            name: None,
            permanent: false,
        }
    }

    /// Routes to `Null0` discard traffic.
    pub fn is_discard(&self) -> bool {
        self.next_hop_interface
            .as_deref()
            .is_some_and(|i| i.starts_with("Null"))
    }
}
