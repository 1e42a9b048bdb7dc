//! Object groups and crypto maps.

use std::collections::BTreeMap;

use ipnetwork::IpNetwork;
use serde::Serialize;
use smol_str::SmolStr;

use crate::base::SubRange;

use super::types::IpWildcard;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkObject {
    Host(std::net::IpAddr),
    Network(IpNetwork),
    Wildcard(IpWildcard),
    Range {
        start: std::net::IpAddr,
        end: std::net::IpAddr,
    },
    Group(SmolStr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkObjectGroup {
    pub name: SmolStr,
    pub description: Option<String>,
    pub objects: Vec<NetworkObject>,
}

impl NetworkObjectGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            description: None,
            objects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceObject {
    Protocol(u8),
    Ports {
        protocol: u8,
        source: Vec<SubRange>,
        destination: Vec<SubRange>,
    },
    Icmp(Option<u8>),
    Group(SmolStr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceObjectGroup {
    pub name: SmolStr,
    pub description: Option<String>,
    pub objects: Vec<ServiceObject>,
}

impl ServiceObjectGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            description: None,
            objects: Vec::new(),
        }
    }
}

// ============================================================================
// CRYPTO MAPS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CryptoMapEntry {
    pub match_address: Option<SmolStr>,
    pub peers: Vec<std::net::IpAddr>,
    pub transform_sets: Vec<SmolStr>,
    pub isakmp_profile: Option<SmolStr>,
    pub dynamic_map: Option<SmolStr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CryptoMap {
    pub name: SmolStr,
    pub entries: BTreeMap<u32, CryptoMapEntry>,
}

impl CryptoMap {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            entries: BTreeMap::new(),
        }
    }
}
