//! IS-IS, RIP and EIGRP processes, and the redistribution record all
//! routing processes share.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use ipnetwork::Ipv4Network;
use serde::Serialize;
use smol_str::SmolStr;

use crate::base::RoutingProtocol;
use crate::policy::{IsisLevel, OspfMetricType};

use super::types::IpWildcard;

// ============================================================================
// REDISTRIBUTION
// ============================================================================

/// `redistribute PROTOCOL [...]` under any routing process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Redistribution {
    pub protocol: RoutingProtocol,
    /// Process or AS of the source protocol, when given.
    pub source: Option<SmolStr>,
    pub route_map: Option<SmolStr>,
    pub route_policy: Option<SmolStr>,
    pub metric: Option<u32>,
    pub metric_type: Option<OspfMetricType>,
    pub tag: Option<u32>,
    pub subnets: bool,
    pub level: Option<IsisLevel>,
}

impl Redistribution {
    pub fn new(protocol: RoutingProtocol) -> Self {
        Self {
            protocol,
            source: None,
            route_map: None,
            route_policy: None,
            metric: None,
            metric_type: None,
            tag: None,
            subnets: false,
            level: None,
        }
    }
}

/// Redistribution keyed by source protocol; a later line replaces an
/// earlier one for the same protocol.
pub type RedistributionMap = IndexMap<RoutingProtocol, Redistribution>;

// ============================================================================
// IS-IS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IsisProcess {
    pub tag: SmolStr,
    pub net: Option<String>,
    pub is_type: Option<IsisLevel>,
    pub metric_style: Option<String>,
    pub passive_interfaces: BTreeSet<SmolStr>,
    pub interfaces: BTreeSet<SmolStr>,
    pub summary_addresses: Vec<Ipv4Network>,
    pub redistribution: RedistributionMap,
    pub address_families: BTreeSet<SmolStr>,
}

impl IsisProcess {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: SmolStr::new(tag),
            ..Self::default()
        }
    }
}

// ============================================================================
// RIP
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RipProcess {
    pub version: Option<u8>,
    /// Classful networks as written.
    pub networks: BTreeSet<Ipv4Network>,
    pub passive_interface_default: bool,
    pub passive_interfaces: BTreeSet<SmolStr>,
    pub active_interfaces: BTreeSet<SmolStr>,
    pub redistribution: RedistributionMap,
    pub default_information_originate: bool,
}

// ============================================================================
// EIGRP
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EigrpProcess {
    pub asn: u32,
    pub router_id: Option<std::net::Ipv4Addr>,
    pub networks: Vec<IpWildcard>,
    pub passive_interface_default: bool,
    pub passive_interfaces: BTreeSet<SmolStr>,
    pub active_interfaces: BTreeSet<SmolStr>,
    pub redistribution: RedistributionMap,
}

impl EigrpProcess {
    pub fn new(asn: u32) -> Self {
        Self {
            asn,
            router_id: None,
            networks: Vec::new(),
            passive_interface_default: false,
            passive_interfaces: BTreeSet::new(),
            active_interfaces: BTreeSet::new(),
            redistribution: RedistributionMap::new(),
        }
    }
}
