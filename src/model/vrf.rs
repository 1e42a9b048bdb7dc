//! VRFs and the routing processes they own.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;
use smol_str::SmolStr;

use super::bgp::BgpProcess;
use super::igp::{EigrpProcess, IsisProcess, RipProcess};
use super::ospf::OspfProcess;
use super::static_route::StaticRoute;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vrf {
    pub name: SmolStr,
    pub description: Option<String>,
    pub route_distinguisher: Option<String>,
    pub route_targets_import: BTreeSet<String>,
    pub route_targets_export: BTreeSet<String>,
    pub bgp: Option<BgpProcess>,
    pub ospf: IndexMap<SmolStr, OspfProcess>,
    pub eigrp: IndexMap<u32, EigrpProcess>,
    pub rip: Option<RipProcess>,
    pub isis: IndexMap<SmolStr, IsisProcess>,
    pub static_routes: Vec<StaticRoute>,
}

impl Vrf {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            description: None,
            route_distinguisher: None,
            route_targets_import: BTreeSet::new(),
            route_targets_export: BTreeSet::new(),
            bgp: None,
            ospf: IndexMap::new(),
            eigrp: IndexMap::new(),
            rip: None,
            isis: IndexMap::new(),
            static_routes: Vec::new(),
        }
    }

    /// Add a static route. An identical route is not added twice.
    pub fn add_static_route(&mut self, route: StaticRoute) {
        if !self.static_routes.contains(&route) {
            self.static_routes.push(route);
        }
    }
}
