//! The root of the lowered model.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;
use smol_str::SmolStr;

use crate::base::Dialect;
use crate::policy::RoutePolicy;

use super::DEFAULT_VRF;
use super::acl::{ExtendedAccessList, StandardAccessList};
use super::interface::Interface;
use super::interface_name::canonicalize_interface_name;
use super::lists::{AsPathAccessList, ExpandedCommunityList, PrefixList, StandardCommunityList};
use super::management::Management;
use super::object_group::{CryptoMap, NetworkObjectGroup, ServiceObjectGroup};
use super::route_map::RouteMap;
use super::sets::{AsPathSet, CommunitySet, PrefixSet};
use super::vrf::Vrf;

/// Everything lowered from one device configuration.
///
/// Maps keep definition order. The default VRF exists from construction
/// onward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    pub hostname: Option<String>,
    pub dialect: Dialect,
    pub vrfs: IndexMap<SmolStr, Vrf>,
    pub interfaces: IndexMap<SmolStr, Interface>,
    pub standard_access_lists: IndexMap<SmolStr, StandardAccessList>,
    pub extended_access_lists: IndexMap<SmolStr, ExtendedAccessList>,
    pub ipv6_access_lists: IndexMap<SmolStr, ExtendedAccessList>,
    pub prefix_lists: IndexMap<SmolStr, PrefixList>,
    pub prefix6_lists: IndexMap<SmolStr, PrefixList>,
    pub standard_community_lists: IndexMap<SmolStr, StandardCommunityList>,
    pub expanded_community_lists: IndexMap<SmolStr, ExpandedCommunityList>,
    pub as_path_access_lists: IndexMap<SmolStr, AsPathAccessList>,
    pub route_maps: IndexMap<SmolStr, RouteMap>,
    pub route_policies: IndexMap<SmolStr, RoutePolicy>,
    pub prefix_sets: IndexMap<SmolStr, PrefixSet>,
    pub community_sets: IndexMap<SmolStr, CommunitySet>,
    pub as_path_sets: IndexMap<SmolStr, AsPathSet>,
    pub network_object_groups: IndexMap<SmolStr, NetworkObjectGroup>,
    pub service_object_groups: IndexMap<SmolStr, ServiceObjectGroup>,
    pub crypto_maps: IndexMap<SmolStr, CryptoMap>,
    pub management: Management,
    /// Whether any input line went unrecognized.
    pub unrecognized: bool,
    pub unimplemented_features: BTreeSet<String>,
}

impl Configuration {
    pub fn new(dialect: Dialect) -> Self {
        let mut vrfs = IndexMap::new();
        vrfs.insert(SmolStr::new(DEFAULT_VRF), Vrf::new(DEFAULT_VRF));
        Self {
            hostname: None,
            dialect,
            vrfs,
            interfaces: IndexMap::new(),
            standard_access_lists: IndexMap::new(),
            extended_access_lists: IndexMap::new(),
            ipv6_access_lists: IndexMap::new(),
            prefix_lists: IndexMap::new(),
            prefix6_lists: IndexMap::new(),
            standard_community_lists: IndexMap::new(),
            expanded_community_lists: IndexMap::new(),
            as_path_access_lists: IndexMap::new(),
            route_maps: IndexMap::new(),
            route_policies: IndexMap::new(),
            prefix_sets: IndexMap::new(),
            community_sets: IndexMap::new(),
            as_path_sets: IndexMap::new(),
            network_object_groups: IndexMap::new(),
            service_object_groups: IndexMap::new(),
            crypto_maps: IndexMap::new(),
            management: Management::default(),
            unrecognized: false,
            unimplemented_features: BTreeSet::new(),
        }
    }

    pub fn default_vrf(&self) -> Option<&Vrf> {
        self.vrfs.get(DEFAULT_VRF)
    }

    /// The VRF named `name`, creating it if absent.
    pub fn vrf_mut(&mut self, name: &str) -> &mut Vrf {
        self.vrfs
            .entry(SmolStr::new(name))
            .or_insert_with(|| Vrf::new(name))
    }

    /// Look up an interface by any spelling of its name.
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces
            .get(name)
            .or_else(|| self.interfaces.get(canonicalize_interface_name(name).as_str()))
    }

    /// The interface named `name` (already canonical), creating it with
    /// dialect defaults if absent. The flag is `true` when it was created.
    pub fn interface_mut(&mut self, name: &str) -> (&mut Interface, bool) {
        let dialect = self.dialect;
        let created = !self.interfaces.contains_key(name);
        let iface = self
            .interfaces
            .entry(SmolStr::new(name))
            .or_insert_with(|| Interface::new(name, dialect));
        (iface, created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vrf_exists() {
        let config = Configuration::new(Dialect::Ios);
        assert!(config.default_vrf().is_some());
        assert_eq!(config.vrfs.len(), 1);
    }

    #[test]
    fn test_vrf_lookup_or_create() {
        let mut config = Configuration::new(Dialect::Ios);
        config.vrf_mut("RED").route_distinguisher = Some("65000:1".into());
        config.vrf_mut("RED");
        assert_eq!(config.vrfs.len(), 2);
        assert_eq!(config.vrfs["RED"].route_distinguisher.as_deref(), Some("65000:1"));
    }

    #[test]
    fn test_interface_lookup_or_create() {
        let mut config = Configuration::new(Dialect::Ios);
        let (_, created) = config.interface_mut("Ethernet0/1");
        assert!(created);
        let (iface, created) = config.interface_mut("Ethernet0/1");
        assert!(!created);
        iface.mtu = 9000;
        assert_eq!(config.interfaces.len(), 1);
    }
}
