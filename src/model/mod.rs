//! Vendor-neutral configuration model.
//!
//! One typed container per configuration category, all owned by
//! [`Configuration`]. Every type serializes with serde so a lowered model
//! can be snapshotted and compared with [`structural_diff`].

mod acl;
mod bgp;
mod configuration;
mod diff;
mod igp;
mod interface;
mod interface_name;
mod lists;
mod management;
mod object_group;
mod ospf;
mod route_map;
mod sets;
mod static_route;
mod types;
mod vrf;

/// Name of the VRF every configuration starts with.
pub const DEFAULT_VRF: &str = "default";

pub use acl::{
    AddressSpec, ExtendedAccessList, ExtendedAccessListLine, StandardAccessList,
    StandardAccessListLine, dscp_value, icmp_type, named_port, port_ranges, protocol_number,
};
pub use bgp::{
    BgpAggregate, BgpNetwork, BgpPeerGroup, BgpProcess, InheritanceIssue, PeerKey, PeerKind,
    SendCommunity,
};
pub use configuration::Configuration;
pub use diff::{Difference, structural_diff, structurally_equal};
pub use igp::{EigrpProcess, IsisProcess, RedistributionMap, Redistribution, RipProcess};
pub use interface::{
    Interface, InterfaceIsis, InterfaceOspf, Switchport, SwitchportMode, TrunkEncapsulation,
};
pub use interface_name::{canonical_prefix, canonicalize_interface_name, expand_interface_range};
pub use lists::{
    AsPathAccessList, AsPathAccessListLine, ExpandedCommunityList, ExpandedCommunityListLine,
    PrefixList, PrefixListLine, StandardCommunityList, StandardCommunityListLine,
    is_expanded_community_list_number,
};
pub use management::{
    Aaa, AaaLoginList, Line, Logging, Management, Ntp, NtpServer, Snmp, SnmpCommunity, Tacacs,
};
pub use object_group::{
    CryptoMap, CryptoMapEntry, NetworkObject, NetworkObjectGroup, ServiceObject,
    ServiceObjectGroup,
};
pub use ospf::{AreaType, OspfArea, OspfNetwork, OspfNetworkStatement, OspfProcess};
pub use route_map::{MatchLine, RouteMap, RouteMapClause, SetLine};
pub use sets::{AsPathSet, CommunitySet, PrefixSet};
pub use static_route::StaticRoute;
pub use types::{IpWildcard, LineAction, canonical_network, network_from_mask, parse_ipv4_network};
pub use vrf::Vrf;
