//! Structure types, usage kinds and the per-type duplicate policy.

use serde::Serialize;

// ============================================================================
// STRUCTURE TYPES
// ============================================================================

/// Kinds of named, independently referenceable configuration objects.
///
/// A few variants are abstract reference types: a reference of that type is
/// satisfied by a definition of any of its [`concrete_types`].
///
/// [`concrete_types`]: StructureType::concrete_types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureType {
    AaaLoginList,
    AsPathAccessList,
    AsPathSet,
    BgpAfGroup,
    BgpNeighborGroup,
    BgpPeerGroup,
    BgpPeerPolicy,
    BgpPeerSession,
    BgpTemplatePeer,
    CommunityList,
    CommunityListExpanded,
    CommunityListStandard,
    CommunitySet,
    CryptoMap,
    Interface,
    Ipv4AccessList,
    Ipv4AccessListExtended,
    Ipv4AccessListStandard,
    Ipv6AccessList,
    Line,
    NetworkObjectGroup,
    Prefix6List,
    PrefixList,
    PrefixSet,
    RouteMap,
    RoutePolicy,
    ServiceObjectGroup,
    Vrf,
}

/// What a duplicate definition of a structure does to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Later blocks add to the existing object.
    Accumulate,
    /// Warn and lower the later block into a throwaway instance.
    ShadowWithDummy,
    /// Warn and let the later block replace the earlier one.
    ReplaceWithWarning,
}

impl StructureType {
    /// Display name used in diagnostics.
    pub fn display(&self) -> &'static str {
        match self {
            StructureType::AaaLoginList => "aaa authentication login list",
            StructureType::AsPathAccessList => "as-path access-list",
            StructureType::AsPathSet => "as-path-set",
            StructureType::BgpAfGroup => "bgp af-group",
            StructureType::BgpNeighborGroup => "bgp neighbor-group",
            StructureType::BgpPeerGroup => "bgp peer-group",
            StructureType::BgpPeerPolicy => "bgp template peer-policy",
            StructureType::BgpPeerSession => "bgp template peer-session",
            StructureType::BgpTemplatePeer => "bgp template peer",
            StructureType::CommunityList => "community-list",
            StructureType::CommunityListExpanded => "community-list expanded",
            StructureType::CommunityListStandard => "community-list standard",
            StructureType::CommunitySet => "community-set",
            StructureType::CryptoMap => "crypto map",
            StructureType::Interface => "interface",
            StructureType::Ipv4AccessList => "ipv4 access-list",
            StructureType::Ipv4AccessListExtended => "ipv4 access-list extended",
            StructureType::Ipv4AccessListStandard => "ipv4 access-list standard",
            StructureType::Ipv6AccessList => "ipv6 access-list",
            StructureType::Line => "line",
            StructureType::NetworkObjectGroup => "object-group network",
            StructureType::Prefix6List => "ipv6 prefix-list",
            StructureType::PrefixList => "ipv4 prefix-list",
            StructureType::PrefixSet => "prefix-set",
            StructureType::RouteMap => "route-map",
            StructureType::RoutePolicy => "route-policy",
            StructureType::ServiceObjectGroup => "object-group service",
            StructureType::Vrf => "vrf",
        }
    }

    /// Definition types that satisfy a reference of this type.
    pub fn concrete_types(&self) -> &'static [StructureType] {
        match self {
            StructureType::Ipv4AccessList => &[
                StructureType::Ipv4AccessListStandard,
                StructureType::Ipv4AccessListExtended,
            ],
            StructureType::CommunityList => &[
                StructureType::CommunityListStandard,
                StructureType::CommunityListExpanded,
            ],
            _ => &[],
        }
    }

    /// Whether a reference of this type is satisfied by a definition of `def`.
    pub fn is_satisfied_by(&self, def: StructureType) -> bool {
        *self == def || self.concrete_types().contains(&def)
    }

    /// Whether a definition counts as used without any reference.
    ///
    /// Interfaces are active by existing. The AAA login list `default`
    /// applies to every line that names no list.
    pub fn is_implicitly_used(&self, name: &str) -> bool {
        match self {
            StructureType::Interface | StructureType::Line => true,
            StructureType::AaaLoginList => name == "default",
            _ => false,
        }
    }

    /// What a second definition block of the same name does.
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        match self {
            StructureType::NetworkObjectGroup | StructureType::ServiceObjectGroup => {
                DuplicatePolicy::ShadowWithDummy
            }
            StructureType::RoutePolicy
            | StructureType::PrefixSet
            | StructureType::CommunitySet
            | StructureType::AsPathSet => DuplicatePolicy::ReplaceWithWarning,
            _ => DuplicatePolicy::Accumulate,
        }
    }
}

impl std::fmt::Display for StructureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display())
    }
}

// ============================================================================
// STRUCTURE USAGES
// ============================================================================

/// The place a structure is referenced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureUsage {
    // BGP
    BgpAggregateAttributeMap,
    BgpDefaultOriginateRouteMap,
    BgpInheritPeer,
    BgpInheritPeerPolicy,
    BgpInheritPeerSession,
    BgpListenRangePeerGroup,
    BgpNeighborFilterListIn,
    BgpNeighborFilterListOut,
    BgpNeighborPrefixListIn,
    BgpNeighborPrefixListOut,
    BgpNeighborRouteMapIn,
    BgpNeighborRouteMapOut,
    BgpNeighborRoutePolicyIn,
    BgpNeighborRoutePolicyOut,
    BgpNeighborStatement,
    BgpNetworkRouteMap,
    BgpPeerGroupAssignment,
    BgpRedistributeRouteMap,
    BgpUpdateSource,
    BgpUseAfGroup,
    BgpUseNeighborGroup,
    BgpUseSessionGroup,
    // Interface
    InterfaceChannelGroup,
    InterfaceCryptoMap,
    InterfaceIncomingFilter,
    InterfaceIpv6IncomingFilter,
    InterfaceIpv6OutgoingFilter,
    InterfaceOutgoingFilter,
    InterfacePolicyRouteMap,
    InterfaceVrf,
    // IGPs
    EigrpPassiveInterface,
    EigrpRedistributeRouteMap,
    IsisInterface,
    IsisPassiveInterface,
    IsisRedistributeRouteMap,
    OspfAreaInterface,
    OspfDefaultOriginateRouteMap,
    OspfPassiveInterface,
    OspfRedistributeRouteMap,
    RipPassiveInterface,
    RipRedistributeRouteMap,
    // Routing policy
    RouteMapMatchAsPathAccessList,
    RouteMapMatchCommunityList,
    RouteMapMatchInterface,
    RouteMapMatchIpAccessList,
    RouteMapMatchIpPrefixList,
    RouteMapMatchIpv6AccessList,
    RouteMapMatchIpv6PrefixList,
    RouteMapSetCommListDelete,
    RoutePolicyApply,
    RoutePolicyAsPathSet,
    RoutePolicyCommunitySet,
    RoutePolicyPrefixSet,
    // Filters and object groups
    CryptoMapMatchAddress,
    ExtendedAccessListNetworkObjectGroup,
    ExtendedAccessListServiceObjectGroup,
    NetworkObjectGroupGroupObject,
    ServiceObjectGroupGroupObject,
    // Static routes
    StaticRouteInterface,
    // Management plane
    LineAccessClassIn,
    LineAccessClassOut,
    LineIpv6AccessClass,
    LineLoginAuthentication,
    LoggingSourceInterface,
    NtpAccessGroup,
    NtpSourceInterface,
    SnmpCommunityAcl,
    SnmpSourceInterface,
    TacacsSourceInterface,
}

impl StructureUsage {
    /// Display name used in diagnostics.
    pub fn display(&self) -> &'static str {
        match self {
            StructureUsage::BgpAggregateAttributeMap => "bgp aggregate-address attribute-map",
            StructureUsage::BgpDefaultOriginateRouteMap => {
                "bgp neighbor default-originate route-map"
            }
            StructureUsage::BgpInheritPeer => "bgp inherit peer",
            StructureUsage::BgpInheritPeerPolicy => "bgp inherit peer-policy",
            StructureUsage::BgpInheritPeerSession => "bgp inherit peer-session",
            StructureUsage::BgpListenRangePeerGroup => "bgp listen range peer-group",
            StructureUsage::BgpNeighborFilterListIn => "bgp neighbor filter-list in",
            StructureUsage::BgpNeighborFilterListOut => "bgp neighbor filter-list out",
            StructureUsage::BgpNeighborPrefixListIn => "bgp neighbor prefix-list in",
            StructureUsage::BgpNeighborPrefixListOut => "bgp neighbor prefix-list out",
            StructureUsage::BgpNeighborRouteMapIn => "bgp neighbor route-map in",
            StructureUsage::BgpNeighborRouteMapOut => "bgp neighbor route-map out",
            StructureUsage::BgpNeighborRoutePolicyIn => "bgp neighbor route-policy in",
            StructureUsage::BgpNeighborRoutePolicyOut => "bgp neighbor route-policy out",
            StructureUsage::BgpNeighborStatement => "bgp neighbor statement",
            StructureUsage::BgpNetworkRouteMap => "bgp network route-map",
            StructureUsage::BgpPeerGroupAssignment => "bgp neighbor peer-group",
            StructureUsage::BgpRedistributeRouteMap => "bgp redistribute route-map",
            StructureUsage::BgpUpdateSource => "bgp neighbor update-source",
            StructureUsage::BgpUseAfGroup => "bgp use af-group",
            StructureUsage::BgpUseNeighborGroup => "bgp use neighbor-group",
            StructureUsage::BgpUseSessionGroup => "bgp use session-group",
            StructureUsage::InterfaceChannelGroup => "interface channel-group",
            StructureUsage::InterfaceCryptoMap => "interface crypto map",
            StructureUsage::InterfaceIncomingFilter => "interface ip access-group in",
            StructureUsage::InterfaceIpv6IncomingFilter => "interface ipv6 traffic-filter in",
            StructureUsage::InterfaceIpv6OutgoingFilter => "interface ipv6 traffic-filter out",
            StructureUsage::InterfaceOutgoingFilter => "interface ip access-group out",
            StructureUsage::InterfacePolicyRouteMap => "interface ip policy route-map",
            StructureUsage::InterfaceVrf => "interface vrf",
            StructureUsage::EigrpPassiveInterface => "eigrp passive-interface",
            StructureUsage::EigrpRedistributeRouteMap => "eigrp redistribute route-map",
            StructureUsage::IsisInterface => "isis interface",
            StructureUsage::IsisPassiveInterface => "isis passive-interface",
            StructureUsage::IsisRedistributeRouteMap => "isis redistribute route-map",
            StructureUsage::OspfAreaInterface => "ospf area interface",
            StructureUsage::OspfDefaultOriginateRouteMap => "ospf default-information route-map",
            StructureUsage::OspfPassiveInterface => "ospf passive-interface",
            StructureUsage::OspfRedistributeRouteMap => "ospf redistribute route-map",
            StructureUsage::RipPassiveInterface => "rip passive-interface",
            StructureUsage::RipRedistributeRouteMap => "rip redistribute route-map",
            StructureUsage::RouteMapMatchAsPathAccessList => "route-map match as-path",
            StructureUsage::RouteMapMatchCommunityList => "route-map match community",
            StructureUsage::RouteMapMatchInterface => "route-map match interface",
            StructureUsage::RouteMapMatchIpAccessList => "route-map match ip address",
            StructureUsage::RouteMapMatchIpPrefixList => "route-map match ip address prefix-list",
            StructureUsage::RouteMapMatchIpv6AccessList => "route-map match ipv6 address",
            StructureUsage::RouteMapMatchIpv6PrefixList => {
                "route-map match ipv6 address prefix-list"
            }
            StructureUsage::RouteMapSetCommListDelete => "route-map set comm-list delete",
            StructureUsage::RoutePolicyApply => "route-policy apply",
            StructureUsage::RoutePolicyAsPathSet => "route-policy as-path-set",
            StructureUsage::RoutePolicyCommunitySet => "route-policy community-set",
            StructureUsage::RoutePolicyPrefixSet => "route-policy prefix-set",
            StructureUsage::CryptoMapMatchAddress => "crypto map match address",
            StructureUsage::ExtendedAccessListNetworkObjectGroup => {
                "extended access-list network object-group"
            }
            StructureUsage::ExtendedAccessListServiceObjectGroup => {
                "extended access-list service object-group"
            }
            StructureUsage::NetworkObjectGroupGroupObject => "object-group network group-object",
            StructureUsage::ServiceObjectGroupGroupObject => "object-group service group-object",
            StructureUsage::StaticRouteInterface => "static route interface",
            StructureUsage::LineAccessClassIn => "line access-class in",
            StructureUsage::LineAccessClassOut => "line access-class out",
            StructureUsage::LineIpv6AccessClass => "line ipv6 access-class",
            StructureUsage::LineLoginAuthentication => "line login authentication",
            StructureUsage::LoggingSourceInterface => "logging source-interface",
            StructureUsage::NtpAccessGroup => "ntp access-group",
            StructureUsage::NtpSourceInterface => "ntp source-interface",
            StructureUsage::SnmpCommunityAcl => "snmp-server community acl",
            StructureUsage::SnmpSourceInterface => "snmp-server source-interface",
            StructureUsage::TacacsSourceInterface => "tacacs source-interface",
        }
    }
}

impl std::fmt::Display for StructureUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StructureType::Ipv4AccessList, StructureType::Ipv4AccessListStandard, true)]
    #[case(StructureType::Ipv4AccessList, StructureType::Ipv4AccessListExtended, true)]
    #[case(StructureType::Ipv4AccessList, StructureType::Ipv6AccessList, false)]
    #[case(StructureType::CommunityList, StructureType::CommunityListExpanded, true)]
    #[case(StructureType::RouteMap, StructureType::RouteMap, true)]
    #[case(StructureType::Ipv4AccessListStandard, StructureType::Ipv4AccessList, false)]
    fn test_is_satisfied_by(
        #[case] reference: StructureType,
        #[case] definition: StructureType,
        #[case] expected: bool,
    ) {
        assert_eq!(reference.is_satisfied_by(definition), expected);
    }

    #[rstest]
    #[case(StructureType::NetworkObjectGroup, DuplicatePolicy::ShadowWithDummy)]
    #[case(StructureType::RoutePolicy, DuplicatePolicy::ReplaceWithWarning)]
    #[case(StructureType::RouteMap, DuplicatePolicy::Accumulate)]
    #[case(StructureType::Ipv4AccessListExtended, DuplicatePolicy::Accumulate)]
    fn test_duplicate_policy(#[case] ty: StructureType, #[case] expected: DuplicatePolicy) {
        assert_eq!(ty.duplicate_policy(), expected);
    }

    #[test]
    fn test_implicit_use() {
        assert!(StructureType::Interface.is_implicitly_used("Loopback0"));
        assert!(StructureType::AaaLoginList.is_implicitly_used("default"));
        assert!(!StructureType::AaaLoginList.is_implicitly_used("VTY"));
        assert!(!StructureType::RouteMap.is_implicitly_used("default"));
    }
}
