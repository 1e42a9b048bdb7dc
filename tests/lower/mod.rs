//! Lowering tests
//!
//! Whole-file lowering through the public entry points:
//! - Interfaces and name canonicalization
//! - BGP peers, address families and scope handling
//! - OSPF area assignment
//! - Route maps, access lists and management lines

pub mod tests_bgp;
pub mod tests_filters;
pub mod tests_interfaces;
pub mod tests_management;
pub mod tests_ospf;
pub mod tests_route_maps;
pub mod tests_scopes;
