//! Lowering context: the scope stacks and "current X" slots.
//!
//! The same command means different things depending on the block it is
//! typed under. Rather than leaning on the walk's call stack, every block
//! that changes meaning pushes an explicit scope on entry and pops it on
//! exit. A pop with nothing pushed is a broken contract and aborts the
//! file.

use serde::Serialize;
use smol_str::SmolStr;

use crate::error::{LowerError, Result};
use crate::model::{DEFAULT_VRF, PeerKey};

// ============================================================================
// SCOPE STACK
// ============================================================================

/// A push/pop stack of active scopes; the top is the active one.
#[derive(Debug, Clone)]
pub struct ScopeStack<T> {
    kind: &'static str,
    stack: Vec<T>,
    pushes: usize,
    pops: usize,
    max_depth: usize,
}

impl<T: std::fmt::Debug> ScopeStack<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            stack: Vec::new(),
            pushes: 0,
            pops: 0,
            max_depth: 0,
        }
    }

    /// Save the current scope and make `scope` active.
    pub fn push(&mut self, scope: T) {
        tracing::debug!(kind = self.kind, depth = self.stack.len() + 1, ?scope, "push scope");
        self.stack.push(scope);
        self.pushes += 1;
        self.max_depth = self.max_depth.max(self.stack.len());
    }

    /// Restore the scope active before the matching push.
    pub fn pop(&mut self, line: u32, block: &'static str) -> Result<T> {
        let scope = self
            .stack
            .pop()
            .ok_or_else(|| LowerError::underflow(line, block))?;
        self.pops += 1;
        tracing::debug!(kind = self.kind, depth = self.stack.len(), ?scope, "pop scope");
        Ok(scope)
    }

    pub fn active(&self) -> Option<&T> {
        self.stack.last()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn pushes(&self) -> usize {
        self.pushes
    }

    pub fn pops(&self) -> usize {
        self.pops
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

// ============================================================================
// PEER SCOPES
// ============================================================================

/// The BGP peer-family member statements currently apply to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerScope {
    Peer { vrf: SmolStr, key: PeerKey },
    /// A construct that is walked but not modeled, such as an unsupported
    /// address family. Every setter is a no-op under it.
    Unsupported,
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Push/pop totals across every scope stack, for balance checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScopeStats {
    pub pushes: usize,
    pub pops: usize,
    pub max_depth: usize,
}

impl ScopeStats {
    pub fn is_balanced(&self) -> bool {
        self.pushes == self.pops
    }
}

/// Mutable walk state for one file.
#[derive(Debug, Clone)]
pub struct LowerContext {
    pub peers: ScopeStack<PeerScope>,
    pub vrfs: ScopeStack<SmolStr>,
    /// Interfaces the current `interface` block applies to.
    pub interfaces: Vec<SmolStr>,
    /// `(route-map, sequence)` of the clause being filled.
    pub route_map_clause: Option<(SmolStr, u32)>,
    /// `(vrf, process id)` of the OSPF process being filled.
    pub ospf_process: Option<(SmolStr, SmolStr)>,
    /// Address family of the BGP block being walked, e.g. `ipv4 unicast`.
    pub address_family: Option<SmolStr>,
}

impl Default for LowerContext {
    fn default() -> Self {
        Self {
            peers: ScopeStack::new("peer"),
            vrfs: ScopeStack::new("vrf"),
            interfaces: Vec::new(),
            route_map_clause: None,
            ospf_process: None,
            address_family: None,
        }
    }
}

impl LowerContext {
    /// VRF of the innermost VRF scope, or the default VRF.
    pub fn current_vrf(&self) -> SmolStr {
        self.vrfs
            .active()
            .cloned()
            .unwrap_or_else(|| SmolStr::new(DEFAULT_VRF))
    }

    pub fn in_unsupported_scope(&self) -> bool {
        matches!(self.peers.active(), Some(PeerScope::Unsupported))
    }

    /// Whether the address family being walked is IPv6.
    pub fn in_ipv6_family(&self) -> bool {
        self.address_family
            .as_deref()
            .is_some_and(|af| af.starts_with("ipv6"))
    }

    pub fn stats(&self) -> ScopeStats {
        ScopeStats {
            pushes: self.peers.pushes() + self.vrfs.pushes(),
            pops: self.peers.pops() + self.vrfs.pops(),
            max_depth: self.peers.max_depth().max(self.vrfs.max_depth()),
        }
    }

    /// Fail when the walk left scopes open.
    pub fn finish(&self) -> Result<ScopeStats> {
        let stats = self.stats();
        if self.peers.depth() != 0 || self.vrfs.depth() != 0 {
            return Err(LowerError::UnbalancedScopes {
                pushes: stats.pushes,
                pops: stats.pops,
            });
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_restores() {
        let mut stack = ScopeStack::new("test");
        stack.push(1);
        stack.push(2);
        assert_eq!(stack.active(), Some(&2));
        assert_eq!(stack.pop(3, "block").unwrap(), 2);
        assert_eq!(stack.active(), Some(&1));
        assert_eq!(stack.max_depth(), 2);
    }

    #[test]
    fn test_pop_empty_is_underflow() {
        let mut stack: ScopeStack<u32> = ScopeStack::new("test");
        assert_eq!(
            stack.pop(9, "router bgp"),
            Err(LowerError::underflow(9, "router bgp"))
        );
    }

    #[test]
    fn test_finish_requires_balance() {
        let mut ctx = LowerContext::default();
        ctx.vrfs.push("RED".into());
        assert_eq!(ctx.current_vrf(), "RED");
        assert!(ctx.finish().is_err());
        ctx.vrfs.pop(1, "vrf").unwrap();
        assert!(ctx.finish().unwrap().is_balanced());
        assert_eq!(ctx.current_vrf(), DEFAULT_VRF);
    }
}
