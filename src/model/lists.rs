//! Prefix lists, community lists and AS-path access lists.

use serde::Serialize;
use smol_str::SmolStr;

use crate::policy::PrefixRange;

use super::types::LineAction;

// ============================================================================
// PREFIX LISTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefixListLine {
    pub sequence: u32,
    pub action: LineAction,
    pub range: PrefixRange,
}

/// `ip prefix-list` or `ipv6 prefix-list`. Lines are kept sorted by
/// sequence number; a repeated sequence number replaces the line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefixList {
    pub name: SmolStr,
    pub ipv6: bool,
    pub description: Option<String>,
    pub lines: Vec<PrefixListLine>,
}

impl PrefixList {
    pub fn new(name: &str, ipv6: bool) -> Self {
        Self {
            name: SmolStr::new(name),
            ipv6,
            description: None,
            lines: Vec::new(),
        }
    }

    /// Sequence number used when a line gives none: 5 past the last.
    pub fn next_sequence(&self) -> u32 {
        self.lines.last().map(|l| l.sequence + 5).unwrap_or(5)
    }

    /// Insert or replace by sequence number. Returns whether a line was
    /// replaced.
    pub fn add_line(&mut self, line: PrefixListLine) -> bool {
        match self
            .lines
            .binary_search_by_key(&line.sequence, |l| l.sequence)
        {
            Ok(i) => {
                self.lines[i] = line;
                true
            }
            Err(i) => {
                self.lines.insert(i, line);
                false
            }
        }
    }
}

// ============================================================================
// COMMUNITY LISTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardCommunityListLine {
    pub action: LineAction,
    /// All of these must be present for the line to match.
    pub communities: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardCommunityList {
    pub name: SmolStr,
    pub lines: Vec<StandardCommunityListLine>,
}

impl StandardCommunityList {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            lines: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandedCommunityListLine {
    pub action: LineAction,
    pub regex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandedCommunityList {
    pub name: SmolStr,
    pub lines: Vec<ExpandedCommunityListLine>,
}

impl ExpandedCommunityList {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            lines: Vec::new(),
        }
    }
}

/// Numbered community lists: 1-99 standard, 100-500 expanded.
pub fn is_expanded_community_list_number(number: u32) -> Option<bool> {
    match number {
        1..=99 => Some(false),
        100..=500 => Some(true),
        _ => None,
    }
}

// ============================================================================
// AS-PATH ACCESS LISTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsPathAccessListLine {
    pub action: LineAction,
    pub regex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsPathAccessList {
    pub name: SmolStr,
    pub lines: Vec<AsPathAccessListLine>,
}

impl AsPathAccessList {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            lines: Vec::new(),
        }
    }
}
