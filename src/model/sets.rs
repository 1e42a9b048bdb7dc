//! Named sets used by route-policies.

use serde::Serialize;
use smol_str::SmolStr;

use crate::policy::{AsPathSetElem, CommunitySetElem, PrefixRange};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefixSet {
    pub name: SmolStr,
    pub elements: Vec<PrefixRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunitySet {
    pub name: SmolStr,
    pub elements: Vec<CommunitySetElem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsPathSet {
    pub name: SmolStr,
    pub elements: Vec<AsPathSetElem>,
}

macro_rules! named_set {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                pub fn new(name: &str) -> Self {
                    Self {
                        name: SmolStr::new(name),
                        elements: Vec::new(),
                    }
                }
            }
        )*
    };
}

named_set!(PrefixSet, CommunitySet, AsPathSet);
