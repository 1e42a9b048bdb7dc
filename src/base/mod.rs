//! Foundation types for the routecfg front end.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`LineIndex`] - byte offset to 1-based line conversion
//! - [`Dialect`] - numeric scaling and default-value policy per vendor OS
//! - [`SubRange`] and the community / AS number / area id parsers
//!
//! This module has NO dependencies on other routecfg modules.

mod dialect;
mod line_index;
mod values;

pub use dialect::{Dialect, UnknownDialect};
pub use line_index::{LineCol, LineIndex};
pub use values::{
    COMMUNITY_GSHUT, COMMUNITY_INTERNET, COMMUNITY_LOCAL_AS, COMMUNITY_NO_ADVERTISE,
    COMMUNITY_NO_EXPORT, RoutingProtocol, SubRange, community_to_string, parse_area_id, parse_asn,
    parse_community,
};

// Re-export text-size types for convenience
pub use text_size::{self, TextRange, TextSize};
