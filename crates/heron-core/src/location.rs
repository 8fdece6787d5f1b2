//! Binding locations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The part of a request a binding reads its raw value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingLocation {
    /// Path variables (e.g., `id` in `/things/{id}`)
    Path,
    /// Query string parameters, possibly repeated
    Query,
    /// HTTP headers, possibly repeated
    Header,
    /// The structured request body
    Body,
}

impl BindingLocation {
    /// Returns `true` for locations whose raw value is a list of strings.
    #[must_use]
    pub const fn is_multi_valued(self) -> bool {
        matches!(self, Self::Query | Self::Header)
    }
}

impl fmt::Display for BindingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Header => write!(f, "header"),
            Self::Body => write!(f, "body"),
        }
    }
}
