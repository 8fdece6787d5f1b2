//! The string-parsable contract.
//!
//! Path, query and header values arrive as strings. A type can be bound from
//! one of those locations only if it implements [`FromParam`].

use std::fmt;

/// A failure to parse a raw string into a typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamError(String);

impl ParamError {
    /// Creates a parse error with a description.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    /// Returns the description.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParamError {}

/// Types that can be parsed from a single path, query or header string.
///
/// # Implementing `FromParam`
///
/// Any type with a [`FromStr`](std::str::FromStr) implementation can opt in
/// with [`from_param_via_from_str!`](crate::from_param_via_from_str):
///
/// ```rust
/// use heron_extract::{from_param_via_from_str, FromParam};
/// use std::str::FromStr;
///
/// #[derive(Debug, PartialEq)]
/// struct Sku(String);
///
/// impl FromStr for Sku {
///     type Err = String;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.strip_prefix("SKU-")
///             .map(|rest| Sku(rest.to_string()))
///             .ok_or_else(|| format!("'{s}' is not a SKU"))
///     }
/// }
///
/// from_param_via_from_str!(Sku);
///
/// assert_eq!(Sku::from_param("SKU-9").unwrap(), Sku("9".into()));
/// assert!(Sku::from_param("9").is_err());
/// ```
pub trait FromParam: Sized + Send + Sync + 'static {
    /// When `true`, query and header bindings of this type are decided by
    /// presence alone: a present key yields `true` without parsing.
    const PRESENCE_FLAG: bool = false;

    /// Parses a raw string.
    fn from_param(raw: &str) -> Result<Self, ParamError>;

    /// The value a present-but-unparsed key yields. Only consulted when
    /// [`Self::PRESENCE_FLAG`] is set.
    fn present() -> Option<Self> {
        None
    }
}

/// Implements [`FromParam`] for types that implement [`FromStr`](std::str::FromStr).
#[macro_export]
macro_rules! from_param_via_from_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FromParam for $ty {
                fn from_param(raw: &str) -> ::std::result::Result<Self, $crate::ParamError> {
                    raw.parse::<$ty>()
                        .map_err(|e| $crate::ParamError::new(e.to_string()))
                }
            }
        )+
    };
}

from_param_via_from_str!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char
);

impl FromParam for String {
    fn from_param(raw: &str) -> Result<Self, ParamError> {
        Ok(raw.to_string())
    }
}

impl FromParam for bool {
    const PRESENCE_FLAG: bool = true;

    fn from_param(raw: &str) -> Result<Self, ParamError> {
        match raw {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ParamError::new(format!("'{other}' is not a boolean"))),
        }
    }

    fn present() -> Option<Self> {
        Some(true)
    }
}
