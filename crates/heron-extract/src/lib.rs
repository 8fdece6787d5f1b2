//! # Heron Extract
//!
//! Raw request access and the value-decoding contracts of the Heron binding
//! engine.
//!
//! The binding engine never touches a socket. It receives a [`RequestParts`]
//! whose values are already materialized and turns them into typed handler
//! arguments. This crate holds everything on the "raw" side of that
//! conversion:
//!
//! | Item | Role |
//! |------|------|
//! | [`RequestParts`] | Path variables, multi-valued query and headers, raw body |
//! | [`QueryMap`] | Ordered, multi-valued query string |
//! | [`FromParam`] | Contract for types parsable from a single string |
//! | [`ReadFrom`] | Contract for domain objects read from a structured body |
//! | [`FieldFilters`] | `ignore` / `reject` / `require` key filters for body reads |
//! | [`BindingError`] | Request-time binding failures |
//!
//! ## Example
//!
//! ```rust
//! use heron_extract::{FromParam, RequestParts};
//! use http::{HeaderMap, Method, Uri};
//! use bytes::Bytes;
//! use heron_router::Params;
//!
//! let parts = RequestParts::new(
//!     Method::GET,
//!     Uri::from_static("/things?tag=a&tag=b"),
//!     HeaderMap::new(),
//!     Bytes::new(),
//!     Params::new(),
//! );
//!
//! assert_eq!(parts.query_values("tag"), vec!["a", "b"]);
//! assert_eq!(u32::from_param("42").unwrap(), 42);
//! ```

#![doc(html_root_url = "https://docs.rs/heron-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod body;
mod context;
mod error;
mod param;
mod query;
mod read;

pub use body::{materialize_body, BodyError, BodyOptions};
pub use context::{RequestParts, RequestPartsBuilder};
pub use error::BindingError;
pub use param::{FromParam, ParamError};
pub use query::QueryMap;
pub use read::{read_with_serde, FieldFilters, ReadError, ReadFrom};

// Re-export useful types from dependencies
pub use heron_router::{Params, PathVariables};
