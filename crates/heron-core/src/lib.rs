//! # Heron Core
//!
//! Core types shared by every Heron crate.
//!
//! - [`BindingLocation`] - Where a bound value comes from (path, query, header, body)
//! - [`Scope`] - Access-scope token attached to an operation
//! - [`HeronError`] - Standard error type with HTTP status mapping
//! - [`Response`] - The response type produced by operation handlers

#![doc(html_root_url = "https://docs.rs/heron-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod location;
mod scope;

pub use error::{ErrorCategory, ErrorDetail, ErrorEnvelope, HeronError, HeronResult};
pub use location::BindingLocation;
pub use scope::Scope;

/// HTTP response produced by an operation handler.
pub type Response = http::Response<bytes::Bytes>;
