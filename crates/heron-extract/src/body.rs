//! Body materialization.
//!
//! Turns the raw request body into the structured tree bindings read from.
//! This runs at most once per request, and only when the selected operation
//! binds the body.

use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

/// Default maximum body size (1 MB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Limits applied while materializing a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyOptions {
    /// Largest accepted body, in bytes.
    pub max_bytes: usize,
    /// Refuse bodies whose `Content-Type` is present and not JSON.
    pub require_json_content_type: bool,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BODY_BYTES,
            require_json_content_type: true,
        }
    }
}

/// Reasons a body could not be materialized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BodyError {
    /// Body exceeds [`BodyOptions::max_bytes`].
    #[error("payload too large: max {limit} bytes, got {actual} bytes")]
    TooLarge {
        /// Configured limit.
        limit: usize,
        /// Actual size.
        actual: usize,
    },

    /// `Content-Type` is not JSON.
    #[error("unsupported content type '{0}'")]
    UnsupportedMediaType(String),

    /// Body is not valid JSON.
    #[error("malformed JSON body: {0}")]
    Malformed(String),
}

/// Decodes a raw body into a structured value.
///
/// Returns `Ok(None)` when the body is empty or the JSON literal `null`, so
/// callers can treat both as an absent body.
///
/// # Example
///
/// ```rust
/// use heron_extract::{materialize_body, BodyOptions};
/// use bytes::Bytes;
///
/// let opts = BodyOptions::default();
/// assert_eq!(materialize_body(&Bytes::new(), None, &opts).unwrap(), None);
///
/// let value = materialize_body(&Bytes::from_static(b"[1,2]"), Some("application/json"), &opts)
///     .unwrap()
///     .unwrap();
/// assert_eq!(value, serde_json::json!([1, 2]));
/// ```
pub fn materialize_body(
    body: &Bytes,
    content_type: Option<&str>,
    options: &BodyOptions,
) -> Result<Option<Value>, BodyError> {
    if body.len() > options.max_bytes {
        return Err(BodyError::TooLarge {
            limit: options.max_bytes,
            actual: body.len(),
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    if options.require_json_content_type {
        if let Some(content_type) = content_type {
            if !is_json(content_type) {
                return Err(BodyError::UnsupportedMediaType(content_type.to_string()));
            }
        }
    }

    match serde_json::from_slice(body) {
        Ok(Value::Null) => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(e) => Err(BodyError::Malformed(e.to_string())),
    }
}

// application/json, application/*+json
fn is_json(content_type: &str) -> bool {
    content_type.parse::<mime::Mime>().is_ok_and(|m| {
        m.type_() == mime::APPLICATION
            && (m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON))
    })
}
