//! Request-time binding errors.
//!
//! A [`BindingError`] rejects one request before its handler runs. It never
//! affects other requests or the registered controller.

use heron_core::{BindingLocation, HeronError};
use heron_router::PathVariables;
use http::StatusCode;
use thiserror::Error;

/// Error produced while binding one request to an operation.
///
/// # Example
///
/// ```rust
/// use heron_extract::BindingError;
/// use heron_core::BindingLocation;
/// use http::StatusCode;
///
/// let err = BindingError::missing("limit", BindingLocation::Query);
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.name(), Some("limit"));
/// assert!(err.to_string().contains("limit"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// A required value is absent from the request.
    #[error("missing required {location} parameter: {name}")]
    MissingRequiredBinding {
        /// Wire-level name of the binding.
        name: String,
        /// Where the value was expected.
        location: BindingLocation,
    },

    /// A value is present but could not be converted to its declared type.
    #[error("invalid {location} parameter '{name}' (expected {declared_type}): {reason}")]
    InvalidBindingValue {
        /// Wire-level name of the binding.
        name: String,
        /// Where the value came from.
        location: BindingLocation,
        /// Name of the type the value must convert into.
        declared_type: String,
        /// What went wrong.
        reason: String,
    },

    /// No operation is declared for the request's method and path variables.
    #[error("no operation for {method} with path variables {path_variables}")]
    NoMatchingOperation {
        /// Request method.
        method: String,
        /// Path variables populated for the request.
        path_variables: PathVariables,
    },

    /// The body exceeds the configured limit.
    #[error("payload too large: max {limit} bytes, got {actual} bytes")]
    PayloadTooLarge {
        /// Configured limit.
        limit: usize,
        /// Actual body size.
        actual: usize,
    },

    /// The body's content type cannot be decoded.
    #[error("unsupported content type: expected JSON, got '{content_type}'")]
    UnsupportedMediaType {
        /// The request's `Content-Type`.
        content_type: String,
    },
}

impl BindingError {
    /// Creates a [`BindingError::MissingRequiredBinding`].
    #[must_use]
    pub fn missing(name: impl Into<String>, location: BindingLocation) -> Self {
        Self::MissingRequiredBinding {
            name: name.into(),
            location,
        }
    }

    /// Creates a [`BindingError::InvalidBindingValue`].
    #[must_use]
    pub fn invalid(
        name: impl Into<String>,
        location: BindingLocation,
        declared_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidBindingValue {
            name: name.into(),
            location,
            declared_type: declared_type.into(),
            reason: reason.into(),
        }
    }

    /// Returns the binding name, if the error concerns a single binding.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredBinding { name, .. } | Self::InvalidBindingValue { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Returns the binding location, if the error concerns a single binding.
    #[must_use]
    pub fn location(&self) -> Option<BindingLocation> {
        match self {
            Self::MissingRequiredBinding { location, .. }
            | Self::InvalidBindingValue { location, .. } => Some(*location),
            Self::PayloadTooLarge { .. } | Self::UnsupportedMediaType { .. } => {
                Some(BindingLocation::Body)
            }
            Self::NoMatchingOperation { .. } => None,
        }
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingRequiredBinding { .. } | Self::InvalidBindingValue { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::NoMatchingOperation { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingRequiredBinding { .. } => "MISSING_PARAMETER",
            Self::InvalidBindingValue { .. } => "INVALID_PARAMETER",
            Self::NoMatchingOperation { .. } => "NO_MATCHING_OPERATION",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
        }
    }
}

impl From<BindingError> for HeronError {
    fn from(err: BindingError) -> Self {
        let message = err.to_string();
        match &err {
            BindingError::MissingRequiredBinding { name, location } => {
                HeronError::validation_with_details(
                    message,
                    serde_json::json!({
                        "code": err.error_code(),
                        "name": name,
                        "location": location,
                    }),
                )
            }
            BindingError::InvalidBindingValue {
                name,
                location,
                declared_type,
                ..
            } => HeronError::validation_with_details(
                message,
                serde_json::json!({
                    "code": err.error_code(),
                    "name": name,
                    "location": location,
                    "declared_type": declared_type,
                }),
            ),
            BindingError::NoMatchingOperation { .. } => HeronError::method_not_allowed(message),
            BindingError::PayloadTooLarge { .. } => HeronError::payload_too_large(message),
            BindingError::UnsupportedMediaType { .. } => {
                HeronError::unsupported_media_type(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heron_core::ErrorCategory;

    #[test]
    fn test_missing_error() {
        let err = BindingError::missing("id", BindingLocation::Path);

        assert_eq!(err.name(), Some("id"));
        assert_eq!(err.location(), Some(BindingLocation::Path));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "MISSING_PARAMETER");
        assert_eq!(err.to_string(), "missing required path parameter: id");
    }

    #[test]
    fn test_invalid_error() {
        let err = BindingError::invalid("id", BindingLocation::Path, "i64", "invalid digit");

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert!(err.to_string().contains("expected i64"));
        assert!(err.to_string().contains("invalid digit"));
    }

    #[test]
    fn test_no_matching_operation() {
        let err = BindingError::NoMatchingOperation {
            method: "DELETE".into(),
            path_variables: PathVariables::from_iter(["id"]),
        };

        assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.location(), None);
        assert_eq!(err.to_string(), "no operation for DELETE with path variables [id]");
    }

    #[test]
    fn test_body_errors() {
        let too_large = BindingError::PayloadTooLarge {
            limit: 1024,
            actual: 2048,
        };
        assert_eq!(too_large.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(too_large.location(), Some(BindingLocation::Body));

        let media = BindingError::UnsupportedMediaType {
            content_type: "text/plain".into(),
        };
        assert_eq!(media.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_into_heron_error() {
        let err: HeronError =
            BindingError::invalid("limit", BindingLocation::Query, "u32", "bad").into();
        assert_eq!(err.category(), ErrorCategory::Validation);

        let envelope = err.to_envelope();
        let details = envelope.error.details.unwrap();
        assert_eq!(details["name"], "limit");
        assert_eq!(details["location"], "query");
        assert_eq!(details["declared_type"], "u32");

        let err: HeronError = BindingError::PayloadTooLarge { limit: 1, actual: 2 }.into();
        assert_eq!(err.category(), ErrorCategory::PayloadTooLarge);
    }
}
