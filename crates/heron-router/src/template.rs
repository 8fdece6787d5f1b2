//! Route templates.
//!
//! A route template is the path pattern an operation is mounted under. Heron
//! only needs the variables a template declares, so parsing stops at
//! classifying segments.

use thiserror::Error;

use crate::PathVariables;

/// Errors produced while parsing a route template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A variable segment has no name (`{}`, `:` or `*`).
    #[error("empty variable name in route '{route}'")]
    EmptyVariable {
        /// The route being parsed.
        route: String,
    },

    /// The same variable name appears twice.
    #[error("duplicate variable '{name}' in route '{route}'")]
    DuplicateVariable {
        /// The repeated name.
        name: String,
        /// The route being parsed.
        route: String,
    },

    /// A wildcard segment is followed by more segments.
    #[error("wildcard '*{name}' must be the last segment of route '{route}'")]
    WildcardNotLast {
        /// The wildcard's name.
        name: String,
        /// The route being parsed.
        route: String,
    },
}

/// One segment of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal segment (e.g., "things")
    Static(String),
    /// Named variable (`{id}` or `:id`)
    Variable(String),
    /// Catch-all remainder (`*path`)
    Wildcard(String),
}

/// A parsed route template.
///
/// # Example
///
/// ```rust
/// use heron_router::{RouteTemplate, Segment};
///
/// let template = RouteTemplate::parse("/files/:bucket/*key").unwrap();
/// assert_eq!(template.segments()[1], Segment::Variable("bucket".into()));
/// assert!(template.variables().contains("key"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    route: String,
    segments: Vec<Segment>,
    variables: PathVariables,
}

impl RouteTemplate {
    /// Parses a route template.
    ///
    /// Variables are written `{name}` or `:name`; a trailing `*name` captures
    /// the remainder of the path.
    pub fn parse(route: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut variables = PathVariables::new();

        let raw: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();
        for (index, s) in raw.iter().enumerate() {
            let segment = if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Segment::Variable(name.to_string())
            } else if let Some(name) = s.strip_prefix(':') {
                Segment::Variable(name.to_string())
            } else if let Some(name) = s.strip_prefix('*') {
                if index + 1 != raw.len() {
                    return Err(TemplateError::WildcardNotLast {
                        name: name.to_string(),
                        route: route.to_string(),
                    });
                }
                Segment::Wildcard(name.to_string())
            } else {
                Segment::Static((*s).to_string())
            };

            if let Segment::Variable(name) | Segment::Wildcard(name) = &segment {
                if name.is_empty() {
                    return Err(TemplateError::EmptyVariable {
                        route: route.to_string(),
                    });
                }
                if !variables.insert(name.clone()) {
                    return Err(TemplateError::DuplicateVariable {
                        name: name.clone(),
                        route: route.to_string(),
                    });
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            route: route.to_string(),
            segments,
            variables,
        })
    }

    /// Returns the original route string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.route
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the variables this template declares.
    #[must_use]
    pub fn variables(&self) -> &PathVariables {
        &self.variables
    }
}
