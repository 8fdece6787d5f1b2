//! Registration-time errors.
//!
//! Registration never stops at the first problem. The introspector and the
//! validator collect every problem they find, and registration fails with a
//! single [`RegistrationError`] that enumerates all of them.

use heron_core::{BindingLocation, HeronError};
use heron_router::PathVariables;
use thiserror::Error;

/// One problem found while registering a controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationProblem {
    /// An operation parameter carries no binding source.
    #[error("{method}: parameter '{parameter}' has no binding annotation")]
    MissingBindingAnnotation {
        /// Method that declares the parameter.
        method: String,
        /// Parameter name.
        parameter: String,
    },

    /// The declared type has no conversion for its binding location.
    #[error("{member}: type {type_name} cannot be bound from {location}")]
    UnparsableType {
        /// `method(parameter)` or the field name.
        member: String,
        /// Declared type name.
        type_name: String,
        /// Binding location.
        location: BindingLocation,
    },

    /// Field filters were supplied where they cannot apply.
    #[error("{member}: {reason}")]
    FilterMisuse {
        /// `method(parameter)` or the field name.
        member: String,
        /// What is wrong with the filters.
        reason: String,
    },

    /// A path binding names a variable the operation does not declare.
    #[error("{method}: path variables [{}] are bound but not declared", .variables.join(", "))]
    UnsatisfiableOperation {
        /// Offending method.
        method: String,
        /// Undeclared variables, in binding order.
        variables: Vec<String>,
    },

    /// Several methods share one HTTP method and path-variable set.
    #[error("{http_method} {path_variables} is declared by more than one method: {}", .methods.join(", "))]
    ConflictingOperations {
        /// Shared HTTP method.
        http_method: String,
        /// Shared path-variable set.
        path_variables: PathVariables,
        /// Every method in the conflict, in declaration order.
        methods: Vec<String>,
    },

    /// An instance field's setter does not accept the declared type.
    #[error("field '{field}': setter takes {actual}, but the binding decodes {expected}")]
    SlotTypeMismatch {
        /// Field name.
        field: String,
        /// Type the binding decodes into.
        expected: String,
        /// Type the setter accepts.
        actual: String,
    },

    /// A method is marked as an operation but has no handler.
    #[error("{method}: operation has no handler")]
    MissingHandler {
        /// Offending method.
        method: String,
    },

    /// The operation's HTTP method is not a valid token.
    #[error("{method}: '{verb}' is not a valid HTTP method")]
    InvalidHttpMethod {
        /// Offending method.
        method: String,
        /// The declared verb.
        verb: String,
    },

    /// The operation's route template could not be parsed.
    #[error("{method}: invalid route: {reason}")]
    InvalidRoute {
        /// Offending method.
        method: String,
        /// Parse failure.
        reason: String,
    },
}

impl RegistrationProblem {
    /// Returns a short stable name for the problem kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingBindingAnnotation { .. } => "missing_binding_annotation",
            Self::UnparsableType { .. } => "unparsable_type",
            Self::FilterMisuse { .. } => "filter_misuse",
            Self::UnsatisfiableOperation { .. } => "unsatisfiable_operation",
            Self::ConflictingOperations { .. } => "conflicting_operations",
            Self::SlotTypeMismatch { .. } => "slot_type_mismatch",
            Self::MissingHandler { .. } => "missing_handler",
            Self::InvalidHttpMethod { .. } => "invalid_http_method",
            Self::InvalidRoute { .. } => "invalid_route",
        }
    }

    /// Returns every controller method this problem names.
    #[must_use]
    pub fn methods(&self) -> Vec<&str> {
        match self {
            Self::MissingBindingAnnotation { method, .. }
            | Self::UnsatisfiableOperation { method, .. }
            | Self::MissingHandler { method }
            | Self::InvalidHttpMethod { method, .. }
            | Self::InvalidRoute { method, .. } => vec![method.as_str()],
            Self::ConflictingOperations { methods, .. } => {
                methods.iter().map(String::as_str).collect()
            }
            Self::UnparsableType { member, .. } | Self::FilterMisuse { member, .. } => {
                vec![member.split('(').next().unwrap_or(member.as_str())]
            }
            Self::SlotTypeMismatch { .. } => Vec::new(),
        }
    }
}

/// A controller definition was rejected.
///
/// # Example
///
/// ```rust
/// use heron_controller::{RegistrationError, RegistrationProblem};
///
/// let err = RegistrationError::new(
///     "ThingController",
///     vec![RegistrationProblem::MissingHandler { method: "get_thing".into() }],
/// );
/// assert_eq!(err.problems().len(), 1);
/// assert!(err.to_string().contains("get_thing"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot register controller '{controller}': {}", format_problems(.problems))]
pub struct RegistrationError {
    controller: String,
    problems: Vec<RegistrationProblem>,
}

impl RegistrationError {
    /// Creates a registration error for `controller`.
    #[must_use]
    pub fn new(controller: impl Into<String>, problems: Vec<RegistrationProblem>) -> Self {
        Self {
            controller: controller.into(),
            problems,
        }
    }

    /// Returns the controller name.
    #[must_use]
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Returns every problem found, in discovery order.
    #[must_use]
    pub fn problems(&self) -> &[RegistrationProblem] {
        &self.problems
    }

    /// Returns the problems of one kind.
    pub fn problems_of<'a>(
        &'a self,
        kind: &'a str,
    ) -> impl Iterator<Item = &'a RegistrationProblem> + 'a {
        self.problems.iter().filter(move |p| p.kind() == kind)
    }
}

fn format_problems(problems: &[RegistrationProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<RegistrationError> for HeronError {
    fn from(err: RegistrationError) -> Self {
        Self::internal_with_source("controller registration failed", err)
    }
}
