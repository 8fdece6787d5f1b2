//! Serializable runtime descriptions.
//!
//! A [`RuntimeSummary`] captures everything about a registered controller
//! except its closures. Two registrations of the same declaration produce
//! equal summaries.

use heron_core::{BindingLocation, Scope};
use serde::Serialize;

use crate::descriptor::BindingDescriptor;
use crate::runtime::ControllerRuntime;

/// Description of one binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingSummary {
    /// Parameter or field name.
    pub parameter: String,
    /// Wire name.
    pub name: String,
    /// Binding location.
    pub location: BindingLocation,
    /// Declared type name.
    pub declared_type: String,
    /// Whether absence fails the bind.
    pub required: bool,
}

impl From<&BindingDescriptor> for BindingSummary {
    fn from(binding: &BindingDescriptor) -> Self {
        Self {
            parameter: binding.parameter().to_string(),
            name: binding.name().to_string(),
            location: binding.location(),
            declared_type: binding.declared_type().name().to_string(),
            required: binding.required(),
        }
    }
}

/// Description of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationSummary {
    /// Controller method name.
    pub method_name: String,
    /// HTTP method.
    pub http_method: String,
    /// Declared path variables, sorted.
    pub path_variables: Vec<String>,
    /// Positional bindings, in order.
    pub positional: Vec<BindingSummary>,
    /// Named bindings.
    pub named: Vec<BindingSummary>,
    /// Required scopes.
    pub scopes: Vec<Scope>,
}

/// Description of a registered controller.
///
/// # Example
///
/// ```rust
/// use heron_controller::{register_controller, ControllerDeclaration};
///
/// struct Empty;
///
/// let runtime = register_controller(ControllerDeclaration::<Empty>::new("Empty")).unwrap();
/// let summary = runtime.summary();
/// assert_eq!(summary.controller, "Empty");
/// assert!(summary.operations.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeSummary {
    /// Controller name.
    pub controller: String,
    /// Controller-level bindings.
    pub instance_bindings: Vec<BindingSummary>,
    /// Operations, in declaration order.
    pub operations: Vec<OperationSummary>,
}

impl RuntimeSummary {
    pub(crate) fn of<C>(runtime: &ControllerRuntime<C>) -> Self {
        Self {
            controller: runtime.name().to_string(),
            instance_bindings: runtime
                .instance_bindings()
                .iter()
                .map(|b| b.binding().into())
                .collect(),
            operations: runtime
                .operations()
                .map(|op| OperationSummary {
                    method_name: op.method_name().to_string(),
                    http_method: op.key().method().to_string(),
                    path_variables: op
                        .key()
                        .path_variables()
                        .iter()
                        .map(str::to_string)
                        .collect(),
                    positional: op.positional().iter().map(Into::into).collect(),
                    named: op.named().iter().map(Into::into).collect(),
                    scopes: op.scopes().to_vec(),
                })
                .collect(),
        }
    }
}
