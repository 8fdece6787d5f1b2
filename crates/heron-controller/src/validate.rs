//! Completeness and conflict checks over a controller's operations.

use heron_core::BindingLocation;
use indexmap::IndexMap;

use crate::descriptor::{OperationDescriptor, OperationKey};
use crate::error::RegistrationProblem;

/// Checks every operation of one controller.
///
/// Returns one [`RegistrationProblem::UnsatisfiableOperation`] per method
/// that binds an undeclared path variable, then one
/// [`RegistrationProblem::ConflictingOperations`] per group of methods that
/// share an [`OperationKey`]. A method appears in at most one conflict.
pub(crate) fn validate<C>(operations: &[OperationDescriptor<C>]) -> Vec<RegistrationProblem> {
    let mut problems: Vec<RegistrationProblem> =
        operations.iter().filter_map(unsatisfiable).collect();

    let mut groups: IndexMap<&OperationKey, Vec<&str>> = IndexMap::new();
    for op in operations {
        groups.entry(&op.key).or_default().push(&op.method_name);
    }

    problems.extend(
        groups
            .into_iter()
            .filter(|(_, methods)| methods.len() > 1)
            .map(|(key, methods)| RegistrationProblem::ConflictingOperations {
                http_method: key.method().to_string(),
                path_variables: key.path_variables().clone(),
                methods: methods.into_iter().map(str::to_string).collect(),
            }),
    );

    problems
}

fn unsatisfiable<C>(op: &OperationDescriptor<C>) -> Option<RegistrationProblem> {
    let mut variables: Vec<String> = Vec::new();
    for binding in op.bindings() {
        if binding.location() == BindingLocation::Path
            && !op.key.path_variables().contains(binding.name())
            && !variables.iter().any(|v| v == binding.name())
        {
            variables.push(binding.name().to_string());
        }
    }

    (!variables.is_empty()).then(|| RegistrationProblem::UnsatisfiableOperation {
        method: op.method_name.clone(),
        variables,
    })
}
