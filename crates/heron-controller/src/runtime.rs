//! Controller registration and the per-controller runtime.

use heron_config::BindingConfig;
use heron_core::{HeronResult, Response, Scope};
use heron_extract::{BindingError, BodyOptions, Params, RequestParts};
use heron_telemetry::metrics::{record_invocation, record_registration};
use http::Method;
use std::time::Instant;
use indexmap::IndexMap;
use tracing::{debug_span, info, warn, Instrument};

use crate::binder::{self, ArgumentSet};
use crate::declaration::{Controller, ControllerDeclaration, HandlerFuture};
use crate::descriptor::{InstanceBinding, OperationDescriptor, OperationKey};
use crate::error::RegistrationError;
use crate::introspect::introspect;
use crate::invoke;
use crate::summary::RuntimeSummary;
use crate::validate::validate;

/// The validated dispatch table of one controller type.
///
/// Built once by [`register_controller`] and read-only afterwards. Share it
/// across requests behind an `Arc`; every request brings its own controller
/// instance.
pub struct ControllerRuntime<C> {
    name: String,
    instance_bindings: Vec<InstanceBinding<C>>,
    operations: IndexMap<OperationKey, OperationDescriptor<C>>,
    body_options: BodyOptions,
}

/// Registers a controller with the default binding configuration.
///
/// # Errors
///
/// Returns a [`RegistrationError`] listing every problem in the declaration.
pub fn register_controller<C: Send + 'static>(
    declaration: ControllerDeclaration<C>,
) -> Result<ControllerRuntime<C>, RegistrationError> {
    register_controller_with(declaration, &BindingConfig::default())
}

/// Registers a type that implements [`Controller`].
///
/// # Errors
///
/// Returns a [`RegistrationError`] listing every problem in the declaration.
pub fn register<C: Controller>() -> Result<ControllerRuntime<C>, RegistrationError> {
    register_controller(C::declare())
}

/// Registers a controller.
///
/// Introspection and validation both run to completion; nothing is added to
/// the runtime unless the whole controller is valid.
///
/// # Errors
///
/// Returns a [`RegistrationError`] listing every problem in the declaration.
pub fn register_controller_with<C: Send + 'static>(
    declaration: ControllerDeclaration<C>,
    config: &BindingConfig,
) -> Result<ControllerRuntime<C>, RegistrationError> {
    let mut problems = Vec::new();
    let introspection = introspect(declaration, &mut problems);
    problems.extend(validate(&introspection.operations));

    if !problems.is_empty() {
        let err = RegistrationError::new(introspection.controller, problems);
        warn!(
            controller = %err.controller(),
            problems = err.problems().len(),
            error = %err,
            "Controller registration failed"
        );
        record_registration("failure");
        return Err(err);
    }

    let operations: IndexMap<_, _> = introspection
        .operations
        .into_iter()
        .map(|op| (op.key.clone(), op))
        .collect();

    info!(
        controller = %introspection.controller,
        operations = operations.len(),
        instance_bindings = introspection.instance_bindings.len(),
        "Controller registered"
    );
    record_registration("success");

    Ok(ControllerRuntime {
        name: introspection.controller,
        instance_bindings: introspection.instance_bindings,
        operations,
        body_options: BodyOptions {
            max_bytes: config.max_body_bytes,
            require_json_content_type: config.reject_unknown_content_type,
        },
    })
}

impl<C> ControllerRuntime<C> {
    /// Returns the controller name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the controller-level bindings, in declaration order.
    #[must_use]
    pub fn instance_bindings(&self) -> &[InstanceBinding<C>] {
        &self.instance_bindings
    }

    /// Iterates over the operations, in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = &OperationDescriptor<C>> {
        self.operations.values()
    }

    /// Looks up an operation by key.
    #[must_use]
    pub fn operation(&self, key: &OperationKey) -> Option<&OperationDescriptor<C>> {
        self.operations.get(key)
    }

    /// Returns the scopes required by an operation.
    #[must_use]
    pub fn scopes(&self, key: &OperationKey) -> Option<&[Scope]> {
        self.operation(key).map(OperationDescriptor::scopes)
    }

    /// Returns the body limits applied while binding.
    #[must_use]
    pub fn body_options(&self) -> &BodyOptions {
        &self.body_options
    }

    /// Selects the operation for a request's method and populated path
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::NoMatchingOperation`] if no operation matches.
    pub fn resolve(
        &self,
        method: &Method,
        params: &Params,
    ) -> Result<&OperationDescriptor<C>, BindingError> {
        let key = OperationKey::from_parts(method.clone(), params.variables());
        self.operations
            .get(&key)
            .ok_or_else(|| BindingError::NoMatchingOperation {
                method: method.to_string(),
                path_variables: key.path_variables().clone(),
            })
    }

    /// Binds a request to the operation registered under `key`.
    ///
    /// See [`bind`](crate::bind).
    pub fn bind(
        &self,
        key: &OperationKey,
        parts: &RequestParts,
    ) -> Result<ArgumentSet, BindingError> {
        binder::bind(self, key, parts)
    }

    /// Returns a serializable description of the runtime.
    #[must_use]
    pub fn summary(&self) -> RuntimeSummary {
        RuntimeSummary::of(self)
    }
}

impl<C: Send + 'static> ControllerRuntime<C> {
    /// Invokes the operation registered under `key`.
    ///
    /// See [`invoke`](fn@crate::invoke).
    pub fn invoke(&self, instance: C, key: &OperationKey, args: ArgumentSet) -> HandlerFuture {
        invoke::invoke(self, instance, key, args)
    }

    /// Resolves, binds and invokes one request.
    ///
    /// # Errors
    ///
    /// Returns the binding error converted to a [`heron_core::HeronError`],
    /// or whatever the handler returns.
    pub async fn handle(&self, instance: C, parts: &RequestParts) -> HeronResult<Response> {
        let span = debug_span!(
            "heron.handle",
            controller = %self.name,
            method = %parts.method(),
            path = %parts.path(),
        );

        async {
            let key = self.resolve(parts.method(), parts.path_params())?.key().clone();
            let args = self.bind(&key, parts)?;

            let started = Instant::now();
            let result = self.invoke(instance, &key, args).await;
            let status = match &result {
                Ok(response) => response.status(),
                Err(e) => e.status_code(),
            };
            record_invocation(&key.to_string(), status.as_u16(), started.elapsed());
            result
        }
        .instrument(span)
        .await
    }
}

impl<C> std::fmt::Debug for ControllerRuntime<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRuntime")
            .field("name", &self.name)
            .field("instance_bindings", &self.instance_bindings)
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .field("body_options", &self.body_options)
            .finish()
    }
}
