//! Request-time argument binding.
//!
//! Binding walks the instance bindings, then the selected operation's
//! positional bindings, then its named bindings, and stops at the first
//! failure. A handler only ever sees a complete [`ArgumentSet`].

use std::any::type_name;
use std::fmt;

use heron_core::{BindingLocation, HeronError, HeronResult};
use heron_extract::{materialize_body, BindingError, BodyError, BodyOptions, RequestParts};
use heron_telemetry::metrics::record_binding;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::descriptor::{BindingDescriptor, InstanceBinding, OperationDescriptor, OperationKey};
use crate::runtime::ControllerRuntime;
use crate::types::Decoded;

/// The decoded arguments for one invocation.
///
/// Positional arguments are taken by index in declaration order; named
/// arguments by parameter name. Each value can be taken once.
///
/// # Example
///
/// ```rust,ignore
/// async fn search(ctl: Things, mut args: ArgumentSet) -> HeronResult<Response> {
///     let query: String = args.take(0)?;
///     let tags: Option<Vec<String>> = args.take_optional(1)?;
///     let limit: Option<u32> = args.named("limit")?;
///     // ...
/// }
/// ```
#[derive(Default)]
pub struct ArgumentSet {
    instance: Vec<(usize, Decoded)>,
    positional: Vec<Option<Decoded>>,
    named: IndexMap<String, Decoded>,
}

impl ArgumentSet {
    /// Takes a required positional argument.
    ///
    /// Fails with an internal error if the argument is absent, was already
    /// taken, or is not a `T`.
    pub fn take<T: 'static>(&mut self, index: usize) -> HeronResult<T> {
        self.take_optional(index)?.ok_or_else(|| {
            HeronError::internal(format!("positional argument {index} is absent"))
        })
    }

    /// Takes an optional positional argument; `None` when it was not sent.
    pub fn take_optional<T: 'static>(&mut self, index: usize) -> HeronResult<Option<T>> {
        let slot = self.positional.get_mut(index).ok_or_else(|| {
            HeronError::internal(format!("operation has no positional argument {index}"))
        })?;
        slot.take()
            .map(|value| downcast(value, &index.to_string()))
            .transpose()
    }

    /// Takes a named argument; `None` when it was not sent.
    pub fn named<T: 'static>(&mut self, name: &str) -> HeronResult<Option<T>> {
        self.named
            .shift_remove(name)
            .map(|value| downcast(value, name))
            .transpose()
    }

    /// Returns `true` if a named argument is present and not yet taken.
    #[must_use]
    pub fn has_named(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Returns the number of positional slots.
    #[must_use]
    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    pub(crate) fn take_instance(&mut self) -> Vec<(usize, Decoded)> {
        std::mem::take(&mut self.instance)
    }
}

impl fmt::Debug for ArgumentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentSet")
            .field("instance", &self.instance.len())
            .field(
                "positional",
                &self.positional.iter().map(Option::is_some).collect::<Vec<_>>(),
            )
            .field("named", &self.named.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn downcast<T: 'static>(value: Decoded, argument: &str) -> HeronResult<T> {
    value.downcast::<T>().map(|v| *v).map_err(|_| {
        HeronError::internal(format!(
            "argument {argument} is not a {}",
            type_name::<T>()
        ))
    })
}

/// Binds a request to the operation registered under `key`.
///
/// # Errors
///
/// - [`BindingError::NoMatchingOperation`] if `key` is not registered
/// - [`BindingError::MissingRequiredBinding`] if a required value is absent
/// - [`BindingError::InvalidBindingValue`] if a present value fails to decode
/// - [`BindingError::PayloadTooLarge`] or [`BindingError::UnsupportedMediaType`]
///   if the body cannot be materialized
pub fn bind<C>(
    runtime: &ControllerRuntime<C>,
    key: &OperationKey,
    parts: &RequestParts,
) -> Result<ArgumentSet, BindingError> {
    let result = match runtime.operation(key) {
        Some(operation) => bind_arguments(
            runtime.instance_bindings(),
            operation,
            parts,
            runtime.body_options(),
        ),
        None => Err(BindingError::NoMatchingOperation {
            method: key.method().to_string(),
            path_variables: key.path_variables().clone(),
        }),
    };

    match &result {
        Ok(_) => record_binding("success"),
        Err(e) => {
            debug!(
                controller = %runtime.name(),
                operation = %key,
                error = %e,
                "Binding rejected request"
            );
            record_binding(e.error_code());
        }
    }
    result
}

pub(crate) fn bind_arguments<C>(
    instance: &[InstanceBinding<C>],
    operation: &OperationDescriptor<C>,
    parts: &RequestParts,
    options: &BodyOptions,
) -> Result<ArgumentSet, BindingError> {
    let mut source = Source {
        parts,
        options,
        body: None,
    };
    let mut args = ArgumentSet {
        instance: Vec::with_capacity(instance.len()),
        positional: Vec::with_capacity(operation.positional.len()),
        named: IndexMap::with_capacity(operation.named.len()),
    };

    for (index, binding) in instance.iter().enumerate() {
        if let Some(value) = source.resolve(&binding.binding)? {
            args.instance.push((index, value));
        }
    }
    for binding in &operation.positional {
        args.positional.push(source.resolve(binding)?);
    }
    for binding in &operation.named {
        if let Some(value) = source.resolve(binding)? {
            args.named.insert(binding.parameter().to_string(), value);
        }
    }
    Ok(args)
}

/// Raw values of one request. The body is materialized on first use.
struct Source<'a> {
    parts: &'a RequestParts,
    options: &'a BodyOptions,
    body: Option<Option<Value>>,
}

impl Source<'_> {
    fn resolve(&mut self, binding: &BindingDescriptor) -> Result<Option<Decoded>, BindingError> {
        let value = match binding.location() {
            BindingLocation::Path => self
                .parts
                .path_param(binding.name())
                .map(|raw| binding.decode_strings(&[raw]))
                .transpose()?,
            BindingLocation::Query => {
                decode_strings(binding, &self.parts.query_values(binding.name()))?
            }
            BindingLocation::Header => {
                let raw = header_strings(binding, self.parts)?;
                decode_strings(binding, &raw)?
            }
            BindingLocation::Body => match self.body(binding)? {
                Some(body) => Some(binding.decode_body(body)?),
                None => None,
            },
        };

        match value {
            None if binding.required() => {
                Err(BindingError::missing(binding.name(), binding.location()))
            }
            value => Ok(value),
        }
    }

    fn body(&mut self, binding: &BindingDescriptor) -> Result<Option<&Value>, BindingError> {
        if self.body.is_none() {
            let body = materialize_body(self.parts.body(), self.parts.content_type(), self.options)
                .map_err(|e| match e {
                    BodyError::TooLarge { limit, actual } => {
                        BindingError::PayloadTooLarge { limit, actual }
                    }
                    BodyError::UnsupportedMediaType(content_type) => {
                        BindingError::UnsupportedMediaType { content_type }
                    }
                    BodyError::Malformed(reason) => BindingError::invalid(
                        binding.name(),
                        BindingLocation::Body,
                        binding.declared_type().name(),
                        reason,
                    ),
                })?;
            self.body = Some(body);
        }
        Ok(self.body.as_ref().and_then(Option::as_ref))
    }
}

fn header_strings<'a>(
    binding: &BindingDescriptor,
    parts: &'a RequestParts,
) -> Result<Vec<&'a str>, BindingError> {
    parts
        .header_values(binding.name())
        .into_iter()
        .map(|value| {
            value.to_str().map_err(|_| {
                BindingError::invalid(
                    binding.name(),
                    BindingLocation::Header,
                    binding.declared_type().name(),
                    "header value is not visible ASCII",
                )
            })
        })
        .collect()
}

fn decode_strings(
    binding: &BindingDescriptor,
    raw: &[&str],
) -> Result<Option<Decoded>, BindingError> {
    if raw.is_empty() {
        return Ok(None);
    }
    binding.decode_strings(raw).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ArgumentSet {
        let mut named: IndexMap<String, Decoded> = IndexMap::new();
        named.insert("limit".into(), Box::new(10_u32));
        ArgumentSet {
            instance: Vec::new(),
            positional: vec![Some(Box::new(7_i64) as Decoded), None],
            named,
        }
    }

    #[test]
    fn test_take_positional() {
        let mut args = args();
        assert_eq!(args.positional_len(), 2);
        assert_eq!(args.take::<i64>(0).unwrap(), 7);
        assert!(args.take::<i64>(0).is_err());
    }

    #[test]
    fn test_take_optional_absent() {
        let mut args = args();
        assert_eq!(args.take_optional::<String>(1).unwrap(), None);
        assert!(args.take::<String>(1).is_err());
        assert!(args.take_optional::<String>(5).is_err());
    }

    #[test]
    fn test_type_mismatch_is_internal() {
        let mut args = args();
        let err = args.take::<String>(0).unwrap_err();
        assert!(matches!(err, HeronError::Internal { .. }));
    }

    #[test]
    fn test_named() {
        let mut args = args();
        assert!(args.has_named("limit"));
        assert_eq!(args.named::<u32>("limit").unwrap(), Some(10));
        assert!(!args.has_named("limit"));
        assert_eq!(args.named::<u32>("offset").unwrap(), None);
    }
}
