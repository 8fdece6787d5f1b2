//! Binding and operation descriptors.
//!
//! Descriptors are produced once by the introspector and never change. Each
//! [`BindingDescriptor`] carries a decoder chosen at construction from its
//! location and declared type, so no type dispatch happens per request.

use std::fmt;

use heron_core::{BindingLocation, Scope};
use heron_extract::{BindingError, FieldFilters, PathVariables};
use http::Method;
use serde_json::Value;

use crate::declaration::{Handler, SlotSetter};
use crate::types::{
    CastFn, Decoded, DeclaredType, ParseFn, ParseListFn, PresentFn, ReadFn, ReadListFn,
};

#[derive(Clone, Copy)]
pub(crate) enum Decoder {
    /// One string into one value.
    Scalar {
        parse: ParseFn,
        present: Option<PresentFn>,
    },
    /// Repeated strings into a `Vec`.
    List {
        parse: ParseListFn,
        present: Option<PresentFn>,
    },
    Read(ReadFn),
    ReadList(ReadListFn),
    Cast(CastFn),
}

/// Describes how one parameter or field is bound.
#[derive(Clone)]
pub struct BindingDescriptor {
    parameter: String,
    name: String,
    location: BindingLocation,
    declared_type: DeclaredType,
    required: bool,
    filters: FieldFilters,
    decoder: Decoder,
}

impl BindingDescriptor {
    pub(crate) fn new(
        parameter: impl Into<String>,
        name: impl Into<String>,
        location: BindingLocation,
        declared_type: DeclaredType,
        required: bool,
        filters: FieldFilters,
        decoder: Decoder,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            name: name.into(),
            location,
            declared_type,
            required,
            filters,
            decoder,
        }
    }

    /// Returns the parameter or field name in the controller.
    #[must_use]
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Returns the wire-level name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the binding location.
    #[must_use]
    pub fn location(&self) -> BindingLocation {
        self.location
    }

    /// Returns the declared type.
    #[must_use]
    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }

    /// Returns `true` if an absent value fails the bind.
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// Returns the body field filters.
    #[must_use]
    pub fn filters(&self) -> &FieldFilters {
        &self.filters
    }

    fn invalid(&self, reason: impl Into<String>) -> BindingError {
        BindingError::invalid(
            &self.name,
            self.location,
            self.declared_type.name(),
            reason,
        )
    }

    /// Decodes the string values found for this binding.
    ///
    /// `raw` is never empty: absence is handled by the binder.
    pub(crate) fn decode_strings(&self, raw: &[&str]) -> Result<Decoded, BindingError> {
        match self.decoder {
            Decoder::Scalar { parse, present } => {
                if let Some(value) = present.and_then(|present| present(raw.len())) {
                    return Ok(value);
                }
                match raw {
                    [single] => parse(single).map_err(|e| self.invalid(e.reason())),
                    _ => Err(self.invalid(format!("expected one value, got {}", raw.len()))),
                }
            }
            Decoder::List { parse, present } => {
                if let Some(value) = present.and_then(|present| present(raw.len())) {
                    return Ok(value);
                }
                parse(raw).map_err(|e| self.invalid(e.reason()))
            }
            Decoder::Read(_) | Decoder::ReadList(_) | Decoder::Cast(_) => {
                Err(self.invalid("binding expects a structured body"))
            }
        }
    }

    /// Decodes the materialized body for this binding.
    pub(crate) fn decode_body(&self, body: &Value) -> Result<Decoded, BindingError> {
        match self.decoder {
            Decoder::Read(read) => match body {
                Value::Object(data) => {
                    read(data, &self.filters).map_err(|e| self.invalid(e.to_string()))
                }
                _ => Err(self.invalid("body must be an object")),
            },
            Decoder::ReadList(read) => match body {
                Value::Array(items) => {
                    read(items, &self.filters).map_err(|e| self.invalid(e.to_string()))
                }
                _ => Err(self.invalid("body must be a list")),
            },
            Decoder::Cast(cast) => cast(body).map_err(|e| self.invalid(e)),
            Decoder::Scalar { .. } | Decoder::List { .. } => {
                Err(self.invalid("binding expects string values"))
            }
        }
    }
}

impl fmt::Debug for BindingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingDescriptor")
            .field("parameter", &self.parameter)
            .field("name", &self.name)
            .field("location", &self.location)
            .field("declared_type", &self.declared_type.name())
            .field("required", &self.required)
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

/// Identifies an operation: its HTTP method and the set of path variables it
/// handles.
///
/// Two keys are equal when their methods match and their path-variable sets
/// are equal as sets.
///
/// # Example
///
/// ```rust
/// use heron_controller::OperationKey;
/// use http::Method;
///
/// let a = OperationKey::new(Method::GET, ["id", "rev"]);
/// let b = OperationKey::new(Method::GET, ["rev", "id", "id"]);
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "GET [id, rev]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationKey {
    method: Method,
    path_variables: PathVariables,
}

impl OperationKey {
    /// Creates a key.
    #[must_use]
    pub fn new<I, S>(method: Method, path_variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            path_variables: path_variables.into_iter().collect(),
        }
    }

    pub(crate) fn from_parts(method: Method, path_variables: PathVariables) -> Self {
        Self {
            method,
            path_variables,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path-variable set.
    #[must_use]
    pub fn path_variables(&self) -> &PathVariables {
        &self.path_variables
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path_variables)
    }
}

/// Describes one operation of a controller.
pub struct OperationDescriptor<C> {
    pub(crate) method_name: String,
    pub(crate) key: OperationKey,
    pub(crate) positional: Vec<BindingDescriptor>,
    pub(crate) named: Vec<BindingDescriptor>,
    pub(crate) scopes: Vec<Scope>,
    pub(crate) invoke: Handler<C>,
}

impl<C> OperationDescriptor<C> {
    /// Returns the controller method name.
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Returns the operation key.
    #[must_use]
    pub fn key(&self) -> &OperationKey {
        &self.key
    }

    /// Returns the positional bindings, in declaration order.
    #[must_use]
    pub fn positional(&self) -> &[BindingDescriptor] {
        &self.positional
    }

    /// Returns the named bindings.
    #[must_use]
    pub fn named(&self) -> &[BindingDescriptor] {
        &self.named
    }

    /// Returns the access scopes, sorted and deduplicated.
    #[must_use]
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Iterates over every binding, positional first.
    pub fn bindings(&self) -> impl Iterator<Item = &BindingDescriptor> {
        self.positional.iter().chain(&self.named)
    }
}

impl<C> fmt::Debug for OperationDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("method_name", &self.method_name)
            .field("key", &self.key)
            .field("positional", &self.positional)
            .field("named", &self.named)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

/// A controller-level binding and the setter that applies it.
pub struct InstanceBinding<C> {
    pub(crate) binding: BindingDescriptor,
    pub(crate) setter: SlotSetter<C>,
}

impl<C> InstanceBinding<C> {
    /// Returns the binding descriptor.
    #[must_use]
    pub fn binding(&self) -> &BindingDescriptor {
        &self.binding
    }
}

impl<C> fmt::Debug for InstanceBinding<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceBinding")
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Strategy;
    use serde_json::json;

    fn query(ty: DeclaredType, name: &str) -> BindingDescriptor {
        let decoder = match ty.strategy() {
            Strategy::Param { parse, present } => Decoder::Scalar { parse, present },
            Strategy::ParamList { parse, present } => Decoder::List { parse, present },
            _ => panic!("not a string type"),
        };
        BindingDescriptor::new(
            name,
            name,
            BindingLocation::Query,
            ty,
            true,
            FieldFilters::new(),
            decoder,
        )
    }

    #[test]
    fn test_scalar_wrong_arity() {
        let desc = query(DeclaredType::scalar::<u32>(), "limit");
        let err = desc.decode_strings(&["1", "2"]).unwrap_err();
        assert_eq!(
            err,
            BindingError::invalid("limit", BindingLocation::Query, "u32", "expected one value, got 2")
        );
    }

    #[test]
    fn test_scalar_parse_failure_names_type() {
        let desc = query(DeclaredType::scalar::<i32>(), "id");
        let err = desc.decode_strings(&["abc"]).unwrap_err();
        assert!(matches!(
            err,
            BindingError::InvalidBindingValue { ref declared_type, .. } if declared_type == "i32"
        ));
    }

    #[test]
    fn test_flag_ignores_value() {
        let desc = query(DeclaredType::scalar::<bool>(), "verbose");
        let value = desc.decode_strings(&["", "whatever"]).unwrap();
        assert!(*value.downcast::<bool>().unwrap());
    }

    #[test]
    fn test_list_decodes_in_order() {
        let desc = query(DeclaredType::list::<u8>(), "ids");
        let value = desc.decode_strings(&["3", "1", "2"]).unwrap();
        assert_eq!(*value.downcast::<Vec<u8>>().unwrap(), vec![3, 1, 2]);
        assert!(desc.decode_strings(&["3", "x"]).is_err());
    }

    #[test]
    fn test_cast_body() {
        let ty = DeclaredType::structured::<Vec<String>>();
        let Strategy::Cast(cast) = ty.strategy() else {
            panic!("expected cast");
        };
        let desc = BindingDescriptor::new(
            "names",
            "body",
            BindingLocation::Body,
            ty,
            false,
            FieldFilters::new(),
            Decoder::Cast(cast),
        );
        let value = desc.decode_body(&json!(["a", "b"])).unwrap();
        assert_eq!(*value.downcast::<Vec<String>>().unwrap(), vec!["a", "b"]);

        let err = desc.decode_body(&json!({ "a": 1 })).unwrap_err();
        assert_eq!(err.location(), Some(BindingLocation::Body));
    }

    #[test]
    fn test_operation_key_display() {
        let key = OperationKey::new(Method::DELETE, Vec::<String>::new());
        assert_eq!(key.to_string(), "DELETE []");
        assert!(key.path_variables().is_empty());
    }
}
