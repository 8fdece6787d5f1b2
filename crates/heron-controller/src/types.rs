//! Declared types and their conversion strategies.
//!
//! A [`DeclaredType`] is the runtime description of the Rust type a binding
//! decodes into. It is built from a generic constructor, which picks one of a
//! small closed set of conversion strategies for the type and records the
//! [`TypeId`] of the decoded value. Decoded values travel as [`Decoded`]
//! boxes that always hold exactly that type.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use heron_extract::{FieldFilters, FromParam, ParamError, ReadError, ReadFrom};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A decoded binding value.
pub type Decoded = Box<dyn Any + Send>;

pub(crate) type ParseFn = fn(&str) -> Result<Decoded, ParamError>;
pub(crate) type ParseListFn = fn(&[&str]) -> Result<Decoded, ParamError>;
pub(crate) type PresentFn = fn(usize) -> Option<Decoded>;
pub(crate) type ReadFn = fn(&Map<String, Value>, &FieldFilters) -> Result<Decoded, ReadError>;
pub(crate) type ReadListFn = fn(&[Value], &FieldFilters) -> Result<Decoded, ReadError>;
pub(crate) type CastFn = fn(&Value) -> Result<Decoded, String>;

#[derive(Clone, Copy)]
pub(crate) enum Strategy {
    Param {
        parse: ParseFn,
        present: Option<PresentFn>,
    },
    ParamList {
        parse: ParseListFn,
        present: Option<PresentFn>,
    },
    Read(ReadFn),
    ReadList(ReadListFn),
    Cast(CastFn),
    Opaque,
}

/// The type a binding converts its raw value into.
///
/// # Example
///
/// ```rust
/// use heron_controller::DeclaredType;
///
/// let limit = DeclaredType::scalar::<u32>();
/// assert_eq!(limit.name(), "u32");
/// assert!(!limit.is_list());
///
/// let tags = DeclaredType::list::<String>();
/// assert!(tags.is_list());
/// ```
#[derive(Clone, Copy)]
pub struct DeclaredType {
    name: &'static str,
    value_type: TypeId,
    list: bool,
    strategy: Strategy,
}

impl DeclaredType {
    /// A single value parsed from a string.
    #[must_use]
    pub fn scalar<T: FromParam>() -> Self {
        Self {
            name: type_name::<T>(),
            value_type: TypeId::of::<T>(),
            list: false,
            strategy: Strategy::Param {
                parse: parse_one::<T>,
                present: T::PRESENCE_FLAG.then_some(present_one::<T> as PresentFn),
            },
        }
    }

    /// A `Vec<T>` of values parsed from repeated strings.
    #[must_use]
    pub fn list<T: FromParam>() -> Self {
        Self {
            name: type_name::<Vec<T>>(),
            value_type: TypeId::of::<Vec<T>>(),
            list: true,
            strategy: Strategy::ParamList {
                parse: parse_many::<T>,
                present: T::PRESENCE_FLAG.then_some(present_many::<T> as PresentFn),
            },
        }
    }

    /// A domain object read from a body object.
    #[must_use]
    pub fn readable<T: ReadFrom>() -> Self {
        Self {
            name: type_name::<T>(),
            value_type: TypeId::of::<T>(),
            list: false,
            strategy: Strategy::Read(read_one::<T>),
        }
    }

    /// A `Vec<T>` of domain objects read from a body array.
    #[must_use]
    pub fn readable_list<T: ReadFrom>() -> Self {
        Self {
            name: type_name::<Vec<T>>(),
            value_type: TypeId::of::<Vec<T>>(),
            list: true,
            strategy: Strategy::ReadList(read_many::<T>),
        }
    }

    /// Any deserializable value, cast structurally from the body.
    ///
    /// Structured casts do not support field filters.
    #[must_use]
    pub fn structured<T: DeserializeOwned + Send + 'static>() -> Self {
        Self {
            name: type_name::<T>(),
            value_type: TypeId::of::<T>(),
            list: false,
            strategy: Strategy::Cast(cast::<T>),
        }
    }

    /// A type with no conversion contract.
    ///
    /// Registration rejects any binding of an opaque type; this constructor
    /// exists so such declarations can be described and reported.
    #[must_use]
    pub fn opaque<T: 'static>() -> Self {
        Self {
            name: type_name::<T>(),
            value_type: TypeId::of::<T>(),
            list: false,
            strategy: Strategy::Opaque,
        }
    }

    /// A `Vec<T>` of a type with no conversion contract.
    #[must_use]
    pub fn opaque_list<T: 'static>() -> Self {
        Self {
            name: type_name::<Vec<T>>(),
            value_type: TypeId::of::<Vec<T>>(),
            list: true,
            strategy: Strategy::Opaque,
        }
    }

    /// Returns the Rust type name of the decoded value.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the [`TypeId`] of the decoded value.
    #[must_use]
    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    /// Returns `true` if the decoded value is a `Vec`.
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.list
    }

    /// Returns `true` if body reads of this type honor field filters.
    #[must_use]
    pub fn supports_filters(&self) -> bool {
        matches!(self.strategy, Strategy::Read(_) | Strategy::ReadList(_))
    }

    pub(crate) fn strategy(&self) -> Strategy {
        self.strategy
    }
}

impl fmt::Debug for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredType")
            .field("name", &self.name)
            .field("list", &self.list)
            .finish_non_exhaustive()
    }
}

impl PartialEq for DeclaredType {
    fn eq(&self, other: &Self) -> bool {
        self.value_type == other.value_type
    }
}

impl Eq for DeclaredType {}

fn boxed<T: Send + 'static>(value: T) -> Decoded {
    Box::new(value)
}

fn parse_one<T: FromParam>(raw: &str) -> Result<Decoded, ParamError> {
    T::from_param(raw).map(boxed)
}

fn parse_many<T: FromParam>(raw: &[&str]) -> Result<Decoded, ParamError> {
    raw.iter()
        .map(|s| T::from_param(s))
        .collect::<Result<Vec<T>, _>>()
        .map(boxed)
}

fn present_one<T: FromParam>(_count: usize) -> Option<Decoded> {
    T::present().map(boxed)
}

fn present_many<T: FromParam>(count: usize) -> Option<Decoded> {
    (0..count)
        .map(|_| T::present())
        .collect::<Option<Vec<T>>>()
        .map(boxed)
}

fn read_one<T: ReadFrom>(
    data: &Map<String, Value>,
    filters: &FieldFilters,
) -> Result<Decoded, ReadError> {
    T::read_from(data, filters).map(boxed)
}

fn read_many<T: ReadFrom>(items: &[Value], filters: &FieldFilters) -> Result<Decoded, ReadError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(data) => T::read_from(data, filters),
            _ => Err(ReadError::Invalid(format!("element {i} is not an object"))),
        })
        .collect::<Result<Vec<T>, _>>()
        .map(boxed)
}

fn cast<T: DeserializeOwned + Send + 'static>(value: &Value) -> Result<Decoded, String> {
    T::deserialize(value).map(boxed).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use heron_extract::read_with_serde;
    use serde_json::json;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Item {
        name: String,
    }

    impl ReadFrom for Item {
        fn read_from(data: &Map<String, Value>, filters: &FieldFilters) -> Result<Self, ReadError> {
            read_with_serde(data, filters)
        }
    }

    fn unwrap<T: 'static>(value: Decoded) -> T {
        *value.downcast::<T>().unwrap()
    }

    #[test]
    fn test_scalar_parse() {
        let ty = DeclaredType::scalar::<i64>();
        let Strategy::Param { parse, present } = ty.strategy() else {
            panic!("expected param strategy");
        };
        assert!(present.is_none());
        assert_eq!(unwrap::<i64>(parse("42").unwrap()), 42);
        assert!(parse("abc").is_err());
        assert_eq!(ty.value_type(), TypeId::of::<i64>());
    }

    #[test]
    fn test_bool_has_presence() {
        let Strategy::Param { present, .. } = DeclaredType::scalar::<bool>().strategy() else {
            panic!("expected param strategy");
        };
        assert!(unwrap::<bool>(present.unwrap()(1).unwrap()));

        let Strategy::ParamList { present, .. } = DeclaredType::list::<bool>().strategy() else {
            panic!("expected list strategy");
        };
        assert_eq!(unwrap::<Vec<bool>>(present.unwrap()(3).unwrap()), vec![true; 3]);
    }

    #[test]
    fn test_list_parse_preserves_order() {
        let ty = DeclaredType::list::<String>();
        let Strategy::ParamList { parse, .. } = ty.strategy() else {
            panic!("expected list strategy");
        };
        let value = unwrap::<Vec<String>>(parse(&["c", "a", "b"]).unwrap());
        assert_eq!(value, vec!["c", "a", "b"]);
        assert_eq!(ty.value_type(), TypeId::of::<Vec<String>>());
    }

    #[test]
    fn test_readable_list_requires_objects() {
        let Strategy::ReadList(read) = DeclaredType::readable_list::<Item>().strategy() else {
            panic!("expected read-list strategy");
        };
        let items = [json!({ "name": "a" }), json!({ "name": "b" })];
        let value = unwrap::<Vec<Item>>(read(&items, &FieldFilters::new()).unwrap());
        assert_eq!(value.len(), 2);
        assert_eq!(value[1].name, "b");

        let err = read(&[json!({ "name": "a" }), json!(3)], &FieldFilters::new()).unwrap_err();
        assert_eq!(err, ReadError::Invalid("element 1 is not an object".into()));
    }

    #[test]
    fn test_structured_cast() {
        let ty = DeclaredType::structured::<Vec<u8>>();
        assert!(!ty.supports_filters());
        let Strategy::Cast(cast) = ty.strategy() else {
            panic!("expected cast strategy");
        };
        assert_eq!(unwrap::<Vec<u8>>(cast(&json!([1, 2])).unwrap()), vec![1, 2]);
        assert!(cast(&json!("x")).is_err());
    }

    #[test]
    fn test_filter_support() {
        assert!(DeclaredType::readable::<Item>().supports_filters());
        assert!(DeclaredType::readable_list::<Item>().supports_filters());
        assert!(!DeclaredType::scalar::<String>().supports_filters());
        assert!(!DeclaredType::opaque::<Item>().supports_filters());
    }

    #[test]
    fn test_equality_by_value_type() {
        assert_eq!(DeclaredType::scalar::<u8>(), DeclaredType::scalar::<u8>());
        assert_ne!(DeclaredType::scalar::<u8>(), DeclaredType::list::<u8>());
    }
}
