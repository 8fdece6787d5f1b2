//! The structured-body read contract.
//!
//! Domain objects bound from a request body implement [`ReadFrom`]. The
//! engine hands them the decoded JSON object together with the
//! [`FieldFilters`] declared on the binding.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors produced while reading a domain object from a body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Keys listed in `reject` were present.
    #[error("rejected keys present: {}", .0.join(", "))]
    RejectedKeys(Vec<String>),

    /// Keys listed in `require` were absent.
    #[error("required keys missing: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    /// The data does not describe a valid object.
    #[error("{0}")]
    Invalid(String),
}

/// Key filters applied to a body object before it is read.
///
/// - `ignore`: keys dropped before reading
/// - `reject`: keys that fail the read when present
/// - `require`: keys that fail the read when absent
///
/// Filter kinds may be combined. A key that is both rejected and required
/// can never be satisfied; [`FieldFilters::conflicts`] reports such keys so
/// they can be refused when the binding is declared.
///
/// # Example
///
/// ```rust
/// use heron_extract::{FieldFilters, ReadError};
/// use serde_json::json;
///
/// let filters = FieldFilters::new().ignore(["id"]).reject(["owner"]).require(["name"]);
///
/// let ok = json!({ "id": 7, "name": "widget" });
/// let filtered = filters.apply(ok.as_object().unwrap()).unwrap();
/// assert!(!filtered.contains_key("id"));
///
/// let bad = json!({ "owner": "mallory" });
/// assert!(matches!(filters.apply(bad.as_object().unwrap()), Err(ReadError::RejectedKeys(_))));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilters {
    ignore: Vec<String>,
    reject: Vec<String>,
    require: Vec<String>,
}

impl FieldFilters {
    /// Creates an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds keys to drop before reading.
    #[must_use]
    pub fn ignore<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Adds keys that must not be present.
    #[must_use]
    pub fn reject<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reject.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Adds keys that must be present.
    #[must_use]
    pub fn require<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Returns `true` if no filters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ignore.is_empty() && self.reject.is_empty() && self.require.is_empty()
    }

    /// Returns the ignored keys.
    #[must_use]
    pub fn ignored(&self) -> &[String] {
        &self.ignore
    }

    /// Returns the rejected keys.
    #[must_use]
    pub fn rejected(&self) -> &[String] {
        &self.reject
    }

    /// Returns the required keys.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.require
    }

    /// Returns keys that are both rejected and required.
    #[must_use]
    pub fn conflicts(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .reject
            .iter()
            .filter(|k| self.require.contains(k))
            .cloned()
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Checks `object` against the filters and returns it without ignored keys.
    ///
    /// Required keys are checked before ignored keys are dropped, so a key
    /// both required and ignored must be sent but is not read.
    pub fn apply(&self, object: &Map<String, Value>) -> Result<Map<String, Value>, ReadError> {
        let rejected: Vec<String> = self
            .reject
            .iter()
            .filter(|k| object.contains_key(k.as_str()))
            .cloned()
            .collect();
        if !rejected.is_empty() {
            return Err(ReadError::RejectedKeys(rejected));
        }

        let missing: Vec<String> = self
            .require
            .iter()
            .filter(|k| !object.contains_key(k.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ReadError::MissingKeys(missing));
        }

        Ok(object
            .iter()
            .filter(|(k, _)| !self.ignore.contains(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

/// Domain objects that can be read from a structured request body.
///
/// # Example
///
/// ```rust
/// use heron_extract::{read_with_serde, FieldFilters, ReadError, ReadFrom};
/// use serde::Deserialize;
/// use serde_json::{json, Map, Value};
///
/// #[derive(Debug, Deserialize)]
/// struct Thing {
///     name: String,
/// }
///
/// impl ReadFrom for Thing {
///     fn read_from(data: &Map<String, Value>, filters: &FieldFilters) -> Result<Self, ReadError> {
///         read_with_serde(data, filters)
///     }
/// }
///
/// let body = json!({ "name": "widget" });
/// let thing = Thing::read_from(body.as_object().unwrap(), &FieldFilters::new()).unwrap();
/// assert_eq!(thing.name, "widget");
/// ```
pub trait ReadFrom: Sized + Send + Sync + 'static {
    /// Reads an instance from a body object, honoring `filters`.
    fn read_from(data: &Map<String, Value>, filters: &FieldFilters) -> Result<Self, ReadError>;
}

/// Applies `filters` to `data` and deserializes the result with serde.
///
/// This is the usual body of a [`ReadFrom`] implementation for types that
/// derive `Deserialize`.
pub fn read_with_serde<T: DeserializeOwned>(
    data: &Map<String, Value>,
    filters: &FieldFilters,
) -> Result<T, ReadError> {
    let filtered = filters.apply(data)?;
    serde_json::from_value(Value::Object(filtered)).map_err(|e| ReadError::Invalid(e.to_string()))
}
