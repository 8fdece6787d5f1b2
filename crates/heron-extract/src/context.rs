//! Raw request parts handed to the binding engine.
//!
//! [`RequestParts`] is the request-context collaborator interface: the
//! transport and router have already done their work, and what remains is a
//! read-only view of the values bindings can draw from.

use bytes::Bytes;
use heron_router::Params;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};

use crate::QueryMap;

/// Read-only view of one request's raw values.
///
/// # Example
///
/// ```rust
/// use heron_extract::RequestParts;
/// use heron_router::Params;
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let mut params = Params::new();
/// params.push("id", "123");
///
/// let parts = RequestParts::new(
///     Method::GET,
///     Uri::from_static("/things/123?verbose"),
///     HeaderMap::new(),
///     Bytes::new(),
///     params,
/// );
///
/// assert_eq!(parts.method(), &Method::GET);
/// assert_eq!(parts.path_param("id"), Some("123"));
/// assert!(parts.query().contains("verbose"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestParts {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
    query: QueryMap,
}

impl RequestParts {
    /// Creates request parts, decoding the query string from `uri`.
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        path_params: Params,
    ) -> Self {
        let query = uri.query().map(QueryMap::parse).unwrap_or_default();
        Self {
            method,
            uri,
            headers,
            body,
            path_params,
            query,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the decoded query string.
    #[must_use]
    pub fn query(&self) -> &QueryMap {
        &self.query
    }

    /// Returns every value of a query parameter, in wire order.
    #[must_use]
    pub fn query_values(&self, name: &str) -> Vec<&str> {
        self.query.get_all(name)
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns every value of a header, in wire order.
    ///
    /// Header names are case-insensitive. Values are returned raw; decoding
    /// them to text is up to the caller.
    #[must_use]
    pub fn header_values(&self, name: &str) -> Vec<&HeaderValue> {
        self.headers.get_all(name).iter().collect()
    }

    /// Returns the `Content-Type` header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Returns the raw request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the path variables populated by the router.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns a single path variable.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name)
    }
}

/// Builder for constructing [`RequestParts`], mostly for tests.
#[derive(Debug, Default)]
pub struct RequestPartsBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
}

impl RequestPartsBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method. Defaults to `GET`.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI. Defaults to `/`.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Appends a header value; repeated calls with one name keep every value.
    ///
    /// Names are case-insensitive. Invalid names or values are skipped.
    #[must_use]
    pub fn header(self, name: &str, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => self.header_bytes(name, value),
            Err(_) => self,
        }
    }

    /// Appends a header value given as raw bytes, which need not be text.
    #[must_use]
    pub fn header_bytes(mut self, name: &str, value: impl Into<HeaderValue>) -> Self {
        if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
            self.headers.append(name, value.into());
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and a matching `Content-Type`.
    #[must_use]
    pub fn json(self, value: &serde_json::Value) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        self.header("content-type", "application/json").body(body)
    }

    /// Adds a single path variable.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Builds the request parts.
    #[must_use]
    pub fn build(self) -> RequestParts {
        RequestParts::new(
            self.method.unwrap_or(Method::GET),
            self.uri.unwrap_or_else(|| Uri::from_static("/")),
            self.headers,
            self.body,
            self.path_params,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parts_creation() {
        let mut params = Params::new();
        params.push("id", "42");

        let parts = RequestParts::new(
            Method::GET,
            Uri::from_static("/things/42?active=true"),
            HeaderMap::new(),
            Bytes::from_static(b""),
            params,
        );

        assert_eq!(parts.method(), &Method::GET);
        assert_eq!(parts.path(), "/things/42");
        assert_eq!(parts.query_values("active"), vec!["true"]);
        assert_eq!(parts.path_param("id"), Some("42"));
        assert_eq!(parts.path_param("other"), None);
    }

    #[test]
    fn test_builder() {
        let parts = RequestPartsBuilder::new()
            .method(Method::POST)
            .uri(Uri::from_static("/things"))
            .header("content-type", "application/json")
            .body(r#"{"name": "widget"}"#)
            .path_param("version", "v1")
            .build();

        assert_eq!(parts.method(), &Method::POST);
        assert_eq!(parts.content_type(), Some("application/json"));
        assert!(!parts.body().is_empty());
        assert_eq!(parts.path_param("version"), Some("v1"));
    }

    #[test]
    fn test_builder_defaults() {
        let parts = RequestPartsBuilder::new().build();
        assert_eq!(parts.method(), &Method::GET);
        assert_eq!(parts.path(), "/");
        assert!(parts.query().is_empty());
    }

    #[test]
    fn test_repeated_headers() {
        let parts = RequestPartsBuilder::new()
            .header("x-tag", "a")
            .header("x-tag", "b")
            .build();

        assert_eq!(parts.header_values("x-tag"), vec!["a", "b"]);
        assert_eq!(parts.header_values("X-Tag"), vec!["a", "b"]);
        assert!(parts.header_values("x-missing").is_empty());
    }

    #[test]
    fn test_header_names_any_case() {
        let parts = RequestPartsBuilder::new()
            .header("X-Tenant", "acme")
            .header("bad name", "skipped")
            .build();

        assert_eq!(parts.header_values("x-tenant"), vec!["acme"]);
        assert_eq!(parts.headers().len(), 1);
    }

    #[test]
    fn test_opaque_header_values_are_kept() {
        let value = HeaderValue::from_bytes(b"caf\xc3\xa9").unwrap();
        let parts = RequestPartsBuilder::new()
            .header_bytes("x-name", value)
            .build();

        let values = parts.header_values("x-name");
        assert_eq!(values.len(), 1);
        assert!(values[0].to_str().is_err());
    }

    #[test]
    fn test_json_builder() {
        let parts = RequestPartsBuilder::new()
            .json(&serde_json::json!({ "a": 1 }))
            .build();
        assert_eq!(parts.content_type(), Some("application/json"));
        assert_eq!(parts.body().as_ref(), br#"{"a":1}"#);
    }
}
