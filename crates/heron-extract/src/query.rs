//! Multi-valued query strings.

/// The query string of a request, decoded into ordered key/value pairs.
///
/// Keys may repeat; [`QueryMap::get_all`] returns every value for a key in
/// wire order. Keys are case-sensitive. Values are percent-decoded and `+`
/// is read as a space.
///
/// # Example
///
/// ```rust
/// use heron_extract::QueryMap;
///
/// let query = QueryMap::parse("tag=a&limit=10&tag=b+c");
/// assert_eq!(query.get_all("tag"), vec!["a", "b c"]);
/// assert_eq!(query.get_all("Tag"), Vec::<&str>::new());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    pairs: Vec<(String, String)>,
}

impl QueryMap {
    /// Creates an empty query map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string (without the leading `?`).
    ///
    /// Decoding is lossy and never fails the request: bytes that are not
    /// valid UTF-8 after percent-decoding become U+FFFD. A bare key such as
    /// `flag` in `?flag` is kept with an empty value.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
        Self { pairs }
    }

    /// Returns every value for `name`, in wire order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns `true` if `name` appears at least once.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over all pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let query = QueryMap::parse("");
        assert!(query.is_empty());
        assert!(query.get_all("a").is_empty());
    }

    #[test]
    fn test_repeated_keys_preserve_order() {
        let query = QueryMap::parse("tags=x&other=1&tags=y&tags=z");
        assert_eq!(query.get_all("tags"), vec!["x", "y", "z"]);
        assert_eq!(query.len(), 4);
    }

    #[test]
    fn test_percent_decoding() {
        let query = QueryMap::parse("q=rust%20lang&name=a+b");
        assert_eq!(query.get_all("q"), vec!["rust lang"]);
        assert_eq!(query.get_all("name"), vec!["a b"]);
    }

    #[test]
    fn test_bare_key() {
        let query = QueryMap::parse("verbose&limit=5");
        assert!(query.contains("verbose"));
        assert_eq!(query.get_all("verbose"), vec![""]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let query = QueryMap::parse("name=%FF&limit=5");
        assert_eq!(query.get_all("name"), vec!["\u{FFFD}"]);
        assert_eq!(query.get_all("limit"), vec!["5"]);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let query = QueryMap::parse("Limit=5");
        assert!(!query.contains("limit"));
        assert!(query.contains("Limit"));
    }

    #[test]
    fn test_iter() {
        let query = QueryMap::parse("a=1&b=2");
        let pairs: Vec<_> = query.iter().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }
}
