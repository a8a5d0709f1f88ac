//! Cache Key Module
//!
//! Derives a stable cache key from a request path and its query parameters.

use axum::http::Uri;

use crate::cache::MAX_KEY_LENGTH;
use crate::error::{CacheError, Result};

// == Derive Key ==
/// Builds the cache key for a path and its query parameters.
///
/// Parameters are sorted by name (stable, so same-named pairs keep their
/// arrival order) and appended as `|name-value`. Nothing is decoded or
/// case-folded.
///
/// # Example
/// ```
/// use response_cache::cache::derive_key;
///
/// let key = derive_key("/items", &[("b", "2"), ("a", "1")]);
/// assert_eq!(key, "/items|a-1|b-2");
/// ```
pub fn derive_key(path: &str, params: &[(&str, &str)]) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let mut key = String::with_capacity(path.len() + sorted.len() * 8);
    key.push_str(path);
    for (name, value) in sorted {
        key.push('|');
        key.push_str(name);
        key.push('-');
        key.push_str(value);
    }
    key
}

// == Parse Query ==
/// Splits a raw query string into name/value pairs without decoding.
///
/// Empty segments are skipped; a segment without `=` has an empty value.
pub fn parse_query(raw: &str) -> Vec<(&str, &str)> {
    raw.split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.split_once('=').unwrap_or((segment, "")))
        .collect()
}

// == Key For Uri ==
/// Derives and validates the cache key for a request URI.
///
/// Returns `MalformedKey` when the result cannot be stored as a key, in which
/// case the caller should bypass the cache for this request.
pub fn key_for_uri(uri: &Uri) -> Result<String> {
    let path = uri.path();
    if path.is_empty() {
        return Err(CacheError::MalformedKey("empty request path".to_string()));
    }

    let params = uri.query().map(parse_query).unwrap_or_default();
    let key = derive_key(path, &params);
    validate_key(&key)?;
    Ok(key)
}

// == Validate Key ==
/// Checks that a key fits the persisted key column.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::MalformedKey("key cannot be empty".to_string()));
    }
    if key.chars().count() > MAX_KEY_LENGTH {
        return Err(CacheError::MalformedKey(format!(
            "key exceeds maximum length of {} characters",
            MAX_KEY_LENGTH
        )));
    }
    if key.chars().any(char::is_control) {
        return Err(CacheError::MalformedKey(
            "key contains control characters".to_string(),
        ));
    }
    Ok(())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_without_params_is_path() {
        assert_eq!(derive_key("/health", &[]), "/health");
    }

    #[test]
    fn test_key_sorts_by_name() {
        let a = derive_key("/items", &[("b", "2"), ("a", "1")]);
        let b = derive_key("/items", &[("a", "1"), ("b", "2")]);
        assert_eq!(a, "/items|a-1|b-2");
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_duplicate_names_keep_arrival_order() {
        assert_eq!(
            derive_key("/q", &[("z", "0"), ("a", "1"), ("a", "2")]),
            "/q|a-1|a-2|z-0"
        );
        assert_eq!(derive_key("/q", &[("a", "2"), ("a", "1")]), "/q|a-2|a-1");
    }

    #[test]
    fn test_key_is_case_and_encoding_sensitive() {
        assert_ne!(derive_key("/Items", &[]), derive_key("/items", &[]));
        assert_ne!(
            derive_key("/s", &[("q", "a%20b")]),
            derive_key("/s", &[("q", "a b")])
        );
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(
            parse_query("x=1&&flag&y=a=b"),
            vec![("x", "1"), ("flag", ""), ("y", "a=b")]
        );
        assert!(parse_query("").is_empty());
    }

    #[test]
    fn test_key_for_uri() {
        let uri: Uri = "/widgets?x=1".parse().unwrap();
        assert_eq!(key_for_uri(&uri).unwrap(), "/widgets|x-1");

        let uri: Uri = "/search?q=Caf%C3%A9&a=1".parse().unwrap();
        assert_eq!(key_for_uri(&uri).unwrap(), "/search|a-1|q-Caf%C3%A9");
    }

    #[test]
    fn test_key_for_uri_too_long() {
        let uri: Uri = format!("/long?q={}", "x".repeat(MAX_KEY_LENGTH))
            .parse()
            .unwrap();
        assert!(matches!(key_for_uri(&uri), Err(CacheError::MalformedKey(_))));
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("/ok|a-1").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/bad\nkey").is_err());
        assert!(validate_key(&"k".repeat(MAX_KEY_LENGTH)).is_ok());
    }
}
