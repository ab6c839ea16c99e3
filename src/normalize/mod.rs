//! URI canonicalization for endpoint grouping.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::core::error::{LprofError, Result};

/// Placeholder substituted for every query value when masking is enabled.
const QUERY_MASK: &str = "xxx";

/// Base used to parse the origin-form URIs access logs carry.
static PARSE_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("http://localhost/").expect("static base URL"));

/// Canonicalizes raw request URIs into grouping keys.
///
/// A URI matching one of the configured patterns collapses into that
/// pattern's literal text, so many concrete paths share one synthetic key.
/// Otherwise the key is the path, with the query appended in masked form
/// when query-string mode is on.
#[derive(Debug)]
pub struct UriNormalizer {
    mask_query: bool,
    patterns: Vec<Regex>,
}

impl UriNormalizer {
    /// Compiles the collapsing patterns.
    ///
    /// An invalid pattern is a configuration error; it aborts setup before
    /// any record is read.
    pub fn new(mask_query: bool, patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(UriNormalizer {
            mask_query,
            patterns,
        })
    }

    /// Canonicalizes one raw URI.
    ///
    /// Patterns are tested in configured order against the raw URI; the
    /// first match wins. A malformed URI is a parse error the caller
    /// treats as a per-record skip, never as fatal.
    pub fn normalize(&self, raw: &str) -> Result<String> {
        for pattern in &self.patterns {
            if pattern.is_match(raw) {
                return Ok(pattern.as_str().to_string());
            }
        }

        let url = parse_request_uri(raw)?;

        if !self.mask_query {
            return Ok(url.path().to_string());
        }

        // One masked pair per distinct key, in canonical (sorted) key order.
        let mut keys: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        keys.sort_unstable();
        keys.dedup();

        let masked = keys
            .iter()
            .map(|k| format!("{}={}", k, QUERY_MASK))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!("{}?{}", url.path(), masked))
    }
}

/// Parses an origin-form ("/path?query") or absolute request URI.
fn parse_request_uri(raw: &str) -> Result<Url> {
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => PARSE_BASE
            .join(raw)
            .map_err(|e| LprofError::parse(format!("invalid uri '{}': {}", raw, e))),
        Err(e) => Err(LprofError::parse(format!("invalid uri '{}': {}", raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(mask_query: bool, patterns: &[&str]) -> UriNormalizer {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        UriNormalizer::new(mask_query, &patterns).unwrap()
    }

    #[test]
    fn test_path_only_without_masking() {
        let n = normalizer(false, &[]);
        assert_eq!(n.normalize("/a?x=1&y=2").unwrap(), "/a");
        assert_eq!(n.normalize("/users/42").unwrap(), "/users/42");
    }

    #[test]
    fn test_query_values_are_masked() {
        let n = normalizer(true, &[]);
        assert_eq!(n.normalize("/a?x=1&y=2").unwrap(), "/a?x=xxx&y=xxx");
    }

    #[test]
    fn test_masked_keys_are_canonically_ordered() {
        let n = normalizer(true, &[]);
        assert_eq!(
            n.normalize("/a?y=2&x=1").unwrap(),
            n.normalize("/a?x=9&y=8").unwrap()
        );
    }

    #[test]
    fn test_repeated_keys_mask_once() {
        let n = normalizer(true, &[]);
        assert_eq!(n.normalize("/a?x=1&x=2").unwrap(), "/a?x=xxx");
    }

    #[test]
    fn test_pattern_collapses_to_literal() {
        let n = normalizer(false, &[r"/users/\d+"]);
        assert_eq!(n.normalize("/users/42").unwrap(), r"/users/\d+");
        assert_eq!(n.normalize("/users/7/posts").unwrap(), r"/users/\d+");
        assert_eq!(n.normalize("/health").unwrap(), "/health");
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let n = normalizer(false, &[r"/users/\d+", r"/users/.*"]);
        assert_eq!(n.normalize("/users/42").unwrap(), r"/users/\d+");
        assert_eq!(n.normalize("/users/me").unwrap(), r"/users/.*");
    }

    #[test]
    fn test_absolute_uri() {
        let n = normalizer(false, &[]);
        assert_eq!(n.normalize("http://example.com/a/b?x=1").unwrap(), "/a/b");
    }

    #[test]
    fn test_malformed_uri_is_a_skip() {
        let n = normalizer(false, &[]);
        let err = n.normalize("http://[invalid").unwrap_err();
        assert!(err.is_skip());
    }

    #[test]
    fn test_invalid_pattern_is_a_config_error() {
        let result = UriNormalizer::new(false, &["/users/[0-9".to_string()]);
        assert!(result.is_err());
    }
}
