//! Identifier types used throughout the Blockramp core.
//!
//! Post ids are the host CMS's positive integer ids; post types are
//! identified by their sanitized slug.

use crate::CriteriaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a post in the host CMS. Always strictly positive; the
/// host uses `0` to mean "no post", which is represented here as the
/// absence of a `PostId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct PostId(u64);

impl PostId {
    /// Creates a post id, rejecting zero.
    pub fn new(id: u64) -> crate::Result<Self> {
        if id == 0 {
            return Err(CriteriaError::InvalidPostId("0".to_string()));
        }
        Ok(Self(id))
    }

    /// Parses a post id from a raw query-string value.
    ///
    /// Anything non-numeric, negative or zero yields `None` — the host
    /// treats all of those as "no post in this request".
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u64>().ok().and_then(|id| Self::new(id).ok())
    }

    /// Returns the numeric id.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for PostId {
    type Error = CriteriaError;

    fn try_from(id: u64) -> crate::Result<Self> {
        Self::new(id)
    }
}

impl From<PostId> for u64 {
    fn from(id: PostId) -> Self {
        id.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slug identifying a post type (`post`, `page`, a custom type, ...).
///
/// Invariant: non-empty and equal to its own sanitized form, so slugs can
/// be compared byte-for-byte against registry entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostTypeSlug(String);

impl PostTypeSlug {
    /// Creates a slug, rejecting input that is not already sanitized.
    pub fn new(raw: &str) -> crate::Result<Self> {
        let clean = sanitize(raw);
        if clean.is_empty() || clean != raw {
            return Err(CriteriaError::InvalidPostType(raw.to_string()));
        }
        Ok(Self(clean))
    }

    /// Sanitizes arbitrary input into a slug, as the host would for a
    /// query parameter. Returns `None` when nothing survives.
    #[must_use]
    pub fn sanitized(raw: &str) -> Option<Self> {
        let clean = sanitize(raw);
        if clean.is_empty() { None } else { Some(Self(clean)) }
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PostTypeSlug {
    type Error = CriteriaError;

    fn try_from(raw: String) -> crate::Result<Self> {
        Self::new(&raw)
    }
}

impl From<PostTypeSlug> for String {
    fn from(slug: PostTypeSlug) -> Self {
        slug.0
    }
}

impl FromStr for PostTypeSlug {
    type Err = CriteriaError;

    fn from_str(raw: &str) -> crate::Result<Self> {
        Self::new(raw)
    }
}

impl fmt::Display for PostTypeSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercases, turns whitespace and hyphen runs into single hyphens, keeps
/// `[a-z0-9_-]` and drops everything else. Idempotent.
fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_hyphen = false;
    for ch in raw.trim().chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else if ch == '-' || ch.is_whitespace() {
            pending_hyphen = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_id_rejects_zero() {
        assert!(PostId::new(0).is_err());
        assert_eq!(PostId::new(7).unwrap().get(), 7);
    }

    #[test]
    fn post_id_parse_from_query_string() {
        assert_eq!(PostId::parse("42"), Some(PostId::new(42).unwrap()));
        assert_eq!(PostId::parse(" 42 "), Some(PostId::new(42).unwrap()));
        assert_eq!(PostId::parse("0"), None);
        assert_eq!(PostId::parse("-4"), None);
        assert_eq!(PostId::parse("abc"), None);
        assert_eq!(PostId::parse("4.2"), None);
        assert_eq!(PostId::parse(""), None);
    }

    #[test]
    fn post_id_serde_rejects_zero() {
        assert!(serde_json::from_str::<PostId>("0").is_err());
        let id: PostId = serde_json::from_str("42").unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn slug_accepts_sanitized_input() {
        assert!(PostTypeSlug::new("post").is_ok());
        assert!(PostTypeSlug::new("my_cpt").is_ok());
        assert!(PostTypeSlug::new("news-item").is_ok());
    }

    #[test]
    fn slug_rejects_unsanitized_input() {
        assert!(PostTypeSlug::new("Page").is_err());
        assert!(PostTypeSlug::new("my type").is_err());
        assert!(PostTypeSlug::new("-post").is_err());
        assert!(PostTypeSlug::new("").is_err());
        assert!(PostTypeSlug::new("post!").is_err());
    }

    #[test]
    fn slug_sanitized_coerces() {
        assert_eq!(PostTypeSlug::sanitized("Page").unwrap().as_str(), "page");
        assert_eq!(PostTypeSlug::sanitized("My Type").unwrap().as_str(), "my-type");
        assert_eq!(PostTypeSlug::sanitized("  post  ").unwrap().as_str(), "post");
        assert_eq!(PostTypeSlug::sanitized("a--b").unwrap().as_str(), "a-b");
        assert_eq!(PostTypeSlug::sanitized("###"), None);
        assert_eq!(PostTypeSlug::sanitized(""), None);
    }

    #[test]
    fn sanitize_is_idempotent_on_fixtures() {
        for raw in ["Page One", "a--b", "-trailing-", "CAPS_and_underscores"] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once);
        }
    }
}
