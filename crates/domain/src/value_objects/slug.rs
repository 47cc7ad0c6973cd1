//! Slug value object and page addressing.
//!
//! A sheet page is addressed as `character.html?troy`, optionally with a
//! cache-bust suffix (`character.html?troy&v=3`). Older pages used
//! `?char=troy` or `#troy`; those forms are still understood.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;

use crate::error::DomainError;

/// Short text identifier addressing one stored character record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Create a slug, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the trimmed slug is empty.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("slug cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extracts the slug from a page address.
///
/// Accepts a full URL, a bare `?query` / `#fragment`, or a bare slug. The
/// lookup order is: the first query segment when it is not itself a
/// `key=value` pair, then a `char=` parameter, then the fragment. Returns `None`
/// when the page carries no identifier, which is a valid state.
pub fn slug_from_page(page: &str) -> Option<Slug> {
    let (query, fragment) = split_address(page.trim());

    slug_from_query(query).or_else(|| decode_segment(fragment).and_then(|s| Slug::new(s).ok()))
}

fn split_address(page: &str) -> (&str, &str) {
    let (before_fragment, fragment) = match page.split_once('#') {
        Some((head, frag)) => (head, frag),
        None => (page, ""),
    };
    match before_fragment.split_once('?') {
        Some((_, query)) => (query, fragment),
        // A bare value with no address syntax is taken as the slug itself
        None if fragment.is_empty() && !before_fragment.contains(['/', ':', '.']) => {
            (before_fragment, fragment)
        }
        None => ("", fragment),
    }
}

fn slug_from_query(query: &str) -> Option<Slug> {
    if query.is_empty() {
        return None;
    }

    let first = query.split('&').next().unwrap_or_default();
    if !first.contains('=') {
        if let Some(slug) = decode_segment(first).and_then(|s| Slug::new(s).ok()) {
            return Some(slug);
        }
    }

    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "char")
        .and_then(|(_, value)| Slug::new(value.as_ref()).ok())
}

fn decode_segment(segment: &str) -> Option<String> {
    if segment.is_empty() {
        return None;
    }
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
}
