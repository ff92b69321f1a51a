//! Shared content types.
//!
//! An [`Article`] is what the loader produces for one `<slug>/` directory:
//! decoded front matter plus the rendered body. Everything downstream (the
//! collection, both indices, the snapshot handed to the presentation layer)
//! holds these behind an `Arc` and never mutates them.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Textual pattern accepted for publish dates (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid date '{0}': expected YYYY-MM-DD")]
pub struct InvalidDate(pub String);

/// Publish date from front matter.
///
/// A date that was never set (field absent, null, or not a scalar) is the
/// zero value and orders before every real date. This mirrors how an unset
/// date sorts as "oldest" in both indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublishDate(Option<NaiveDate>);

impl PublishDate {
    /// The zero value.
    pub const fn unset() -> Self {
        Self(None)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|d| Self(Some(d)))
    }

    /// Parse a date string strictly as `YYYY-MM-DD` after trimming whitespace.
    ///
    /// Only the exact 4-2-2 digit shape is accepted: `2024-1-5`,
    /// `2024/01/05` and `05-01-2024` are all rejected, as are impossible
    /// calendar dates like `2024-02-30`.
    pub fn parse(raw: &str) -> Result<Self, InvalidDate> {
        let trimmed = raw.trim();
        let bytes = trimmed.as_bytes();
        let shaped = bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !shaped {
            return Err(InvalidDate(trimmed.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(|d| Self(Some(d)))
            .map_err(|_| InvalidDate(trimmed.to_string()))
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.0
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

/// Formats with [`DATE_FORMAT`]; the zero value formats as an empty string.
impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            None => Ok(()),
        }
    }
}

impl Serialize for PublishDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(date) => serializer.collect_str(&date.format(DATE_FORMAT)),
            None => serializer.serialize_none(),
        }
    }
}

/// Structured front matter decoded from `meta.yaml`.
///
/// Missing fields default to empty; unknown fields are ignored. Decoding
/// rules live in [`crate::frontmatter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ArticleMeta {
    #[serde(deserialize_with = "crate::frontmatter::scalar_string")]
    pub title: String,
    pub date: PublishDate,
    /// Categories in authoring order. Compared case-insensitively by the indices.
    #[serde(deserialize_with = "crate::frontmatter::scalar_strings")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "crate::frontmatter::scalar_string")]
    pub description: String,
}

impl ArticleMeta {
    /// Lower-cased category keys, de-duplicated, in authoring order.
    pub fn category_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::with_capacity(self.categories.len());
        for category in &self.categories {
            let key = category.to_lowercase();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    pub fn has_category(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.categories.iter().any(|c| c.to_lowercase() == key)
    }
}

/// Rendered article body, safe to embed directly in a page.
///
/// Only [`crate::render`] constructs values of this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SafeMarkup(String);

impl SafeMarkup {
    pub(crate) fn from_rendered(html: String) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SafeMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lets templates interpolate a body with `(article.body)` without re-escaping.
impl maud::Render for SafeMarkup {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(&self.0);
    }
}

/// One authored article: slug, front matter and rendered body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    /// Source directory name; unique within a collection.
    pub slug: String,
    pub meta: ArticleMeta,
    pub body: SafeMarkup,
}
