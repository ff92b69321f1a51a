//! Front matter decoding for `meta.yaml`.
//!
//! ```yaml
//! title: Hello World
//! date: 2024-01-05
//! categories:
//!   - Go
//!   - Web
//! description: First post.
//! ```
//!
//! All fields are optional. Unknown keys are ignored, missing text fields
//! decode as empty, and scalar values (numbers, booleans) are accepted
//! wherever text is expected.
//!
//! ## Dates
//!
//! `date` is read as text, trimmed, and parsed as exactly `YYYY-MM-DD`. A
//! scalar that fails that pattern fails the whole document. A `date` that is
//! null, a list or a mapping is not readable as text at all and leaves the
//! date unset instead: a missing date is not a malformed one.

use crate::types::{ArticleMeta, InvalidDate, PublishDate};
use serde::de::{self, Deserialize, Deserializer};
use serde_yaml::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("front matter must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// Decode a raw metadata document.
///
/// An empty document decodes to [`ArticleMeta::default`].
pub fn parse(raw: &[u8]) -> Result<ArticleMeta, FrontMatterError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(ArticleMeta::default());
    }
    let value: Value = serde_yaml::from_slice(raw)?;
    match value {
        Value::Null => Ok(ArticleMeta::default()),
        Value::Mapping(_) => Ok(serde_yaml::from_value(value)?),
        other => Err(FrontMatterError::NotAMapping(kind_name(&other))),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

impl PublishDate {
    /// Apply the `date` decoding rule to an already-parsed YAML node.
    pub fn from_yaml(value: &Value) -> Result<Self, InvalidDate> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Number(n) => Self::parse(&n.to_string()),
            Value::Bool(b) => Self::parse(&b.to_string()),
            Value::Tagged(tagged) => Self::from_yaml(&tagged.value),
            Value::Null | Value::Sequence(_) | Value::Mapping(_) => Ok(Self::unset()),
        }
    }
}

impl<'de> Deserialize<'de> for PublishDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_yaml(&value).map_err(de::Error::custom)
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Tagged(tagged) => scalar_text(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

pub(crate) fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    scalar_text(value).ok_or_else(|| de::Error::custom("expected a string"))
}

/// Categories: a sequence of scalars. Entries are trimmed and blank ones dropped.
pub(crate) fn scalar_strings<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let text = scalar_text(item)
                    .ok_or_else(|| de::Error::custom("expected a list of strings"))?;
                let text = text.trim();
                if !text.is_empty() {
                    out.push(text.to_string());
                }
            }
            Ok(out)
        }
        _ => Err(de::Error::custom("expected a list of strings")),
    }
}
