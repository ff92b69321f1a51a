//! Site configuration module.
//!
//! Handles loading and validating `quire.toml`. Stock defaults are the base
//! layer; the user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [content]
//! articles = "posts"        # Main article root, one subdirectory per article
//! # curated = "picks"       # Optional second root with the same layout
//! unlisted = ["about"]      # Slugs kept out of the feed (still served by slug)
//!
//! [processing]
//! max_processes = 4         # Max parallel loaders (omit for auto = CPU cores)
//! ```
//!
//! Relative paths resolve against the directory holding `quire.toml`.
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "quire.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `quire.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Where articles live.
    pub content: ContentConfig,
    /// Parallel loading settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content.articles.trim().is_empty() {
            return Err(ConfigError::Validation(
                "content.articles must not be empty".into(),
            ));
        }
        if let Some(curated) = &self.content.curated {
            if curated.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "content.curated must not be empty when set".into(),
                ));
            }
            if curated == &self.content.articles {
                return Err(ConfigError::Validation(
                    "content.curated must differ from content.articles".into(),
                ));
            }
        }
        if let Some(bad) = self
            .content
            .unlisted
            .iter()
            .find(|s| s.is_empty() || s.contains(['/', '\\']))
        {
            return Err(ConfigError::Validation(format!(
                "content.unlisted entry '{bad}' is not a valid slug"
            )));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Content roots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Main article root.
    pub articles: String,
    /// Optional curated root, built as an independent collection.
    pub curated: Option<String>,
    /// Slugs loaded and addressable but left out of the listing feed.
    pub unlisted: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            articles: "posts".to_string(),
            curated: None,
            unlisted: vec!["about".to_string()],
        }
    }
}

impl ContentConfig {
    pub fn articles_root(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.articles)
    }

    pub fn curated_root(&self, base_dir: &Path) -> Option<PathBuf> {
        self.curated.as_ref().map(|c| base_dir.join(c))
    }
}

/// Parallel loading settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel article loaders.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is missing.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Directory that relative content roots resolve against.
pub fn base_dir(config_path: &Path) -> &Path {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Returns a fully-commented stock `quire.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Quire Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Relative paths are resolved against the directory holding this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Content roots
# ---------------------------------------------------------------------------
[content]
# Main article root. Each subdirectory holding a meta.yaml is one article:
#   posts/<slug>/meta.yaml   front matter (title, date, categories, description)
#   posts/<slug>/post.md     markdown body
articles = "posts"

# Optional second root with the same layout, built as its own collection.
# curated = "picks"

# Slugs that are loaded and reachable by slug but left out of the feed.
unlisted = ["about"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel article loaders.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
