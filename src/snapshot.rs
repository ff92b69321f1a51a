//! Immutable content snapshots handed to the presentation layer.
//!
//! A [`ContentSnapshot`] bundles one collection with both of its indices.
//! It is produced once at start-up and only read afterwards; share it behind
//! an `Arc`. A [`Library`] holds the snapshot of the main article root and,
//! optionally, one for a curated root with the same on-disk shape.

use crate::collection::{self, BuildError, Collection};
use crate::config::SiteConfig;
use crate::index::{self, CategoryIndex};
use crate::types::Article;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
#[error("failed to build {name} content from {}: {source}", .root.display())]
pub struct SnapshotError {
    pub name: &'static str,
    pub root: PathBuf,
    #[source]
    pub source: BuildError,
}

/// A collection and its indices, frozen together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSnapshot {
    root: PathBuf,
    collection: Collection,
    by_date: Vec<Arc<Article>>,
    by_category: CategoryIndex,
    unlisted: BTreeSet<String>,
}

impl ContentSnapshot {
    /// Derive both indices from an already-built collection.
    pub fn from_collection(root: impl Into<PathBuf>, collection: Collection) -> Self {
        let by_date = index::by_date(&collection);
        let by_category = index::by_category(&collection);
        Self {
            root: root.into(),
            collection,
            by_date,
            by_category,
            unlisted: BTreeSet::new(),
        }
    }

    /// Build the collection under `root` and index it.
    pub fn build(root: &Path) -> Result<Self, BuildError> {
        Ok(Self::from_collection(root, collection::build(root)?))
    }

    /// Like [`ContentSnapshot::build`], loading articles on the rayon pool.
    pub fn build_parallel(root: &Path) -> Result<Self, BuildError> {
        Ok(Self::from_collection(root, collection::build_parallel(root)?))
    }

    /// Exclude these slugs from [`ContentSnapshot::listed`]. They stay
    /// addressable by slug and keep their category entries.
    pub fn with_unlisted<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unlisted = slugs.into_iter().map(Into::into).collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Every article, newest first.
    pub fn by_date(&self) -> &[Arc<Article>] {
        &self.by_date
    }

    pub fn by_category(&self) -> &CategoryIndex {
        &self.by_category
    }

    pub fn article(&self, slug: &str) -> Option<&Arc<Article>> {
        self.collection.get(slug)
    }

    /// Articles in a category, oldest first. `None` for an unknown category.
    pub fn category(&self, key: &str) -> Option<&[Arc<Article>]> {
        self.by_category.get(key)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.by_category.keys()
    }

    /// The public feed: newest first, without unlisted slugs.
    pub fn listed(&self) -> impl Iterator<Item = &Arc<Article>> {
        self.by_date
            .iter()
            .filter(|a| !self.unlisted.contains(&a.slug))
    }

    pub fn is_unlisted(&self, slug: &str) -> bool {
        self.unlisted.contains(slug)
    }

    /// Serializable view used for JSON export.
    pub fn export(&self) -> SnapshotExport<'_> {
        SnapshotExport {
            root: self.root.display().to_string(),
            articles: self.by_date.iter().map(AsRef::as_ref).collect(),
            categories: self
                .by_category
                .iter()
                .map(|(key, bucket)| (key, bucket.iter().map(|a| a.slug.as_str()).collect()))
                .collect(),
            unlisted: self.unlisted.iter().map(String::as_str).collect(),
        }
    }
}

/// JSON shape of a snapshot: articles newest first, categories as slug lists.
#[derive(Debug, Serialize)]
pub struct SnapshotExport<'a> {
    pub root: String,
    pub articles: Vec<&'a Article>,
    pub categories: BTreeMap<&'a str, Vec<&'a str>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unlisted: Vec<&'a str>,
}

/// Every configured content root, built and indexed.
#[derive(Debug, Clone)]
pub struct Library {
    pub articles: ContentSnapshot,
    pub curated: Option<ContentSnapshot>,
}

impl Library {
    /// Build every root named in `config`. Relative roots resolve against `base_dir`.
    ///
    /// Fails on the first root that fails; nothing is returned partially.
    pub fn load(config: &SiteConfig, base_dir: &Path, parallel: bool) -> Result<Self, SnapshotError> {
        let build = |name: &'static str, root: PathBuf| {
            let built = if parallel {
                ContentSnapshot::build_parallel(&root)
            } else {
                ContentSnapshot::build(&root)
            };
            built.map_err(|source| SnapshotError { name, root, source })
        };

        let articles = build("articles", config.content.articles_root(base_dir))?
            .with_unlisted(config.content.unlisted.iter().cloned());
        let curated = match config.content.curated_root(base_dir) {
            Some(root) => Some(build("curated", root)?),
            None => None,
        };

        info!(
            articles = articles.collection().len(),
            categories = articles.by_category().len(),
            curated = curated.as_ref().map_or(0, |c| c.collection().len()),
            "content library ready"
        );
        Ok(Self { articles, curated })
    }
}
