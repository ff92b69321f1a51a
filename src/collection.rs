//! Building a [`Collection`] from a content root.
//!
//! Every immediate subdirectory of the root is a candidate article. The walk
//! follows these rules:
//!
//! - Files at the root and hidden entries (`.git`, `.drafts`, ...) are ignored.
//! - A subdirectory without `meta.yaml` is scaffolding, not an article, and is
//!   skipped silently.
//! - Anything else must load. The first failure, in name order, aborts the
//!   build and no partial collection is returned.
//!
//! Subdirectories are visited in sorted name order, so both the error
//! reported for a broken tree and the tie order of equal dates in the indices
//! are the same on every run.
//!
//! [`build`] loads sequentially. [`build_parallel`] loads on the rayon pool
//! and still reports the first failure by name order rather than whichever
//! worker failed first.

use crate::loader::{self, ErrorKind, LoadError};
use crate::types::Article;
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("cannot list content directory {}: {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Article(#[from] LoadError),
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::DirectoryUnreadable { .. } => ErrorKind::DirectoryUnreadable,
            BuildError::Article(err) => err.kind(),
        }
    }

    /// Slug of the failing article, if the failure was article-specific.
    pub fn slug(&self) -> Option<&str> {
        match self {
            BuildError::DirectoryUnreadable { .. } => None,
            BuildError::Article(err) => Some(err.slug()),
        }
    }
}

/// All articles of one content root, keyed by slug.
///
/// Built once and then only read. Articles are shared with the indices
/// through `Arc`, so an index entry is always the same article as the
/// collection entry under its slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    articles: BTreeMap<String, Arc<Article>>,
}

impl Collection {
    pub fn get(&self, slug: &str) -> Option<&Arc<Article>> {
        self.articles.get(slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.articles.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Articles in slug order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Article>> {
        self.articles.values()
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.articles.keys().map(String::as_str)
    }
}

/// Later articles replace earlier ones with the same slug.
impl FromIterator<Article> for Collection {
    fn from_iter<I: IntoIterator<Item = Article>>(iter: I) -> Self {
        let articles = iter
            .into_iter()
            .map(|article| (article.slug.clone(), Arc::new(article)))
            .collect();
        Self { articles }
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.articles.iter().map(|(slug, a)| (slug, a.as_ref())))
    }
}

/// Build the collection for `root`, loading articles one at a time.
pub fn build(root: &Path) -> Result<Collection, BuildError> {
    let slugs = article_slugs(root)?;
    let mut articles = Vec::with_capacity(slugs.len());
    for slug in &slugs {
        articles.push(loader::load(root, slug)?);
    }
    Ok(finish(root, articles))
}

/// Build the collection for `root`, loading articles on the rayon pool.
pub fn build_parallel(root: &Path) -> Result<Collection, BuildError> {
    let slugs = article_slugs(root)?;
    let loaded: Vec<Result<Article, LoadError>> = slugs
        .par_iter()
        .map(|slug| loader::load(root, slug))
        .collect();

    // `loaded` is in slug order regardless of completion order.
    let articles = loaded.into_iter().collect::<Result<Vec<_>, _>>()?;
    Ok(finish(root, articles))
}

fn finish(root: &Path, articles: Vec<Article>) -> Collection {
    let collection: Collection = articles.into_iter().collect();
    info!(
        root = %root.display(),
        articles = collection.len(),
        "built collection"
    );
    collection
}

/// Slugs of every article directory under `root`, in name order.
pub fn article_slugs(root: &Path) -> Result<Vec<String>, BuildError> {
    let unreadable = |source: io::Error| BuildError::DirectoryUnreadable {
        path: root.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();

    let mut slugs = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let Some(name) = dir.file_name() else {
            continue;
        };
        if name.as_encoded_bytes().starts_with(b".") {
            continue;
        }
        if let Ok(false) = dir.join(loader::META_FILE).try_exists() {
            debug!(dir = %dir.display(), "skipping directory without {}", loader::META_FILE);
            continue;
        }
        // Existence errors fall through and surface when the loader reads the file.
        let Some(slug) = name.to_str() else {
            return Err(unreadable(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("directory name {} is not valid UTF-8", dir.display()),
            )));
        };
        slugs.push(slug.to_string());
    }
    Ok(slugs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_article, write_body, write_meta};
    use std::fs;
    use tempfile::TempDir;

    fn sample_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        write_article(tmp.path(), "alpha", "title: Alpha\ndate: 2024-01-01\n", "# Alpha");
        write_article(tmp.path(), "beta", "title: Beta\ndate: 2023-06-15\n", "# Beta");
        write_article(tmp.path(), "gamma", "title: Gamma\ndate: 2024-06-01\n", "# Gamma");
        tmp
    }

    #[test]
    fn builds_every_article_keyed_by_slug() {
        let tmp = sample_tree();
        let collection = build(tmp.path()).unwrap();

        assert_eq!(collection.len(), 3);
        assert_eq!(collection.slugs().collect::<Vec<_>>(), ["alpha", "beta", "gamma"]);
        assert_eq!(collection.get("beta").unwrap().meta.title, "Beta");
        assert!(collection.get("delta").is_none());
    }

    #[test]
    fn files_at_root_are_ignored() {
        let tmp = sample_tree();
        fs::write(tmp.path().join("README.md"), "not an article").unwrap();
        fs::write(tmp.path().join("meta.yaml"), "title: stray").unwrap();

        assert_eq!(build(tmp.path()).unwrap().len(), 3);
    }

    #[test]
    fn hidden_directories_are_ignored() {
        let tmp = sample_tree();
        write_article(tmp.path(), ".hidden", "date: nope\n", "x");

        assert_eq!(build(tmp.path()).unwrap().len(), 3);
    }

    #[test]
    fn directory_without_meta_is_skipped() {
        let tmp = sample_tree();
        write_body(tmp.path(), "scaffold", "# Just a body");
        fs::create_dir_all(tmp.path().join("assets")).unwrap();

        let collection = build(tmp.path()).unwrap();
        assert_eq!(collection.len(), 3);
        assert!(!collection.contains("scaffold"));
        assert!(!collection.contains("assets"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_directory_without_meta_is_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = sample_tree();
        fs::create_dir(tmp.path().join(OsStr::from_bytes(b"img\xff"))).unwrap();

        assert_eq!(build(tmp.path()).unwrap().len(), 3);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_article_directory_is_directory_unreadable() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = sample_tree();
        let dir = tmp.path().join(OsStr::from_bytes(b"post\xff"));
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("meta.yaml"), "title: T\n").unwrap();

        let err = build(tmp.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DirectoryUnreadable);
    }

    #[test]
    fn malformed_meta_fails_whole_build() {
        let tmp = sample_tree();
        write_article(tmp.path(), "broken", "date: \"2024/01/05\"\n", "body");

        let err = build(tmp.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MetadataInvalid);
        assert_eq!(err.slug(), Some("broken"));
    }

    #[test]
    fn meta_without_body_fails_whole_build() {
        let tmp = sample_tree();
        write_meta(tmp.path(), "bodiless", "title: T\n");

        let err = build(tmp.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BodyUnreadable);
        assert_eq!(err.slug(), Some("bodiless"));
    }

    #[test]
    fn missing_root_is_directory_unreadable() {
        let tmp = TempDir::new().unwrap();
        let err = build(&tmp.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DirectoryUnreadable);
        assert_eq!(err.slug(), None);
    }

    #[test]
    fn root_that_is_a_file_is_directory_unreadable() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("posts");
        fs::write(&file, "").unwrap();
        assert_eq!(build(&file).unwrap_err().kind(), ErrorKind::DirectoryUnreadable);
    }

    #[test]
    fn empty_root_builds_empty_collection() {
        let tmp = TempDir::new().unwrap();
        assert!(build(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn first_error_in_name_order_is_reported() {
        let tmp = sample_tree();
        write_article(tmp.path(), "m-bad", "date: 2024-13-01\n", "body");
        write_meta(tmp.path(), "c-bad", "title: no body\n");
        write_article(tmp.path(), "x-bad", "- list\n", "body");

        let err = build(tmp.path()).unwrap_err();
        assert_eq!(err.slug(), Some("c-bad"));
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let tmp = sample_tree();
        for i in 0..20 {
            write_article(
                tmp.path(),
                &format!("extra-{i:02}"),
                &format!("title: Extra {i}\ndate: 2022-01-{:02}\n", i + 1),
                "body",
            );
        }

        assert_eq!(build(tmp.path()).unwrap(), build_parallel(tmp.path()).unwrap());
    }

    #[test]
    fn parallel_build_reports_first_error_in_name_order() {
        let tmp = sample_tree();
        for i in 0..20 {
            write_article(tmp.path(), &format!("bad-{i:02}"), "date: 01/01/2024\n", "x");
        }

        for _ in 0..5 {
            let err = build_parallel(tmp.path()).unwrap_err();
            assert_eq!(err.slug(), Some("bad-00"));
        }
    }

    #[test]
    fn rebuilding_unchanged_tree_is_equal() {
        let tmp = sample_tree();
        assert_eq!(build(tmp.path()).unwrap(), build(tmp.path()).unwrap());
    }

    #[test]
    fn independent_roots_build_independent_collections() {
        let main = sample_tree();
        let curated = TempDir::new().unwrap();
        write_article(curated.path(), "pick", "title: Pick\n", "body");

        let a = build(main.path()).unwrap();
        let b = build(curated.path()).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(b.slugs().collect::<Vec<_>>(), ["pick"]);
    }

    #[test]
    fn collection_serializes_as_slug_map() {
        let tmp = sample_tree();
        let json = serde_json::to_value(build(tmp.path()).unwrap()).unwrap();
        assert_eq!(json["gamma"]["meta"]["date"], "2024-06-01");
        assert_eq!(json["alpha"]["slug"], "alpha");
    }
}
