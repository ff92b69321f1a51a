//! Shared test utilities.
//!
//! Writers lay out `<root>/<slug>/meta.yaml` and `post.md` the way the loader
//! expects; builders make in-memory articles for index tests without touching
//! the filesystem.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_article(tmp.path(), "hello", "title: Hello\ndate: 2024-01-01\n", "# Hello");
//!
//! let collection: Collection = [article("a", "2024-01-01", &["Go"])].into_iter().collect();
//! assert_eq!(slugs(&by_date(&collection)), ["a"]);
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::render;
use crate::types::{Article, ArticleMeta, PublishDate};

// =========================================================================
// On-disk fixtures
// =========================================================================

/// Write `meta.yaml` for `slug`, creating directories as needed.
pub fn write_meta(root: &Path, slug: &str, yaml: &str) {
    let dir = root.join(slug);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("meta.yaml"), yaml).unwrap();
}

/// Write `post.md` for `slug`, creating directories as needed.
pub fn write_body(root: &Path, slug: &str, markdown: &str) {
    let dir = root.join(slug);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("post.md"), markdown).unwrap();
}

/// Write both files of an article.
pub fn write_article(root: &Path, slug: &str, yaml: &str, markdown: &str) {
    write_meta(root, slug, yaml);
    write_body(root, slug, markdown);
}

// =========================================================================
// In-memory articles
// =========================================================================

/// Build an article directly. An empty `date` leaves it unset.
pub fn article(slug: &str, date: &str, categories: &[&str]) -> Article {
    let date = if date.is_empty() {
        PublishDate::unset()
    } else {
        PublishDate::parse(date).unwrap_or_else(|e| panic!("bad test date: {e}"))
    };
    Article {
        slug: slug.to_string(),
        meta: ArticleMeta {
            title: slug.to_string(),
            date,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            description: String::new(),
        },
        body: render::render(&format!("Body of *{slug}*.")),
    }
}

/// Slugs of a sequence of articles, in order.
pub fn slugs(articles: &[Arc<Article>]) -> Vec<&str> {
    articles.iter().map(|a| a.slug.as_str()).collect()
}
