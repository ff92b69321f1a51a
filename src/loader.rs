//! Loading a single article from its directory.
//!
//! ```text
//! <root>/<slug>/
//! ├── meta.yaml   # front matter
//! └── post.md     # markdown body
//! ```
//!
//! Loading is all-or-nothing: any failure returns a [`LoadError`] naming the
//! slug, the file, and the underlying cause.

use crate::frontmatter::{self, FrontMatterError};
use crate::render;
use crate::types::Article;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const META_FILE: &str = "meta.yaml";
pub const BODY_FILE: &str = "post.md";

/// Classification shared by [`LoadError`] and [`crate::collection::BuildError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MetadataUnreadable,
    MetadataInvalid,
    BodyUnreadable,
    DirectoryUnreadable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::MetadataUnreadable => "metadata unreadable",
            ErrorKind::MetadataInvalid => "metadata invalid",
            ErrorKind::BodyUnreadable => "body unreadable",
            ErrorKind::DirectoryUnreadable => "directory unreadable",
        })
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("article '{slug}': cannot read {}: {source}", .path.display())]
    MetadataUnreadable {
        slug: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("article '{slug}': invalid front matter in {}: {source}", .path.display())]
    MetadataInvalid {
        slug: String,
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
    #[error("article '{slug}': cannot read {}: {source}", .path.display())]
    BodyUnreadable {
        slug: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::MetadataUnreadable { .. } => ErrorKind::MetadataUnreadable,
            LoadError::MetadataInvalid { .. } => ErrorKind::MetadataInvalid,
            LoadError::BodyUnreadable { .. } => ErrorKind::BodyUnreadable,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            LoadError::MetadataUnreadable { slug, .. }
            | LoadError::MetadataInvalid { slug, .. }
            | LoadError::BodyUnreadable { slug, .. } => slug,
        }
    }

    /// The file that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::MetadataUnreadable { path, .. }
            | LoadError::MetadataInvalid { path, .. }
            | LoadError::BodyUnreadable { path, .. } => path,
        }
    }
}

/// Path of an article's metadata file.
pub fn meta_path(root: &Path, slug: &str) -> PathBuf {
    root.join(slug).join(META_FILE)
}

/// Path of an article's body file.
pub fn body_path(root: &Path, slug: &str) -> PathBuf {
    root.join(slug).join(BODY_FILE)
}

/// Load the article stored in `<root>/<slug>/`.
pub fn load(root: &Path, slug: &str) -> Result<Article, LoadError> {
    let path = meta_path(root, slug);
    let raw = fs::read(&path).map_err(|source| LoadError::MetadataUnreadable {
        slug: slug.to_string(),
        path: path.clone(),
        source,
    })?;
    let meta = frontmatter::parse(&raw).map_err(|source| LoadError::MetadataInvalid {
        slug: slug.to_string(),
        path,
        source,
    })?;

    let path = body_path(root, slug);
    let markdown = fs::read(&path).map_err(|source| LoadError::BodyUnreadable {
        slug: slug.to_string(),
        path,
        source,
    })?;
    let body = render::render_bytes(&markdown);

    debug!(slug, date = %meta.date, categories = meta.categories.len(), "loaded article");

    Ok(Article {
        slug: slug.to_string(),
        meta,
        body,
    })
}
