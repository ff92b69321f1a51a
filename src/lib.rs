//! # Quire
//!
//! Content ingestion and indexing for a directory of authored articles.
//! Each subdirectory of a content root is one article: a `meta.yaml` front
//! matter file and a `post.md` markdown body. Quire loads them into memory,
//! renders the markdown, and builds the indices a presentation layer needs.
//!
//! # Architecture: One-Way Pipeline
//!
//! ```text
//! posts/<slug>/{meta.yaml,post.md}
//!     → loader      one Article per directory
//!     → collection  slug → Article, all-or-nothing
//!     → index       by date (newest first), by category (oldest first)
//!     → snapshot    immutable bundle handed to the server
//! ```
//!
//! Nothing is persisted and nothing is reloaded: the pipeline runs once at
//! start-up, and a failure anywhere aborts it. Serving a partial content set
//! is never an option.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Article`, `ArticleMeta`, `PublishDate`, `SafeMarkup` |
//! | [`frontmatter`] | `meta.yaml` decoding, including the strict `YYYY-MM-DD` date rule |
//! | [`render`] | Markdown → HTML with heading ids and new-tab links |
//! | [`loader`] | Loads one article directory; `LoadError` and `ErrorKind` |
//! | [`collection`] | Walks a content root into a `Collection`; sequential or rayon-parallel |
//! | [`index`] | `by_date`, `by_category`, `categories` |
//! | [`snapshot`] | `ContentSnapshot` and `Library`, the read-only handles for serving |
//! | [`config`] | `quire.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Missing `meta.yaml` Means "Not an Article"
//!
//! A subdirectory without `meta.yaml` is skipped silently; it is treated as
//! scaffolding (assets, drafts in progress). A `meta.yaml` that exists but
//! does not parse, or an article without `post.md`, fails the build.
//!
//! ## Deterministic Order
//!
//! Directories are visited in name order and the collection is a `BTreeMap`,
//! so both stable sorts break date ties by slug. Two builds of the same tree
//! produce equal snapshots, and the error reported for a broken tree is
//! always the first broken article by name, even when loading in parallel.
//!
//! ## Two Opposite Orders
//!
//! The feed lists newest first; a category page reads as a history, oldest
//! first. Both orders are kept as they are.
//!
//! ## Authored Content, Escaped Anyway
//!
//! Raw HTML inside markdown is rendered as text. The input is trusted
//! authored content, but the output type ([`types::SafeMarkup`]) promises it
//! can be embedded as-is, and escaping keeps that promise unconditional.

pub mod collection;
pub mod config;
pub mod frontmatter;
pub mod index;
pub mod loader;
pub mod output;
pub mod render;
pub mod snapshot;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
