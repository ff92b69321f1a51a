//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every article is shown by its identity first (position, date, title) with
//! the slug and categories as indented context lines:
//!
//! ```text
//! Articles (posts/)
//! 001 2024-06-01 Midyear Review
//!     Slug: midyear
//!     Categories: Web, Rust
//!     Notes from the first half of the year.
//! 002 2024-01-01 Hello World
//!     Slug: hello-world
//!     Categories: Go, Web
//!
//! Categories
//! go (2)
//!     2023-06-15 Summer Notes
//!     2024-01-01 Hello World
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::snapshot::{ContentSnapshot, Library};
use crate::types::Article;
use std::sync::Arc;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Date column; undated articles show a placeholder of the same width.
fn date_column(article: &Article) -> String {
    if article.meta.date.is_set() {
        article.meta.date.to_string()
    } else {
        "----------".to_string()
    }
}

/// Title, or the slug in parens when the article has no title.
fn display_title(article: &Article) -> String {
    if article.meta.title.is_empty() {
        format!("({})", article.slug)
    } else {
        article.meta.title.clone()
    }
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// One-line summary: the description, else the start of the rendered body.
fn summary(article: &Article) -> String {
    let source = if article.meta.description.trim().is_empty() {
        strip_html_tags(article.body.as_str())
    } else {
        article.meta.description.clone()
    };
    let flat = source.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_desc(&flat, 60)
}

fn article_lines(index: usize, article: &Article, unlisted: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} {}",
        format_index(index),
        date_column(article),
        display_title(article)
    )];
    let ctx = indent(1);
    lines.push(format!("{}Slug: {}", ctx, article.slug));
    if !article.meta.categories.is_empty() {
        lines.push(format!(
            "{}Categories: {}",
            ctx,
            article.meta.categories.join(", ")
        ));
    }
    if unlisted {
        lines.push(format!("{}Unlisted", ctx));
    }
    let summary = summary(article);
    if !summary.is_empty() {
        lines.push(format!("{}{}", ctx, summary));
    }
    lines
}

/// Format every article of a snapshot, newest first.
pub fn format_articles(title: &str, snapshot: &ContentSnapshot) -> Vec<String> {
    let mut lines = vec![format!("{} ({}/)", title, snapshot.root().display())];
    if snapshot.by_date().is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, article) in snapshot.by_date().iter().enumerate() {
        lines.extend(article_lines(i + 1, article, snapshot.is_unlisted(&article.slug)));
    }
    lines
}

/// Format the listing feed: listed articles only, one line each.
pub fn format_listing(articles: &[&Arc<Article>]) -> Vec<String> {
    articles
        .iter()
        .enumerate()
        .map(|(i, a)| {
            format!(
                "{} {} {} ({})",
                format_index(i + 1),
                date_column(a),
                display_title(a),
                a.slug
            )
        })
        .collect()
}

/// Format the category index: each bucket oldest first.
pub fn format_categories(snapshot: &ContentSnapshot) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];
    if snapshot.by_category().is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (key, bucket) in snapshot.by_category().iter() {
        lines.push(format!("{} ({})", key, bucket.len()));
        for article in bucket {
            lines.push(format!(
                "{}{} {}",
                indent(1),
                date_column(article),
                display_title(article)
            ));
        }
    }
    lines
}

/// Format the `check` summary for every root in the library.
pub fn format_check(library: &Library) -> Vec<String> {
    let mut lines = format_articles("Articles", &library.articles);
    lines.push(String::new());
    lines.extend(format_categories(&library.articles));
    if let Some(curated) = &library.curated {
        lines.push(String::new());
        lines.extend(format_articles("Curated", curated));
    }
    lines
}

pub fn print_check(library: &Library) {
    for line in format_check(library) {
        println!("{}", line);
    }
}

pub fn print_listing(articles: &[&Arc<Article>]) {
    for line in format_listing(articles) {
        println!("{}", line);
    }
}

pub fn print_categories(snapshot: &ContentSnapshot) {
    for line in format_categories(snapshot) {
        println!("{}", line);
    }
}
