//! Read-only views over a [`Collection`].
//!
//! - [`by_date`]: every article, newest first. The feed order.
//! - [`by_category`]: lower-cased category → articles, **oldest first**. The
//!   per-category history order.
//!
//! The two orders are opposite on purpose. Both sorts are stable over the
//! collection's slug order, so articles sharing a date always come out in
//! ascending slug order.

use crate::collection::Collection;
use crate::types::Article;
use std::collections::BTreeMap;
use std::sync::Arc;

/// All articles sorted by date, newest first.
pub fn by_date(collection: &Collection) -> Vec<Arc<Article>> {
    let mut articles: Vec<Arc<Article>> = collection.iter().cloned().collect();
    articles.sort_by(|a, b| b.meta.date.cmp(&a.meta.date));
    articles
}

/// Articles grouped by lower-cased category, each bucket oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    buckets: BTreeMap<String, Vec<Arc<Article>>>,
}

impl CategoryIndex {
    /// Look up a bucket. The key is lower-cased before lookup.
    ///
    /// `None` means no article carries the category; buckets are never empty.
    pub fn get(&self, category: &str) -> Option<&[Arc<Article>]> {
        self.buckets.get(&category.to_lowercase()).map(Vec::as_slice)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.buckets.contains_key(&category.to_lowercase())
    }

    /// Category keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Arc<Article>])> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Group articles by lower-cased category, each bucket sorted oldest first.
///
/// An article that lists the same category twice (in any casing) appears
/// in that bucket once.
pub fn by_category(collection: &Collection) -> CategoryIndex {
    let mut buckets: BTreeMap<String, Vec<Arc<Article>>> = BTreeMap::new();
    for article in collection.iter() {
        for key in article.meta.category_keys() {
            buckets.entry(key).or_default().push(Arc::clone(article));
        }
    }
    for bucket in buckets.values_mut() {
        bucket.sort_by_key(|a| a.meta.date);
    }
    CategoryIndex { buckets }
}

/// Every distinct lower-cased category in the collection, sorted.
pub fn categories(collection: &Collection) -> Vec<String> {
    let mut keys: Vec<String> = collection
        .iter()
        .flat_map(|a| a.meta.category_keys())
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{article, slugs};
    use std::collections::BTreeSet;

    fn sample() -> Collection {
        [
            article("a-first", "2024-01-01", &["Go", "Web"]),
            article("b-second", "2023-06-15", &["go"]),
            article("c-third", "2024-06-01", &["WEB", "Rust"]),
        ]
        .into_iter()
        .collect()
    }

    // =========================================================================
    // by_date
    // =========================================================================

    #[test]
    fn by_date_is_newest_first() {
        let dates: Vec<String> = by_date(&sample())
            .iter()
            .map(|a| a.meta.date.to_string())
            .collect();
        assert_eq!(dates, ["2024-06-01", "2024-01-01", "2023-06-15"]);
    }

    #[test]
    fn by_date_ties_keep_slug_order() {
        let collection: Collection = [
            article("zeta", "2024-01-01", &[]),
            article("alpha", "2024-01-01", &[]),
            article("mid", "2024-01-01", &[]),
            article("newest", "2025-01-01", &[]),
        ]
        .into_iter()
        .collect();
        assert_eq!(slugs(&by_date(&collection)), ["newest", "alpha", "mid", "zeta"]);
    }

    #[test]
    fn by_date_puts_undated_last() {
        let collection: Collection = [
            article("undated", "", &[]),
            article("dated", "2020-01-01", &[]),
        ]
        .into_iter()
        .collect();
        assert_eq!(slugs(&by_date(&collection)), ["dated", "undated"]);
    }

    #[test]
    fn by_date_covers_every_article() {
        let collection = sample();
        let indexed = by_date(&collection);
        assert_eq!(indexed.len(), collection.len());
        for a in &indexed {
            assert!(Arc::ptr_eq(a, collection.get(&a.slug).unwrap()));
        }
    }

    #[test]
    fn by_date_of_empty_collection_is_empty() {
        assert!(by_date(&Collection::default()).is_empty());
    }

    // =========================================================================
    // by_category
    // =========================================================================

    #[test]
    fn buckets_are_lowercased_union() {
        let index = by_category(&sample());
        assert_eq!(index.keys().collect::<Vec<_>>(), ["go", "rust", "web"]);
    }

    #[test]
    fn mixed_case_collapses_into_one_bucket() {
        let collection: Collection = [
            article("one", "2024-01-01", &["Go", "go"]),
            article("two", "2024-02-01", &["Web"]),
        ]
        .into_iter()
        .collect();
        let index = by_category(&collection);

        assert_eq!(index.keys().collect::<Vec<_>>(), ["go", "web"]);
        assert_eq!(slugs(index.get("go").unwrap()), ["one"]);
    }

    #[test]
    fn buckets_are_oldest_first() {
        let index = by_category(&sample());
        assert_eq!(slugs(index.get("go").unwrap()), ["b-second", "a-first"]);
        assert_eq!(slugs(index.get("web").unwrap()), ["a-first", "c-third"]);
    }

    #[test]
    fn bucket_order_is_reverse_of_by_date() {
        let collection = sample();
        let index = by_category(&collection);

        let mut feed: Vec<Arc<Article>> = by_date(&collection)
            .into_iter()
            .filter(|a| a.meta.has_category("web"))
            .collect();
        feed.reverse();
        assert_eq!(slugs(&feed), slugs(index.get("web").unwrap()));
    }

    #[test]
    fn bucket_ties_keep_slug_order() {
        let collection: Collection = [
            article("b", "2024-01-01", &["x"]),
            article("a", "2024-01-01", &["X"]),
            article("c", "2023-01-01", &["x"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(slugs(by_category(&collection).get("x").unwrap()), ["c", "a", "b"]);
    }

    #[test]
    fn lookup_is_case_insensitive_and_distinguishes_missing() {
        let index = by_category(&sample());
        assert!(index.get("GO").is_some());
        assert!(index.contains("Rust"));
        assert!(index.get("python").is_none());
    }

    #[test]
    fn no_empty_buckets() {
        let collection: Collection = [
            article("untagged", "2024-01-01", &[]),
            article("tagged", "2024-01-02", &["solo"]),
        ]
        .into_iter()
        .collect();
        let index = by_category(&collection);
        assert_eq!(index.len(), 1);
        assert!(index.iter().all(|(_, bucket)| !bucket.is_empty()));
    }

    #[test]
    fn every_bucket_entry_is_in_collection() {
        let collection = sample();
        for (_, bucket) in by_category(&collection).iter() {
            for a in bucket {
                assert!(Arc::ptr_eq(a, collection.get(&a.slug).unwrap()));
            }
        }
    }

    #[test]
    fn indices_are_idempotent() {
        let collection = sample();
        assert_eq!(by_date(&collection), by_date(&collection));
        assert_eq!(by_category(&collection), by_category(&collection));
    }

    // =========================================================================
    // categories
    // =========================================================================

    #[test]
    fn categories_match_bucket_keys() {
        let collection = sample();
        let from_index: BTreeSet<String> =
            by_category(&collection).keys().map(str::to_string).collect();
        let listed: BTreeSet<String> = categories(&collection).into_iter().collect();
        assert_eq!(from_index, listed);
        assert_eq!(categories(&collection), ["go", "rust", "web"]);
    }
}
