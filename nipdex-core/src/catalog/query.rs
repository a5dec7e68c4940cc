//! Catalog query engine
//!
//! A query is free text that may embed a kind predicate (`k=1`, or `k1`) and
//! a tag predicate (`t=e`). Predicates widen the result: an entry is included
//! when the text matches it as a substring OR a predicate holds. The
//! predicate syntax is left in the text for the substring test.

use once_cell::sync::Lazy;
use regex::Regex;

use super::builder::{compare_identifiers, Catalog};
use super::entry::Entry;

static KIND_PREDICATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"k=?(\d+)").expect("kind predicate pattern is valid"));

static TAG_PREDICATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"t=([A-Za-z0-9_-]+)").expect("tag predicate pattern is valid"));

/// A parsed query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    lowered: String,
    kind: Option<u32>,
    tag: Option<String>,
}

impl Query {
    /// Parse `text`, recognising at most one kind and one tag predicate
    /// (the first occurrence of each).
    pub fn parse(text: &str) -> Self {
        let kind = KIND_PREDICATE
            .captures(text)
            .and_then(|caps| caps[1].parse().ok());
        let tag = TAG_PREDICATE
            .captures(text)
            .map(|caps| caps[1].to_string());

        Self {
            text: text.to_string(),
            lowered: text.to_lowercase(),
            kind,
            tag,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Kind code requested with `k=<n>`
    pub fn kind(&self) -> Option<u32> {
        self.kind
    }

    /// Tag token requested with `t=<token>`
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn matches_text(&self, entry: &Entry) -> bool {
        entry.raw_title().to_lowercase().contains(&self.lowered)
            || entry.identifier().to_lowercase().contains(&self.lowered)
            || entry.content().to_lowercase().contains(&self.lowered)
    }

    fn matches_kind(&self, entry: &Entry) -> bool {
        self.kind.is_some_and(|kind| entry.kinds().contains(&kind))
    }

    fn matches_tag(&self, entry: &Entry) -> bool {
        self.tag
            .as_ref()
            .is_some_and(|tag| entry.tags().contains(tag))
    }

    /// Whether `entry` belongs in the result for this query.
    pub fn matches(&self, entry: &Entry) -> bool {
        self.is_blank()
            || self.matches_kind(entry)
            || self.matches_tag(entry)
            || self.matches_text(entry)
    }
}

impl Catalog {
    /// Entries matching `query`, in catalog order.
    pub fn search(&self, query: &str) -> Vec<&Entry> {
        self.filter(&Query::parse(query))
    }

    /// Entries matching an already parsed query, in catalog order.
    pub fn filter(&self, query: &Query) -> Vec<&Entry> {
        if query.is_blank() {
            return self.entries().iter().collect();
        }

        let mut results: Vec<&Entry> = self
            .entries()
            .iter()
            .filter(|entry| query.matches(entry))
            .collect();

        results.sort_by(|a, b| compare_identifiers(a.identifier(), b.identifier()));
        results
    }
}

#[cfg(test)]
mod query_tests {
    use super::*;
    use std::collections::BTreeSet;

    fn entry(id: &str, title: &str, kinds: &[u32], tags: &[&str]) -> Entry {
        Entry::new(
            id.to_string(),
            title.to_string(),
            format!("{id}.md"),
            kinds.iter().copied().collect(),
            tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
        )
    }

    fn catalog() -> Catalog {
        Catalog::from_entries(vec![
            entry("02", "Follow List", &[3], &["p"]),
            entry("01", "Basic protocol flow description", &[1, 2, 23], &["e"]),
            entry("7D", "Threads", &[11], &[]),
            entry("25", "Reactions", &[7], &["e", "k"]),
        ])
    }

    fn ids(results: &[&Entry]) -> Vec<String> {
        results.iter().map(|e| e.identifier().to_string()).collect()
    }

    #[test]
    fn test_parse_predicates() {
        let q = Query::parse("reactions k=7 t=e");
        assert_eq!(q.kind(), Some(7));
        assert_eq!(q.tag(), Some("e"));

        let q = Query::parse("k30023");
        assert_eq!(q.kind(), Some(30023));

        let q = Query::parse("k=1 k=2 t=a t=b");
        assert_eq!(q.kind(), Some(1));
        assert_eq!(q.tag(), Some("a"));

        let q = Query::parse("t=relay_list-v2!");
        assert_eq!(q.tag(), Some("relay_list-v2"));

        let q = Query::parse("kind");
        assert_eq!(q.kind(), None);
        assert_eq!(q.tag(), None);
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.search("")), vec!["01", "02", "25", "7D"]);
        assert_eq!(ids(&catalog.search("   ")), vec!["01", "02", "25", "7D"]);
    }

    #[test]
    fn test_substring_search_is_case_insensitive() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.search("THREADS")), vec!["7D"]);
        assert_eq!(ids(&catalog.search("7d")), vec!["7D"]);
        assert_eq!(ids(&catalog.search("nip-02")), vec!["02"]);
        assert_eq!(ids(&catalog.search("list")), vec!["02"]);
        assert!(catalog.search("zap").is_empty());
    }

    #[test]
    fn test_kind_predicate() {
        let catalog = catalog();
        assert!(ids(&catalog.search("k=23")).contains(&"01".to_string()));
        assert!(!ids(&catalog.search("k=99")).contains(&"01".to_string()));
        assert_eq!(ids(&catalog.search("k3")), vec!["02"]);
    }

    #[test]
    fn test_tag_predicate_is_case_sensitive() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.search("t=e")), vec!["01", "25"]);
        assert!(catalog.search("t=E").is_empty());
    }

    #[test]
    fn test_predicates_or_with_substring() {
        let catalog = catalog();
        // "k=7" matches kind 7 on NIP-25 only; no entry text contains "k=7".
        assert_eq!(ids(&catalog.search("k=7")), vec!["25"]);
        // "k=1" yields NIP-01 through its kinds, not through text.
        assert_eq!(ids(&catalog.search("k=1")), vec!["01"]);
        // The tag predicate adds NIP-02 next to the kind predicate's NIP-7D.
        assert_eq!(ids(&catalog.search("k=11 t=p")), vec!["02", "7D"]);
    }

    #[test]
    fn test_predicate_text_is_also_substring_tested() {
        let catalog = Catalog::from_entries(vec![
            entry("99", "Uses k=5 literally", &[], &[]),
            entry("98", "Other", &[5], &[]),
        ]);
        assert_eq!(ids(&catalog.search("k=5")), vec!["98", "99"]);
    }
}
