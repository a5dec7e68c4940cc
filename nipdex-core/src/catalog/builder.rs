//! Catalog assembly
//!
//! Building is a pure function of the document text: the three parsers run
//! independently, their kind and tag deltas are resolved against the base
//! entry list, and each `Entry` is constructed exactly once with its final
//! sets before the list is sorted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

use super::entries::{parse_entries, BaseEntry};
use super::entry::{is_numeric_identifier, normalize_identifier, unpadded_identifier, Entry};
use super::kinds::parse_kind_table;
use super::tags::parse_tag_table;

/// The built, sorted collection of entries for one document
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    entries: Vec<Entry>,

    /// When this catalog was built
    built_at: DateTime<Utc>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            built_at: Utc::now(),
        }
    }
}

/// Catalog order of two identifiers.
///
/// Numeric identifiers come first, ascending by value; the rest follow in
/// case-sensitive byte order. Values are compared by digit count and then
/// lexically, so arbitrarily long numbers never overflow.
pub fn compare_identifiers(a: &str, b: &str) -> Ordering {
    match (is_numeric_identifier(a), is_numeric_identifier(b)) {
        (true, true) => {
            let (a, b) = (unpadded_identifier(a), unpadded_identifier(b));
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

/// Find the base entry a table reference points at.
///
/// Exact identifier match first, then the reference with one leading zero
/// removed.
fn resolve_reference<'a>(index: &HashMap<&'a str, usize>, reference: &str) -> Option<usize> {
    index.get(reference).copied().or_else(|| {
        reference
            .strip_prefix('0')
            .and_then(|stripped| index.get(stripped).copied())
    })
}

impl Catalog {
    /// Build a catalog from the NIPs index markdown.
    pub fn build(text: &str) -> Self {
        let base = parse_entries(text);
        let kind_deltas = parse_kind_table(text);
        let tag_deltas = parse_tag_table(text);

        let index: HashMap<&str, usize> = base
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.identifier.as_str(), i))
            .collect();

        let mut kinds: Vec<BTreeSet<u32>> = vec![BTreeSet::new(); base.len()];
        let mut tags: Vec<BTreeSet<String>> = vec![BTreeSet::new(); base.len()];

        for (reference, codes) in kind_deltas {
            match resolve_reference(&index, &reference) {
                Some(i) => kinds[i].extend(codes),
                None => trace!("Kinds table references unknown NIP-{}", reference),
            }
        }

        for (reference, tokens) in tag_deltas {
            match resolve_reference(&index, &reference) {
                Some(i) => tags[i].extend(tokens),
                None => trace!("Tags table references unknown NIP-{}", reference),
            }
        }

        let entries = base
            .into_iter()
            .zip(kinds.into_iter().zip(tags))
            .map(|(BaseEntry { identifier, raw_title, source_file }, (kinds, tags))| {
                Entry::new(identifier, raw_title, source_file, kinds, tags)
            })
            .collect();

        let catalog = Self::from_entries(entries);
        debug!("Built catalog with {} entries", catalog.len());
        catalog
    }

    /// Wrap already-built entries, putting them in catalog order.
    pub fn from_entries(mut entries: Vec<Entry>) -> Self {
        // `sort_by` is stable, so equal keys keep their encounter order.
        entries.sort_by(|a, b| compare_identifiers(a.identifier(), b.identifier()));
        Self {
            entries,
            built_at: Utc::now(),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by identifier; numeric identifiers may be given
    /// padded or unpadded (`1`, `01`).
    pub fn get(&self, identifier: &str) -> Option<&Entry> {
        let wanted = normalize_identifier(identifier);
        self.entries.iter().find(|e| e.identifier() == wanted)
    }
}

#[cfg(test)]
mod builder_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn identifiers(catalog: &Catalog) -> Vec<&str> {
        catalog.entries().iter().map(|e| e.identifier()).collect()
    }

    #[test]
    fn test_compare_identifiers() {
        assert_eq!(compare_identifiers("02", "10"), Ordering::Less);
        assert_eq!(compare_identifiers("100", "99"), Ordering::Greater);
        assert_eq!(compare_identifiers("01", "1"), Ordering::Equal);
        assert_eq!(compare_identifiers("99", "7D"), Ordering::Less);
        assert_eq!(compare_identifiers("7D", "B0"), Ordering::Less);
        assert_eq!(compare_identifiers("B0", "a0"), Ordering::Less);
        assert_eq!(
            compare_identifiers("123456789012345678901234567890", "99"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_sort_order() {
        let text = "\
- [NIP-10: Ten](10.md)
- [NIP-2: Two](02.md)
- [NIP-7D: Threads](7D.md)
- [NIP-01: One](01.md)
";
        let catalog = Catalog::build(text);
        assert_eq!(identifiers(&catalog), vec!["01", "02", "10", "7D"]);
    }

    #[test]
    fn test_empty_document_builds_empty_catalog() {
        assert!(Catalog::build("").is_empty());
        assert!(Catalog::build("# Just a heading\n\nSome prose.\n").is_empty());
    }

    #[test]
    fn test_sets_default_to_empty() {
        let catalog = Catalog::build("- [NIP-01: One](01.md)\n");
        let entry = catalog.get("01").unwrap();
        assert!(entry.kinds().is_empty());
        assert!(entry.tags().is_empty());
    }

    #[test]
    fn test_references_tolerate_one_leading_zero() {
        let mut index = HashMap::new();
        index.insert("1", 0);
        index.insert("A1", 1);

        assert_eq!(resolve_reference(&index, "1"), Some(0));
        assert_eq!(resolve_reference(&index, "01"), Some(0));
        assert_eq!(resolve_reference(&index, "001"), None);
        assert_eq!(resolve_reference(&index, "0A1"), Some(1));
        assert_eq!(resolve_reference(&index, "02"), None);
    }

    #[test]
    fn test_unknown_references_are_ignored() {
        let text = "\
- [NIP-01: One](01.md)

## Event Kinds

| kind | description | NIP |
| ---- | ----------- | --- |
| `1`  | Short Note  | [01](01.md) |
| `4`  | DM          | [04](04.md) |
";
        let catalog = Catalog::build(text);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("01").unwrap().kinds(), &BTreeSet::from([1]));
    }

    #[test]
    fn test_get_accepts_unpadded_identifier() {
        let catalog = Catalog::build("- [NIP-01: One](01.md)\n- [NIP-7D: Threads](7D.md)\n");
        assert!(catalog.get("1").is_some());
        assert!(catalog.get("01").is_some());
        assert!(catalog.get("7D").is_some());
        assert!(catalog.get("7d").is_none());
    }
}
