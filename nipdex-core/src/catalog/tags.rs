//! "Standardized Tags" table parser

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

use super::markdown::section_rows;

/// Heading of the tags section in the NIPs index
pub const TAGS_HEADING: &str = "Standardized Tags";

static TAG_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("tag literal pattern is valid"));

static LINKED_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([A-Za-z0-9]+)\]\([A-Za-z0-9]+\.md\)").expect("link pattern is valid")
});

/// Tag tokens referenced per identifier
pub type TagDeltas = BTreeMap<String, BTreeSet<String>>;

/// The first backtick-quoted token of a tag cell.
///
/// Cells listing several tags only yield the first one.
pub fn parse_tag_cell(cell: &str) -> Option<&str> {
    TAG_LITERAL
        .captures(cell)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Identifiers referenced by markdown links in a reference cell.
pub fn parse_tag_references(cell: &str) -> BTreeSet<String> {
    LINKED_REFERENCE
        .captures_iter(cell)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Parse the tags table of `text` into per-identifier tag sets.
///
/// The reference column is the fourth cell, so rows with fewer than four
/// non-empty cells are skipped along with rows lacking a tag or a reference.
pub fn parse_tag_table(text: &str) -> TagDeltas {
    let mut deltas = TagDeltas::new();

    for row in section_rows(text, TAGS_HEADING) {
        if row.len() < 4 {
            trace!("Skipping short tags row: {:?}", row);
            continue;
        }

        let Some(tag) = parse_tag_cell(row[0]) else {
            trace!("Skipping tags row without a tag: {:?}", row);
            continue;
        };
        let references = parse_tag_references(row[3]);
        if references.is_empty() {
            trace!("Skipping tags row without references: {:?}", row);
            continue;
        }

        for identifier in references {
            deltas.entry(identifier).or_default().insert(tag.to_string());
        }
    }

    deltas
}
