//! Bullet-list entry parser
//!
//! Scans the whole document for lines shaped like
//! `- [NIP-<ID>: <TITLE>](<FILE>.md)` and turns each match into a base entry.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use super::entry::normalize_identifier;

static ENTRY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"- \[NIP-([A-Za-z0-9]+): (.+?)\]\(([A-Za-z0-9]+\.md)\)")
        .expect("entry pattern is valid")
});

/// An entry as listed in the index, before kinds and tags are attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseEntry {
    pub identifier: String,
    pub raw_title: String,
    pub source_file: String,
}

/// Extract base entries in document order.
///
/// Numeric identifiers are padded to two digits. When the same identifier is
/// listed twice the first listing wins. A document without any matching line
/// yields an empty list.
pub fn parse_entries(text: &str) -> Vec<BaseEntry> {
    let mut seen = HashSet::new();

    ENTRY_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let identifier = normalize_identifier(&caps[1]);
            if !seen.insert(identifier.clone()) {
                debug!("Ignoring duplicate listing for NIP-{}", identifier);
                return None;
            }
            Some(BaseEntry {
                identifier,
                raw_title: caps[2].to_string(),
                source_file: caps[3].to_string(),
            })
        })
        .collect()
}
