//! "Event Kinds" table parser
//!
//! Each usable row maps a set of kind codes (column 0) to the NIPs that
//! define them (column 2). The parser only reports which identifiers were
//! referenced; attaching kinds to entries is left to the catalog builder.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

use super::markdown::section_rows;

/// Heading of the kinds section in the NIPs index
pub const KINDS_HEADING: &str = "Event Kinds";

/// Widest range a single cell may expand to; wider ranges are skipped
pub const MAX_KIND_RANGE_WIDTH: u64 = 65_536;

static KIND_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`(\d+)`").expect("kind literal pattern is valid"));

static KIND_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`(\d+)`-`(\d+)`").expect("kind range pattern is valid"));

static LINKED_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([A-Za-z0-9]+)\]\([A-Za-z0-9]+\.md\)").expect("link pattern is valid")
});

static DEPRECATED_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z0-9]+) \(deprecated\)").expect("deprecated pattern is valid")
});

/// Kind codes referenced per identifier, as written in the table
pub type KindDeltas = BTreeMap<String, BTreeSet<u32>>;

/// Kind codes named in a kind cell: single literals plus inclusive ranges.
///
/// Literals that do not fit in a `u32` are skipped, as are ranges whose end
/// is below their start and ranges spanning more than
/// `MAX_KIND_RANGE_WIDTH` codes.
pub fn parse_kind_cell(cell: &str) -> BTreeSet<u32> {
    let mut kinds: BTreeSet<u32> = KIND_LITERAL
        .captures_iter(cell)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();

    for caps in KIND_RANGE.captures_iter(cell) {
        let (Ok(start), Ok(end)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            continue;
        };
        if end >= start && u64::from(end) - u64::from(start) + 1 > MAX_KIND_RANGE_WIDTH {
            trace!("Skipping oversized kind range {}-{}", start, end);
            continue;
        }
        kinds.extend(start..=end);
    }

    kinds
}

/// Identifiers referenced by markdown links and "(deprecated)" mentions.
pub fn parse_kind_references(cell: &str) -> BTreeSet<String> {
    LINKED_REFERENCE
        .captures_iter(cell)
        .chain(DEPRECATED_REFERENCE.captures_iter(cell))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Parse the kinds table of `text` into per-identifier kind sets.
///
/// A missing section, short rows, and rows without kinds or references all
/// contribute nothing.
pub fn parse_kind_table(text: &str) -> KindDeltas {
    let mut deltas = KindDeltas::new();

    for row in section_rows(text, KINDS_HEADING) {
        if row.len() < 3 {
            trace!("Skipping short kinds row: {:?}", row);
            continue;
        }

        let kinds = parse_kind_cell(row[0]);
        let references = parse_kind_references(row[2]);
        if kinds.is_empty() || references.is_empty() {
            trace!("Skipping kinds row without kinds or references: {:?}", row);
            continue;
        }

        for identifier in references {
            deltas
                .entry(identifier)
                .or_default()
                .extend(kinds.iter().copied());
        }
    }

    deltas
}
