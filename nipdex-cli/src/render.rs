//! Terminal and JSON presentation of catalog entries

use nipdex_core::catalog::Entry;
use std::collections::BTreeSet;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

const TITLE_WIDTH: usize = 50;

/// Compress kind codes into comma-separated values and inclusive runs,
/// e.g. `0, 2, 30000-30003`.
pub fn format_kinds(kinds: &BTreeSet<u32>) -> String {
    let mut runs: Vec<(u32, u32)> = Vec::new();
    for &kind in kinds {
        match runs.last_mut() {
            Some((_, end)) if end.checked_add(1) == Some(kind) => *end = kind,
            _ => runs.push((kind, kind)),
        }
    }

    runs.iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_tags(tags: &BTreeSet<String>) -> String {
    tags.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Shorten `text` to `width` characters, marking the cut with "..."
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Table row for search results
#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "NIP")]
    nip: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Kinds")]
    kinds: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

pub fn entries_table(entries: &[&Entry]) -> String {
    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|entry| EntryRow {
            nip: entry.identifier().to_string(),
            title: truncate(&entry.title().plain_text(), TITLE_WIDTH),
            kinds: truncate(&format_kinds(entry.kinds()), TITLE_WIDTH / 2),
            tags: format_tags(entry.tags()),
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

pub fn entry_json(entry: &Entry) -> serde_json::Value {
    serde_json::json!({
        "nip": entry.identifier(),
        "title": entry.title(),
        "raw_title": entry.raw_title(),
        "source_file": entry.source_file(),
        "kinds": entry.kinds(),
        "tags": entry.tags(),
        "github_url": entry.repository_url(),
        "site_url": entry.site_url(),
    })
}
