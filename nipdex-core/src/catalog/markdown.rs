//! Minimal markdown tokenizer for the NIPs index
//!
//! Only two shapes are recognised: ATX headings (to find a named section)
//! and pipe tables (split into trimmed cells). Everything else is treated as
//! opaque text. This is not a general markdown parser.

/// Text of `line` when it is an ATX heading (`#` through `######`), with the
/// hashes and surrounding whitespace removed.
fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }

    let rest = &trimmed[hashes..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    Some(rest.trim())
}

/// Locate the body of the section whose heading text is exactly `heading`.
///
/// The body starts on the line after the heading and runs until the next
/// heading of any level, or the end of the document. Matching is
/// case-sensitive. Returns `None` when no such heading exists.
pub fn section_body<'a>(text: &'a str, heading: &str) -> Option<&'a str> {
    let mut offset = 0;
    let mut start = None;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        match (start, heading_text(line)) {
            (None, Some(found)) if found == heading => start = Some(offset),
            (Some(body_start), Some(_)) => return Some(&text[body_start..line_start]),
            _ => {}
        }
    }

    start.map(|body_start| &text[body_start..])
}

/// Split a pipe-table body into rows of non-empty trimmed cells.
///
/// Blank lines are ignored. The first two remaining lines (header and
/// separator) are never data and are always dropped, whatever they contain.
/// Empty cells, including the ones produced by leading and trailing pipes,
/// are removed.
pub fn table_rows(body: &str) -> Vec<Vec<&str>> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .skip(2)
        .map(|line| {
            line.split('|')
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .collect()
        })
        .collect()
}

/// Rows of the table under `heading`, or no rows when the section is absent.
pub fn section_rows<'a>(text: &'a str, heading: &str) -> Vec<Vec<&'a str>> {
    section_body(text, heading)
        .map(table_rows)
        .unwrap_or_default()
}

#[cfg(test)]
mod markdown_tests {
    use super::*;

    const DOC: &str = "# NIPs\n\nintro\n\n## Event Kinds\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n## Standardized Tags\n\n| x |\n";

    #[test]
    fn test_heading_text_strips_hashes() {
        assert_eq!(heading_text("## Event Kinds  "), Some("Event Kinds"));
        assert_eq!(heading_text("######"), Some(""));
        assert_eq!(heading_text("####### too deep"), None);
        assert_eq!(heading_text("#hashtag"), None);
        assert_eq!(heading_text("plain text"), None);
    }

    #[test]
    fn test_section_body_stops_at_next_heading() {
        let body = section_body(DOC, "Event Kinds").unwrap();
        assert!(body.contains("| 1 | 2 |"));
        assert!(!body.contains("Standardized"));
    }

    #[test]
    fn test_section_body_runs_to_end_of_document() {
        let body = section_body(DOC, "Standardized Tags").unwrap();
        assert_eq!(body.trim(), "| x |");
    }

    #[test]
    fn test_section_heading_is_case_sensitive() {
        assert!(section_body(DOC, "event kinds").is_none());
        assert!(section_body(DOC, "Event").is_none());
    }

    #[test]
    fn test_hash_without_space_is_not_a_heading() {
        assert!(heading_text("#hashtag").is_none());
        assert_eq!(heading_text("### Event Kinds  "), Some("Event Kinds"));
        assert_eq!(heading_text("#"), Some(""));
    }

    #[test]
    fn test_table_rows_drop_header_separator_and_empty_cells() {
        let rows = table_rows("\n| a | b |\n|---|---|\n| 1 |  | 2 |\n\n| 3 |\n");
        assert_eq!(rows, vec![vec!["1", "2"], vec!["3"]]);
    }

    #[test]
    fn test_table_rows_always_drop_first_two_lines() {
        let rows = table_rows("| 1 | 2 |\n| 3 | 4 |\n| 5 | 6 |\n");
        assert_eq!(rows, vec![vec!["5", "6"]]);
    }

    #[test]
    fn test_missing_section_yields_no_rows() {
        assert!(section_rows(DOC, "Nope").is_empty());
    }
}
