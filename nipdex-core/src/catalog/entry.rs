//! Catalog entry record and its derived views
//!
//! An `Entry` is built once by the catalog builder and never mutated after
//! that. Reference URLs and the searchable `content` line are derived on
//! demand rather than stored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Label prefixed to identifiers in the searchable content line
pub const ENTRY_LABEL: &str = "NIP";

/// Base for repository file links
pub const REPOSITORY_BLOB_URL: &str = "https://github.com/nostr-protocol/nips/blob/master";

/// Base for canonical site links
pub const SITE_URL: &str = "https://nips.nostr.com";

/// Home page of the NIPs repository
pub const REPOSITORY_URL: &str = "https://github.com/nostr-protocol/nips";

/// True when `id` is made only of ASCII digits.
pub fn is_numeric_identifier(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// Pad numeric identifiers to at least two digits; keep others verbatim.
pub fn normalize_identifier(id: &str) -> String {
    if is_numeric_identifier(id) {
        format!("{id:0>2}")
    } else {
        id.to_string()
    }
}

/// Numeric identifiers lose their leading zeros; others are kept verbatim.
pub fn unpadded_identifier(id: &str) -> &str {
    if !is_numeric_identifier(id) {
        return id;
    }
    match id.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    }
}

/// Which of an entry's two reference URLs a user prefers to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlTarget {
    /// The markdown file in the NIPs repository
    Github,
    /// The rendered page on the canonical site
    Site,
}

impl Default for UrlTarget {
    fn default() -> Self {
        Self::Github
    }
}

impl fmt::Display for UrlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlTarget::Github => write!(f, "github"),
            UrlTarget::Site => write!(f, "site"),
        }
    }
}

impl FromStr for UrlTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" | "a" => Ok(UrlTarget::Github),
            "site" | "nostr" | "b" => Ok(UrlTarget::Site),
            other => Err(format!(
                "Unknown URL target '{other}' (expected 'github' or 'site')"
            )),
        }
    }
}

/// How a title segment should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Plain,
    /// Text that appeared between backticks
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleSegment {
    pub kind: SegmentKind,
    pub text: String,
}

impl TitleSegment {
    /// The segment as it appeared in the raw title.
    pub fn source(&self) -> String {
        match self.kind {
            SegmentKind::Plain => self.text.clone(),
            SegmentKind::Code => format!("`{}`", self.text),
        }
    }
}

/// A title split into plain and code spans
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyledTitle {
    pub segments: Vec<TitleSegment>,
}

impl StyledTitle {
    /// Split `raw` on backticks: odd-indexed pieces are code, even-indexed
    /// pieces are plain text.
    ///
    /// A trailing unterminated backtick has no closing delimiter, so its piece
    /// stays plain text with the backtick kept. Empty plain pieces are
    /// dropped; empty code pieces are kept so `to_raw` restores "``".
    pub fn parse(raw: &str) -> Self {
        let pieces: Vec<&str> = raw.split('`').collect();
        let unterminated = pieces.len() % 2 == 0;
        let last = pieces.len() - 1;

        let segments = pieces
            .iter()
            .enumerate()
            .filter_map(|(i, piece)| {
                if i % 2 == 0 {
                    (!piece.is_empty()).then(|| TitleSegment {
                        kind: SegmentKind::Plain,
                        text: piece.to_string(),
                    })
                } else if unterminated && i == last {
                    Some(TitleSegment {
                        kind: SegmentKind::Plain,
                        text: format!("`{piece}"),
                    })
                } else {
                    Some(TitleSegment {
                        kind: SegmentKind::Code,
                        text: piece.to_string(),
                    })
                }
            })
            .collect();

        Self { segments }
    }

    /// Reassemble the raw title.
    pub fn to_raw(&self) -> String {
        self.segments.iter().map(TitleSegment::source).collect()
    }

    /// The title with code spans unwrapped, for plain-text displays.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// One catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    identifier: String,
    title: StyledTitle,
    raw_title: String,
    source_file: String,
    kinds: BTreeSet<u32>,
    tags: BTreeSet<String>,
}

impl Entry {
    pub(crate) fn new(
        identifier: String,
        raw_title: String,
        source_file: String,
        kinds: BTreeSet<u32>,
        tags: BTreeSet<String>,
    ) -> Self {
        Self {
            identifier,
            title: StyledTitle::parse(&raw_title),
            raw_title,
            source_file,
            kinds,
            tags,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn title(&self) -> &StyledTitle {
        &self.title
    }

    pub fn raw_title(&self) -> &str {
        &self.raw_title
    }

    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    pub fn kinds(&self) -> &BTreeSet<u32> {
        &self.kinds
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Link to the markdown file in the NIPs repository
    pub fn repository_url(&self) -> String {
        format!("{REPOSITORY_BLOB_URL}/{}", self.source_file)
    }

    /// Link to the rendered page on the canonical site
    pub fn site_url(&self) -> String {
        format!("{SITE_URL}/{}", unpadded_identifier(&self.identifier))
    }

    pub fn url_for(&self, target: UrlTarget) -> String {
        match target {
            UrlTarget::Github => self.repository_url(),
            UrlTarget::Site => self.site_url(),
        }
    }

    /// Searchable line, e.g. `NIP-01: Basic protocol flow description`
    pub fn content(&self) -> String {
        format!("{ENTRY_LABEL}-{}: {}", self.identifier, self.raw_title)
    }
}
