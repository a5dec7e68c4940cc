//! NIP catalog - parsing, building and querying the NIPs index
//!
//! # Overview
//!
//! The NIPs repository README lists every NIP as a bullet, and carries an
//! "Event Kinds" and a "Standardized Tags" table. This module turns that
//! document into a sorted `Catalog` of `Entry` records and answers queries
//! against it.
//!
//! # Architecture
//!
//! ```text
//! DocumentSource (GitHub contents API / file, optionally cached)
//!     │
//!     ▼
//! README.md text
//!     ├── entries.rs  ← bullet list  → base entries
//!     ├── kinds.rs    ← Event Kinds  → identifier → kinds
//!     └── tags.rs     ← Std. Tags    → identifier → tags
//!            │
//!            ▼
//!     builder.rs  → Catalog (sorted, immutable)
//!            │
//!            ▼
//!     store.rs    → current Arc<Catalog>, swapped on rebuild
//!            │
//!            ▼
//!     query.rs    → filtered entries per query string
//! ```

mod builder;
mod cache;
mod entries;
mod entry;
mod error;
mod kinds;
mod markdown;
mod query;
mod settings;
mod source;
mod store;
mod tags;

pub use builder::{compare_identifiers, Catalog};
pub use cache::{CachedDocument, DocumentCache};
pub use entries::{parse_entries, BaseEntry};
pub use entry::{
    is_numeric_identifier, normalize_identifier, unpadded_identifier, Entry, SegmentKind,
    StyledTitle, TitleSegment, UrlTarget, ENTRY_LABEL, REPOSITORY_BLOB_URL, REPOSITORY_URL,
    SITE_URL,
};
pub use error::FetchError;
pub use kinds::{parse_kind_table, KindDeltas, KINDS_HEADING, MAX_KIND_RANGE_WIDTH};
pub use markdown::{section_body, section_rows, table_rows};
pub use query::Query;
pub use settings::{Settings, SettingsManager, DEFAULT_CACHE_TTL_SECS, DEFAULT_DOCUMENT_URL};
pub use source::{
    decode_contents_response, CachedSource, DocumentSource, FileSource, GithubContentsSource,
};
pub use store::{BuildReport, CatalogStore};
pub use tags::{parse_tag_table, TagDeltas, TAGS_HEADING};
