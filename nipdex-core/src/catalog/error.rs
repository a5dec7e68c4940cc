//! Document retrieval errors
//!
//! Only fetching can fail. Malformed rows, missing sections and references
//! to unknown NIPs are not errors; the parsers skip them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP request could not be completed
    #[cfg(feature = "remote")]
    #[error("Failed to fetch NIPs index from {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("Failed to fetch NIPs index: HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The response body was not the expected JSON document
    #[error("Unexpected response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    /// A required field was absent from the response
    #[error("Response from {url} is missing the '{field}' field")]
    MissingField { url: String, field: &'static str },

    /// The document content was not valid base64
    #[error("Failed to decode NIPs index content")]
    Decode(#[from] base64::DecodeError),

    /// The decoded document was not valid UTF-8
    #[error("NIPs index is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A local document could not be read
    #[error("Failed to read NIPs index from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote fetching was compiled out
    #[error("Remote fetching is not enabled. Rebuild with --features remote")]
    Disabled,
}
