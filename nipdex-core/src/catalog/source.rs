//! Where the NIPs index text comes from
//!
//! `DocumentSource` is the seam between the catalog and the outside world.
//! The remote source talks to the GitHub contents API, which returns the
//! file base64-encoded inside a JSON envelope.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

use super::cache::DocumentCache;
use super::error::FetchError;

/// Produces the raw NIPs index markdown
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Where the document comes from; also used as the cache key
    fn location(&self) -> &str;

    async fn fetch_document(&self) -> Result<String, FetchError>;
}

/// Reads the index from a local markdown file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    location: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.display().to_string();
        Self { path, location }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn fetch_document(&self) -> Result<String, FetchError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

/// Decode a GitHub contents API response body into the file text.
///
/// The `content` field is base64 wrapped across lines; whitespace is removed
/// before decoding.
pub fn decode_contents_response(url: &str, body: &str) -> Result<String, FetchError> {
    let response: ContentsResponse =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(encoding) = response.encoding.as_deref() {
        if encoding != "base64" {
            return Err(FetchError::InvalidResponse {
                url: url.to_string(),
                reason: format!("unsupported encoding '{encoding}'"),
            });
        }
    }

    let content = response.content.ok_or_else(|| FetchError::MissingField {
        url: url.to_string(),
        field: "content",
    })?;

    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}

/// Fetches the index through the GitHub contents API
#[derive(Debug, Clone)]
pub struct GithubContentsSource {
    url: String,
}

impl GithubContentsSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl DocumentSource for GithubContentsSource {
    fn location(&self) -> &str {
        &self.url
    }

    #[cfg(feature = "remote")]
    async fn fetch_document(&self) -> Result<String, FetchError> {
        let http = |source| FetchError::Http {
            url: self.url.clone(),
            source,
        };

        let client = reqwest::Client::builder()
            .user_agent(concat!("nipdex/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(http)?;

        let response = client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(http)?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(http)?;
        tracing::debug!("Fetched {} bytes from {}", body.len(), self.url);

        decode_contents_response(&self.url, &body)
    }

    /// Stub for when the remote feature is disabled
    #[cfg(not(feature = "remote"))]
    async fn fetch_document(&self) -> Result<String, FetchError> {
        Err(FetchError::Disabled)
    }
}

/// Wraps a source with the on-disk document cache
pub struct CachedSource<S> {
    inner: S,
    cache: DocumentCache,
    force_refresh: bool,
}

impl<S: DocumentSource> CachedSource<S> {
    pub fn new(inner: S, cache: DocumentCache) -> Self {
        Self {
            inner,
            cache,
            force_refresh: false,
        }
    }

    /// Skip the cache lookup (the fresh result is still written back)
    pub fn force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }
}

#[async_trait]
impl<S: DocumentSource> DocumentSource for CachedSource<S> {
    fn location(&self) -> &str {
        self.inner.location()
    }

    async fn fetch_document(&self) -> Result<String, FetchError> {
        let location = self.inner.location();

        if !self.force_refresh {
            match self.cache.load(location) {
                Ok(Some(cached)) => return Ok(cached),
                Ok(None) => {}
                Err(e) => warn!("Ignoring unreadable cache for {}: {:#}", location, e),
            }
        }

        let document = self.inner.fetch_document().await?;

        // Caching is best effort
        if let Err(e) = self.cache.save(location, &document) {
            warn!("Failed to save document to cache: {:#}", e);
        }

        Ok(document)
    }
}

#[cfg(test)]
mod source_tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    struct CountingSource {
        text: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DocumentSource for CountingSource {
        fn location(&self) -> &str {
            "counting://index"
        }

        async fn fetch_document(&self) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.clone())
        }
    }

    #[test]
    fn test_decode_contents_response() {
        // "- [NIP-01: Basic](01.md)\n" split across two lines like the API does
        let body = r#"{"encoding":"base64","content":"LSBbTklQLTAxOiBCYXNp\nY10oMDEubWQpCg==\n"}"#;
        let text = decode_contents_response("u", body).unwrap();
        assert_eq!(text, "- [NIP-01: Basic](01.md)\n");
    }

    #[test]
    fn test_decode_missing_content() {
        let err = decode_contents_response("u", r#"{"encoding":"base64"}"#).unwrap_err();
        assert!(matches!(err, FetchError::MissingField { field: "content", .. }));
    }

    #[test]
    fn test_decode_rejects_bad_payloads() {
        assert!(matches!(
            decode_contents_response("u", "not json").unwrap_err(),
            FetchError::InvalidResponse { .. }
        ));
        assert!(matches!(
            decode_contents_response("u", r#"{"encoding":"none","content":"abc"}"#).unwrap_err(),
            FetchError::InvalidResponse { .. }
        ));
        assert!(matches!(
            decode_contents_response("u", r#"{"content":"!!!"}"#).unwrap_err(),
            FetchError::Decode(_)
        ));
        // base64 of the invalid UTF-8 bytes [0xff, 0xfe]
        assert!(matches!(
            decode_contents_response("u", r#"{"content":"//4="}"#).unwrap_err(),
            FetchError::Utf8(_)
        ));
    }

    #[tokio::test]
    async fn test_file_source() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("README.md");
        std::fs::write(&path, "hello").unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.fetch_document().await.unwrap(), "hello");

        let missing = FileSource::new(temp_dir.path().join("absent.md"));
        assert!(matches!(
            missing.fetch_document().await.unwrap_err(),
            FetchError::Io { .. }
        ));
    }

    #[tokio::test]
    async fn test_cached_source_reuses_and_refreshes() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DocumentCache::new(temp_dir.path(), Duration::from_secs(60));
        let inner = CountingSource {
            text: "index".to_string(),
            calls: AtomicUsize::new(0),
        };

        let source = CachedSource::new(inner, cache.clone());
        assert_eq!(source.fetch_document().await.unwrap(), "index");
        assert_eq!(source.fetch_document().await.unwrap(), "index");
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 1);

        let source = source.force_refresh(true);
        assert_eq!(source.fetch_document().await.unwrap(), "index");
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 2);
    }
}
