//! Byte sources for animation assets.
//!
//! The renderer only needs "give me the bytes behind this URL". Implement
//! [`FrameSource`] to plug in your own I/O (an asset bundle, a cache, a test
//! fixture); HTTP and filesystem sources are provided.

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for fetching source bytes.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed or returned a non-success status
    #[cfg(feature = "http")]
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// Local file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The source has nothing at this URL
    #[error("no asset found at {0}")]
    NotFound(String),
}

/// Trait for async providers of raw asset bytes.
///
/// The returned future must be `Send` so loads can run on spawned tasks.
pub trait FrameSource: Send + Sync + 'static {
    /// Fetch the raw bytes behind `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, SourceError>> + Send;
}

/// Fetches assets over HTTP(S).
#[cfg(feature = "http")]
#[derive(Clone, Debug, Default)]
pub struct HttpSource {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, proxies, headers).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http")]
impl FrameSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let http_error = |source| SourceError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(http_error)?;
        let bytes = response.bytes().await.map_err(http_error)?;

        tracing::debug!(url, bytes = bytes.len(), "fetched asset");
        Ok(bytes.to_vec())
    }
}

/// Reads assets from the local filesystem.
///
/// URLs are treated as paths, optionally prefixed with `file://`, and resolved
/// against `root` when they are relative.
#[derive(Clone, Debug, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative URLs against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Map a URL onto a filesystem path.
    pub fn resolve(&self, url: &str) -> PathBuf {
        let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        }
    }
}

impl FrameSource for FileSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let path = self.resolve(url);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(SourceError::NotFound(url.to_string())),
            Err(source) => Err(SourceError::Io { path, source }),
        }
    }
}
