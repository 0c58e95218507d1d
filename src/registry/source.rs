//! Frame sources
//!
//! A [`FrameSource`] produces a complete [`Catalog`] on demand. The registry
//! calls it on every refresh and swaps the result in wholesale.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use super::builtin;
use super::error::RegistryError;
use super::frame::Catalog;

/// Default timeout for remote catalog requests
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// External origin of frame data
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Load a fresh catalog
    async fn load(&self) -> Result<Catalog, RegistryError>;

    /// Human readable description, used in logs
    fn describe(&self) -> String;
}

/// The animations compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSource;

#[async_trait]
impl FrameSource for BuiltinSource {
    async fn load(&self) -> Result<Catalog, RegistryError> {
        Ok(builtin::catalog())
    }

    fn describe(&self) -> String {
        "builtin".to_owned()
    }
}

/// A JSON catalog on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source reading `path` on every load
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FrameSource for FileSource {
    async fn load(&self) -> Result<Catalog, RegistryError> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|source| RegistryError::Io {
                path: self.path.clone(),
                source,
            })?;

        Ok(Catalog::from_json(&data)?)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// A JSON catalog served over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source fetching `url` with the default timeout
    pub fn new(url: impl Into<String>) -> Result<Self, RegistryError> {
        Self::with_timeout(url, DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a source fetching `url` with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ascii-live/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Catalog URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FrameSource for HttpSource {
    async fn load(&self) -> Result<Catalog, RegistryError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(Catalog::from_json(&body)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
