//! Asset fetching
//!
//! The viewer reads three static documents at startup through an
//! [`AssetFetcher`]. Paths are relative to the deck root.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use flipview_common::{Error, Result};

#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch the asset at `path` as text.
    async fn fetch_text(&self, path: &str) -> Result<String>;
}

/// Fetches assets over HTTP from a running deck server.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Internal(format!("HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::fetch(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| Error::fetch(path, e))
    }
}

/// Reads assets from a deck directory on disk.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` below the root, refusing anything that would leave it.
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(Error::fetch(path, "path escapes the deck root"));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetFetcher for DirFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        let full = self.resolve(path)?;
        debug!("Reading {}", full.display());
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| Error::fetch(path, e))
    }
}
