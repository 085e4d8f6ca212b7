use std::path::Path;
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use tracing::debug;

use crate::scoring::{self, ReferenceFetcher, ScoreError};

/// Downloads reference clips over HTTP(S).
///
/// The blocking client owns a background runtime, so it is only built on first use.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: OnceLock<Client>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_or_init(Client::new)
            .get(url)
            .send()
            .with_context(|| format!("Failed to download {url}"))?;

        if !response.status().is_success() {
            bail!("Download failed with status: {}", response.status());
        }

        let content = response
            .bytes()
            .with_context(|| format!("Failed to read response body for {url}"))?;
        debug!(url, bytes = content.len(), "downloaded reference");
        Ok(content.to_vec())
    }
}

impl ReferenceFetcher for HttpFetcher {
    fn fetch(&self, location: &str) -> scoring::Result<Vec<u8>> {
        self.download(location)
            .map_err(|err| ScoreError::fetch(location, format!("{err:#}")))
    }
}

/// Reads reference clips from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher {}

impl FileFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReferenceFetcher for FileFetcher {
    fn fetch(&self, location: &str) -> scoring::Result<Vec<u8>> {
        let path = location.strip_prefix("file://").unwrap_or(location);
        std::fs::read(Path::new(path)).map_err(|err| ScoreError::fetch(location, err))
    }
}

/// Routes `http://` and `https://` locators to [`HttpFetcher`], everything else to disk.
#[derive(Debug, Clone, Default)]
pub struct SourceFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl SourceFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReferenceFetcher for SourceFetcher {
    fn fetch(&self, location: &str) -> scoring::Result<Vec<u8>> {
        let location = location.trim();
        if is_remote(location) {
            self.http.fetch(location)
        } else {
            self.file.fetch(location)
        }
    }
}

pub fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
