// Web readers - strategies for getting the body of a page

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ReaderKind, ScraperSettings};
use crate::validation;

/// Anything that can return the body of a page for a location
#[async_trait]
pub trait WebReader: Send + Sync {
    async fn get_body(&self, location: &str) -> Result<String>;
}

/// Plain HTTP GET
#[derive(Clone)]
pub struct HttpReader {
    client: reqwest::Client,
}

impl HttpReader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebReader for HttpReader {
    async fn get_body(&self, location: &str) -> Result<String> {
        let url = validation::validate_url(location)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("could not get from url: {}", location))?;

        let status = response.status();
        if !status.is_success() {
            bail!("{} returned status {}", location, status);
        }

        response
            .text()
            .await
            .with_context(|| format!("could not read response body from {}", location))
    }
}

/// HTTP GET through a page cache, which serves the rendered version of a
/// page. The location is appended to the cache prefix as-is.
#[derive(Clone)]
pub struct CacheReader {
    http: HttpReader,
    prefix: String,
}

impl CacheReader {
    pub fn new(http: HttpReader, prefix: impl Into<String>) -> Self {
        Self {
            http,
            prefix: prefix.into(),
        }
    }

    pub fn cache_url(&self, location: &str) -> String {
        format!("{}{}", self.prefix, location)
    }
}

#[async_trait]
impl WebReader for CacheReader {
    async fn get_body(&self, location: &str) -> Result<String> {
        if location.is_empty() {
            bail!("url length cannot be 0");
        }
        self.http.get_body(&self.cache_url(location)).await
    }
}

/// Reads saved pages from disk
#[derive(Clone, Default)]
pub struct FileReader;

#[async_trait]
impl WebReader for FileReader {
    async fn get_body(&self, location: &str) -> Result<String> {
        tokio::fs::read_to_string(location)
            .await
            .with_context(|| format!("could not read file: {}", location))
    }
}

/// Build the reader the settings ask for
pub fn reader_for(settings: &ScraperSettings) -> Result<Arc<dyn WebReader>> {
    let timeout = Duration::from_secs(settings.timeout_secs);
    let reader: Arc<dyn WebReader> = match settings.reader {
        ReaderKind::Http => Arc::new(HttpReader::new(timeout)?),
        ReaderKind::Cache => Arc::new(CacheReader::new(
            HttpReader::new(timeout)?,
            settings.cache_prefix.clone(),
        )),
        ReaderKind::File => Arc::new(FileReader),
    };
    Ok(reader)
}
