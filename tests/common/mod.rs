// Shared helpers for integration tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use scrapedef::services::WebReader;
use scrapedef::Record;

/// In-memory reader: known locations return their page, anything else fails
#[derive(Default)]
pub struct FakeReader {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

impl FakeReader {
    pub fn with_page(mut self, location: &str, body: &str) -> Self {
        self.pages.insert(location.to_string(), body.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebReader for FakeReader {
    async fn get_body(&self, location: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(location)
            .cloned()
            .ok_or_else(|| anyhow!("no page at {}", location))
    }
}

#[allow(dead_code)]
pub fn record(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
