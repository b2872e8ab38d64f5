// Fetch/parse pipeline - worker pools joined by channels
//
// locations -> getter workers -> bodies -> parser workers -> outputs
//
// The definition is shared read-only between parser workers; every parse
// call owns its own matching state.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use crate::config::ScraperSettings;
use crate::domain::definition::{Definition, Record};
use crate::services::reader::WebReader;

const CHANNEL_CAPACITY: usize = 32;

/// Records found in one page, plus the size of the page body in bytes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parsed {
    pub location: String,
    pub size: usize,
    pub records: Vec<Record>,
}

/// What comes out of the pipeline for each location fed in
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
    Parsed(Parsed),
    Failed { location: String, error: String },
}

impl PipelineOutput {
    pub fn location(&self) -> &str {
        match self {
            PipelineOutput::Parsed(parsed) => &parsed.location,
            PipelineOutput::Failed { location, .. } => location,
        }
    }
}

pub struct Pipeline {
    reader: Arc<dyn WebReader>,
    definition: Arc<dyn Definition>,
    getter_workers: usize,
    parser_workers: usize,
}

impl Pipeline {
    pub fn new(
        reader: Arc<dyn WebReader>,
        definition: Arc<dyn Definition>,
        settings: &ScraperSettings,
    ) -> Self {
        Self {
            reader,
            definition,
            getter_workers: settings.getter_workers.max(1),
            parser_workers: settings.parser_workers.max(1),
        }
    }

    /// Start the worker pools. Outputs arrive in completion order, not input
    /// order; the output channel closes once `locations` is closed and every
    /// location has been handled.
    pub fn run(&self, locations: mpsc::Receiver<String>) -> mpsc::Receiver<PipelineOutput> {
        let (out_tx, out_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (body_tx, body_rx) = mpsc::channel::<(String, String)>(CHANNEL_CAPACITY);

        let locations = Arc::new(Mutex::new(locations));
        for worker in 0..self.getter_workers {
            let locations = Arc::clone(&locations);
            let reader = Arc::clone(&self.reader);
            let body_tx = body_tx.clone();
            let out_tx = out_tx.clone();

            tokio::spawn(async move {
                loop {
                    let next = locations.lock().await.recv().await;
                    let Some(location) = next else { break };

                    tracing::debug!(worker, %location, "fetching");
                    let failure = match reader.get_body(&location).await {
                        Ok(body) if body.is_empty() => Some("Body was empty".to_string()),
                        Ok(body) => {
                            if body_tx.send((location.clone(), body)).await.is_err() {
                                break;
                            }
                            None
                        }
                        Err(e) => Some(format!("{:#}", e)),
                    };

                    if let Some(error) = failure {
                        tracing::warn!(%location, %error, "fetch failed");
                        let output = PipelineOutput::Failed { location, error };
                        if out_tx.send(output).await.is_err() {
                            break;
                        }
                    }
                }
            });
        }
        drop(body_tx);

        let bodies = Arc::new(Mutex::new(body_rx));
        for worker in 0..self.parser_workers {
            let bodies = Arc::clone(&bodies);
            let definition = Arc::clone(&self.definition);
            let out_tx = out_tx.clone();

            tokio::spawn(async move {
                loop {
                    let next = bodies.lock().await.recv().await;
                    let Some((location, body)) = next else { break };

                    let size = body.len();
                    let definition = Arc::clone(&definition);
                    let output = match tokio::task::spawn_blocking(move || definition.parse(&body)).await {
                        Ok(records) => {
                            tracing::debug!(worker, %location, records = records.len(), size, "parsed");
                            PipelineOutput::Parsed(Parsed {
                                location,
                                size,
                                records,
                            })
                        }
                        Err(e) => PipelineOutput::Failed {
                            location,
                            error: format!("parser task failed: {}", e),
                        },
                    };

                    if out_tx.send(output).await.is_err() {
                        break;
                    }
                }
            });
        }

        out_rx
    }

    /// Run a fixed list of locations through the pipeline and gather every
    /// output
    pub async fn collect(&self, locations: Vec<String>) -> Vec<PipelineOutput> {
        let (tx, rx) = mpsc::channel(locations.len().max(1));
        let mut outputs = self.run(rx);

        tokio::spawn(async move {
            for location in locations {
                if tx.send(location).await.is_err() {
                    break;
                }
            }
        });

        let mut results = Vec::new();
        while let Some(output) = outputs.recv().await {
            results.push(output);
        }
        results
    }
}
