//! Application state shared across handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use docsum_core::storage::build_store;
use docsum_core::{AppConfig, DocumentProcessor, Summarizer};

use crate::error::Result;
use crate::templates::Templates;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Effective configuration.
    pub config: Arc<AppConfig>,

    /// Upload pipeline.
    pub processor: Arc<DocumentProcessor>,

    /// Compiled page templates.
    pub templates: Arc<Templates>,

    /// When the server started, for uptime reporting.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create state around an already-built processor.
    pub fn new(config: AppConfig, processor: DocumentProcessor) -> Result<Self> {
        let templates = Templates::new(config.server.max_upload_bytes)?;
        Ok(Self {
            config: Arc::new(config),
            processor: Arc::new(processor),
            templates: Arc::new(templates),
            started_at: Utc::now(),
        })
    }

    /// Build the summarizer and archive store from configuration.
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        let summarizer = Arc::new(Summarizer::new(&config)?);
        let store = build_store(&config).await;
        info!(
            language = summarizer.language(),
            sentences = summarizer.sentence_count(),
            "Summarizer ready"
        );

        let processor = DocumentProcessor::new(&config, summarizer, store);
        Self::new(config, processor)
    }

    /// Name of the archive backend in use.
    pub fn storage_backend(&self) -> String {
        self.processor
            .store()
            .map(|store| store.backend().to_string())
            .unwrap_or_else(|| "disabled".to_string())
    }

    /// Seconds since the state was created.
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}
