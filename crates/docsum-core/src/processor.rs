//! Upload processing
//!
//! Validates an uploaded file, spools it to a temporary file, extracts its text,
//! archives the original and summarizes the text. Archiving and summarizing run
//! concurrently; a failed archive never prevents a summary.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::extract::{
    allowed_file, extract_text, sanitize_filename, DocumentKind, ALLOWED_EXTENSIONS,
};
use crate::storage::{object_key, with_retry, ObjectStore};
use crate::summary::Summarizer;

/// A file received from the upload form
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// User-facing upload failures
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("No file part")]
    NoFilePart,

    #[error("No selected file")]
    EmptyFilename,

    #[error("Error processing file: only {} files are allowed", ALLOWED_EXTENSIONS.join(", "))]
    DisallowedExtension,

    #[error("Error processing file: {0}")]
    Extraction(String),

    #[error("Error saving file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error processing file: {0}")]
    Internal(String),
}

/// What happened to the original file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ArchiveOutcome {
    Stored { location: String, key: String },
    Skipped,
    Failed { message: String },
}

/// Result of a successful upload
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    pub filename: String,
    pub kind: DocumentKind,
    pub characters: usize,
    pub summary: String,
    pub archive: ArchiveOutcome,
}

/// Runs one upload through extraction, archiving and summarization
pub struct DocumentProcessor {
    summarizer: Arc<Summarizer>,
    store: Option<Arc<dyn ObjectStore>>,
    upload_dir: PathBuf,
    key_prefix: String,
    max_retries: u32,
}

impl DocumentProcessor {
    pub fn new(
        config: &AppConfig,
        summarizer: Arc<Summarizer>,
        store: Option<Arc<dyn ObjectStore>>,
    ) -> Self {
        Self {
            summarizer,
            store,
            upload_dir: config.upload_dir(),
            key_prefix: config.storage.key_prefix.clone(),
            max_retries: config.storage.max_retries,
        }
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    pub fn store(&self) -> Option<&Arc<dyn ObjectStore>> {
        self.store.as_ref()
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Process one uploaded file
    pub async fn process(&self, upload: Upload) -> Result<ProcessedDocument, ProcessError> {
        let span = tracing::info_span!(
            "upload",
            id = %Uuid::new_v4(),
            filename = %upload.filename,
            bytes = upload.bytes.len()
        );
        self.process_inner(upload).instrument(span).await
    }

    async fn process_inner(&self, upload: Upload) -> Result<ProcessedDocument, ProcessError> {
        if upload.filename.is_empty() {
            return Err(ProcessError::EmptyFilename);
        }
        if !allowed_file(&upload.filename) {
            tracing::info!("Rejected upload with disallowed extension");
            return Err(ProcessError::DisallowedExtension);
        }
        let kind = DocumentKind::from_filename(&upload.filename)
            .ok_or(ProcessError::DisallowedExtension)?;
        // Allowed names always keep their extension, so this is never empty
        let filename = sanitize_filename(&upload.filename);

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let temp = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&format!(".{}", kind.extension()))
            .tempfile_in(&self.upload_dir)?;
        tokio::fs::write(temp.path(), &upload.bytes).await?;
        tracing::info!(path = %temp.path().display(), "File saved");

        let text = match extract_text(kind, upload.bytes).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "Text extraction failed");
                return Err(ProcessError::Extraction(e.to_string()));
            }
        };
        let characters = text.chars().count();

        let (archive, summary) =
            tokio::join!(self.archive(&filename, temp.path()), self.summarize(text));
        let summary = summary?;

        let temp_path = temp.path().to_path_buf();
        match temp.close() {
            Ok(()) => tracing::info!(path = %temp_path.display(), "Temporary file removed"),
            Err(e) => tracing::warn!(error = %e, "Failed to remove temporary file"),
        }

        Ok(ProcessedDocument {
            filename,
            kind,
            characters,
            summary,
            archive,
        })
    }

    async fn archive(&self, filename: &str, path: &Path) -> ArchiveOutcome {
        let Some(store) = self.store.as_ref() else {
            return ArchiveOutcome::Skipped;
        };

        let key = object_key(&self.key_prefix, filename);
        match with_retry(self.max_retries, || store.put_file(&key, path)).await {
            Ok(()) => {
                tracing::info!(location = %store.location(), key = %key, "File archived");
                ArchiveOutcome::Stored {
                    location: store.location(),
                    key,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Archive upload failed");
                ArchiveOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn summarize(&self, text: String) -> Result<String, ProcessError> {
        let summarizer = self.summarizer.clone();
        tokio::task::spawn_blocking(move || summarizer.summarize(&text))
            .await
            .map_err(|e| ProcessError::Internal(e.to_string()))
    }
}
