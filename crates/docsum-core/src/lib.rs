pub mod config;
pub mod error;
pub mod extract;
pub mod processor;
pub mod storage;
pub mod summary;

pub use config::{AppConfig, StorageBackend};
pub use error::{Error, Result};
pub use processor::{ArchiveOutcome, DocumentProcessor, ProcessError, ProcessedDocument, Upload};
pub use summary::{summarize, Summarizer};
