//! Archive storage for original uploads

mod local;
mod retry;
mod s3;

pub use local::LocalStore;
pub use retry::{backoff_delay, with_retry, MAX_RETRIES};
pub use s3::S3Store;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{AppConfig, StorageBackend};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("temporary storage failure: {0}")]
    Transient(String),

    #[error("storage rejected the request: {0}")]
    Rejected(String),

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            StorageError::Transient(_) => true,
            StorageError::Rejected(_) => false,
            StorageError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::WouldBlock
            ),
        }
    }
}

/// Durable store for uploaded originals
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Backend kind
    fn backend(&self) -> StorageBackend;

    /// Human-readable location, e.g. `s3://bucket`
    fn location(&self) -> String;

    /// Store the file at `path` unmodified under `key`
    async fn put_file(&self, key: &str, path: &Path) -> Result<(), StorageError>;

    /// Verify the store is reachable and writable
    async fn check(&self) -> Result<(), StorageError>;
}

/// Build the configured store; `None` when archiving is disabled
pub async fn build_store(config: &AppConfig) -> Option<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.storage.backend {
        StorageBackend::S3 => Arc::new(S3Store::new(&config.storage).await),
        StorageBackend::Local => Arc::new(LocalStore::new(config.archive_dir())),
        StorageBackend::Disabled => {
            tracing::info!("Archive storage disabled");
            return None;
        }
    };
    tracing::info!(location = %store.location(), "Archive storage configured");
    Some(store)
}

/// Object key for an uploaded file, with an optional prefix
pub fn object_key(prefix: &str, filename: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        filename.to_string()
    } else {
        format!("{}/{}", prefix, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key() {
        assert_eq!(object_key("", "a.txt"), "a.txt");
        assert_eq!(object_key("uploads/", "a.txt"), "uploads/a.txt");
        assert_eq!(object_key("/team/docs/", "a.pdf"), "team/docs/a.pdf");
    }

    #[test]
    fn test_transient_classification() {
        assert!(StorageError::Transient("x".into()).is_transient());
        assert!(!StorageError::Rejected("x".into()).is_transient());
        assert!(StorageError::Io(std::io::Error::from(std::io::ErrorKind::TimedOut)).is_transient());
        assert!(!StorageError::Io(std::io::Error::from(std::io::ErrorKind::NotFound)).is_transient());
    }

    #[tokio::test]
    async fn test_build_store_by_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();

        config.storage.backend = StorageBackend::Disabled;
        assert!(build_store(&config).await.is_none());

        config.storage.backend = StorageBackend::Local;
        config.storage.local_dir = dir.path().to_path_buf();
        let store = build_store(&config).await.unwrap();
        assert_eq!(store.backend(), StorageBackend::Local);
    }
}
