use std::path::{Component, Path, PathBuf};

use super::{ObjectStore, StorageError};
use crate::config::StorageBackend;

/// Archives uploads into a local directory
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key below the root, refusing anything that escapes it
    fn target(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StorageError::Rejected(format!("invalid object key: {}", key)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Local
    }

    fn location(&self) -> String {
        format!("file://{}", self.root.display())
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<(), StorageError> {
        let target = self.target(key)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = tokio::fs::copy(path, &target).await?;
        tracing::debug!(key, bytes, target = %target.display(), "Archived file locally");
        Ok(())
    }

    async fn check(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let probe = self.root.join(format!(".docsum-probe-{}", uuid::Uuid::new_v4()));
        tokio::fs::write(&probe, b"probe").await?;
        tokio::fs::remove_file(&probe).await?;
        Ok(())
    }
}
