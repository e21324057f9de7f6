use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured archive bucket
pub const BUCKET_ENV: &str = "S3_BUCKET";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the web form listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,
    /// Largest accepted request body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Directory for temporary upload files
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            max_upload_bytes: default_max_upload_bytes(),
            upload_dir: default_upload_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Number of sentences in a summary
    #[serde(default = "default_sentence_count")]
    pub sentence_count: usize,
    /// Tokenizer/stemmer/stop-word profile
    #[serde(default = "default_language")]
    pub language: String,
    /// Characters kept by the truncation fallback
    #[serde(default = "default_fallback_chars")]
    pub fallback_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            sentence_count: default_sentence_count(),
            language: default_language(),
            fallback_chars: default_fallback_chars(),
        }
    }
}

/// Archive backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
    Disabled,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
            StorageBackend::Disabled => write!(f, "disabled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend: "s3", "local" or "disabled"
    #[serde(default = "default_storage_backend")]
    pub backend: StorageBackend,
    /// S3 bucket name (overridden by S3_BUCKET)
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible services (e.g., "http://127.0.0.1:9000")
    #[serde(default, deserialize_with = "blank_as_none")]
    pub endpoint_url: Option<String>,
    /// Use path-style addressing (required by most S3-compatible services)
    #[serde(default)]
    pub force_path_style: bool,
    /// Prefix prepended to every object key
    #[serde(default)]
    pub key_prefix: String,
    /// Target directory for the local backend
    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,
    /// Retries for transient upload failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            bucket: default_bucket(),
            region: default_region(),
            endpoint_url: None,
            force_path_style: false,
            key_prefix: String::new(),
            local_dir: default_local_dir(),
            max_retries: default_max_retries(),
        }
    }
}

/// Treat an empty or whitespace-only string as unset
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docsum")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5001))
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_upload_dir() -> PathBuf {
    default_data_dir().join("uploads")
}

fn default_sentence_count() -> usize {
    3
}

fn default_language() -> String {
    "english".to_string()
}

fn default_fallback_chars() -> usize {
    500
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::S3
}

fn default_bucket() -> String {
    "summary-gen-uploads".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_local_dir() -> PathBuf {
    default_data_dir().join("archive")
}

fn default_max_retries() -> u32 {
    3
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults when absent
    pub fn load_from(config_path: &Path) -> crate::Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(bucket) = std::env::var(BUCKET_ENV) {
            if !bucket.trim().is_empty() {
                self.storage.bucket = bucket.trim().to_string();
            }
        }
    }

    /// Reject settings that cannot work at runtime
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.max_upload_bytes == 0 {
            return Err(crate::Error::Config(
                "server.max_upload_bytes must be greater than zero".to_string(),
            ));
        }

        if crate::summary::LanguageProfile::for_language(&self.summary.language).is_none() {
            return Err(crate::Error::Config(format!(
                "Unsupported summary language: {}",
                self.summary.language
            )));
        }

        if self.storage.backend == StorageBackend::S3 {
            if self.storage.bucket.trim().is_empty() {
                return Err(crate::Error::Config(
                    "storage.bucket is required for the s3 backend".to_string(),
                ));
            }
            if let Some(ref endpoint) = self.storage.endpoint_url {
                url::Url::parse(endpoint)?;
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to(&self, config_path: &Path) -> crate::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/docsum/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("docsum")
            .join("config.toml")
    }

    /// Get the temporary upload directory (with tilde expansion)
    pub fn upload_dir(&self) -> PathBuf {
        expand_tilde(&self.server.upload_dir)
    }

    /// Get the local archive directory (with tilde expansion)
    pub fn archive_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.local_dir)
    }
}
