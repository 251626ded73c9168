//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Create a configuration with test-friendly defaults.
    ///
    /// **For testing only.** Storage points at a relative path the caller is
    /// expected to override.
    pub fn for_testing() -> Self {
        Self::default()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size for block completion requests, in bytes.
    /// Caps the size of an uploaded metadata descriptor.
    #[serde(default = "default_max_meta_body_bytes")]
    pub max_meta_body_bytes: usize,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_meta_body_bytes() -> usize {
    4 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_meta_body_bytes: default_max_meta_body_bytes(),
        }
    }
}

/// Storage backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage.
    Filesystem {
        /// Root directory for storage.
        path: PathBuf,
    },
    /// S3-compatible storage.
    S3 {
        /// Bucket name.
        bucket: String,
        /// Optional endpoint URL (for MinIO, etc.).
        endpoint: Option<String>,
        /// AWS region.
        region: Option<String>,
        /// Optional key prefix.
        prefix: Option<String>,
        /// AWS access key ID. Falls back to the ambient credential chain if
        /// not set. Prefer env vars or IAM roles over secrets in config files.
        access_key_id: Option<String>,
        /// AWS secret access key. Same caveats as `access_key_id`.
        secret_access_key: Option<String>,
        /// Force path-style URLs (`endpoint/bucket/key`). Required for MinIO
        /// and some S3-compatible services; AWS S3 requires virtual-hosted
        /// style (false).
        #[serde(default)]
        force_path_style: bool,
    },
}

impl StorageConfig {
    /// Validate the configuration, returning a description of the problem.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Filesystem { path } => {
                if path.as_os_str().is_empty() {
                    return Err("filesystem storage requires a non-empty path".to_string());
                }
                Ok(())
            }
            Self::S3 {
                bucket,
                access_key_id,
                secret_access_key,
                ..
            } => {
                if bucket.is_empty() {
                    return Err("s3 storage requires a bucket name".to_string());
                }
                if access_key_id.is_some() ^ secret_access_key.is_some() {
                    return Err(
                        "s3 config requires both access_key_id and secret_access_key when either is set"
                            .to_string(),
                    );
                }
                Ok(())
            }
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: PathBuf::from("./data/storage"),
        }
    }
}
