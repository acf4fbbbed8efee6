use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::constants::DEFAULT_MAX_UPLOAD_BYTES;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub name: String,
    pub version: String,
    pub connection: Connection,
    pub storage: StorageConfig,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    pub ip: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory where raw uploads are retained; created on startup.
    pub tmp_dir: PathBuf,
    pub database_path: PathBuf,
    pub remove_retained_files: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            connection: Connection::default(),
            storage: StorageConfig::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tmp_dir: PathBuf::from("tmp"),
            database_path: PathBuf::from("data/history.db"),
            remove_retained_files: true,
        }
    }
}
