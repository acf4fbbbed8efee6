use anyhow::{anyhow, Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::retain::prepare_retain_dir;
use crate::models::config_model::AnalyzerConfig;

static CONFIG_CACHE: OnceLock<AnalyzerConfig> = OnceLock::new();

pub const CONFIG_ENV: &str = "CSV_ANALYZER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "analyzer.json";

/// Read the JSON config; a missing file means "all defaults".
pub async fn load_config(file_path: &Path) -> Result<AnalyzerConfig> {
    match fs::read_to_string(file_path).await {
        Ok(data) => serde_json::from_str(&data)
            .with_context(|| format!("JSON parse error in {}", file_path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("{} not found, using default configuration", file_path.display());
            Ok(AnalyzerConfig::default())
        }
        Err(e) => Err(e).with_context(|| format!("File read error: {}", file_path.display())),
    }
}

pub async fn init_config_and_bind() -> Result<TcpListener> {
    let file_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = load_config(Path::new(&file_path)).await?;

    prepare_retain_dir(&config.storage.tmp_dir).with_context(|| {
        format!("Cannot create retain directory {}", config.storage.tmp_dir.display())
    })?;

    let bind_addr = format!("{}:{}", config.connection.ip, config.connection.port);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Bind failed: {bind_addr}"))?;

    // port 0 in the config means "pick one"
    config.connection.port = listener.local_addr().context("Addr error")?.port();

    info!("Config initialized with port: {}", config.connection.port);

    CONFIG_CACHE
        .set(config)
        .map_err(|_| anyhow!("Config already initialized"))?;

    Ok(listener)
}

pub fn get_cached_config() -> Option<&'static AnalyzerConfig> {
    CONFIG_CACHE.get()
}
