use anyhow::Context;
use tracing::{info, Level};

use csv_analyzer::utils::conf_helper::{get_cached_config, init_config_and_bind};
use csv_analyzer::{build_router, AppState, HistoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    // === CONFIG + LISTENER ===
    let listener = init_config_and_bind()
        .await
        .context("CRITICAL INIT FAILURE")?;

    let config = get_cached_config().context("Config not initialized")?;

    let store = HistoryStore::open(&config.storage.database_path)?
        .with_file_cleanup(config.storage.remove_retained_files);

    let state = AppState::new(store, config.storage.tmp_dir.clone())
        .with_max_upload_bytes(config.max_upload_bytes);

    info!(
        "Server initialized on {}:{}",
        config.connection.ip,
        config.connection.port
    );

    axum::serve(listener, build_router(state))
        .await
        .context("Server error")?;

    Ok(())
}
