// Analyze a CSV file from the command line and record it in a scratch history

use csv_analyzer::{analyze_file, FileMetadata, HistoryStore, Result};
use std::path::PathBuf;
use tracing::{info, Level};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/sample.csv"));

    let result = analyze_file(&path)?;

    info!("File: {}", path.display());
    info!("  records: {}  missing: {}  unique: {}",
        result.records_count, result.missing_count, result.unique_count);
    info!("  min: {}  max: {}", result.min_value, result.max_value);
    info!("  mean: {}  std dev: {}", result.mean, result.std_dev);
    info!("  pass took {} ms", result.processing_duration_ms);

    // The in-memory store keeps the user's file where it is
    let mut store = HistoryStore::open_in_memory()?.with_file_cleanup(false);
    let meta = FileMetadata {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string()),
        file_size_bytes: std::fs::metadata(&path)?.len(),
        retained_file_path: path.clone(),
    };
    let id = store.append(&result, &meta)?;
    info!("Stored as history record {}", id);

    Ok(())
}
