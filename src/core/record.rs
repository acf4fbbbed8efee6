// Data structures produced by the engine and persisted by the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary of a single streaming pass over a CSV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub records_count: u64,
    pub missing_count: u64,
    pub min_value: f64,
    pub max_value: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub unique_count: u64,
    pub processing_duration_ms: u64,
}

impl AnalysisResult {
    /// Rows after the header, valid or not.
    pub fn total_rows(&self) -> u64 {
        self.records_count + self.missing_count
    }
}

/// Upload facts stored next to the statistics.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub file_name: String,
    pub file_size_bytes: u64,
    pub retained_file_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub id: i64,
    pub file_name: String,
    pub file_size_bytes: u64,
    pub result: AnalysisResult,
    pub retained_file_path: PathBuf,
    pub created_at: DateTime<Utc>,
}
