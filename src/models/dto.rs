use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::record::HistoryRecord;

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub id: i64,
}

/// Compact entry for GET /history
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: i64,
    pub file_name: String,
    pub file_size_bytes: u64,
    pub processing_duration_ms: u64,
    pub mean: f64,
    pub std_dev: f64,
}

/// Full entry for GET /history/{id}
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailItem {
    pub id: i64,
    pub file_name: String,
    pub file_size_bytes: u64,
    pub processing_duration_ms: u64,
    pub min_value: f64,
    pub max_value: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub records_count: u64,
    pub missing_count: u64,
    pub unique_count: u64,
    pub retained_file_path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
}

impl From<&HistoryRecord> for HistoryItem {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            id: record.id,
            file_name: record.file_name.clone(),
            file_size_bytes: record.file_size_bytes,
            processing_duration_ms: record.result.processing_duration_ms,
            mean: record.result.mean,
            std_dev: record.result.std_dev,
        }
    }
}

impl From<&HistoryRecord> for DetailItem {
    fn from(record: &HistoryRecord) -> Self {
        let result = &record.result;
        Self {
            id: record.id,
            file_name: record.file_name.clone(),
            file_size_bytes: record.file_size_bytes,
            processing_duration_ms: result.processing_duration_ms,
            min_value: result.min_value,
            max_value: result.max_value,
            mean: result.mean,
            std_dev: result.std_dev,
            records_count: result.records_count,
            missing_count: result.missing_count,
            unique_count: result.unique_count,
            retained_file_path: record.retained_file_path.display().to_string(),
            created_at: record.created_at,
        }
    }
}
