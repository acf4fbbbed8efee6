//! Bounded history of analysis results on SQLite.
//!
//! Every append assigns the next identity (AUTOINCREMENT, so ids are never
//! reused after deletes) and then trims the table back to the
//! [`RETENTION_LIMIT`] newest rows inside the same transaction.

use crate::core::constants::RETENTION_LIMIT;
use crate::core::error::{AnalyzerError, Result};
use crate::core::record::{AnalysisResult, FileMetadata, HistoryRecord};
use crate::core::retain;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS analysis_record (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  file_name TEXT NOT NULL,
  file_size INTEGER NOT NULL,
  processing_time INTEGER NOT NULL,
  min_value REAL NOT NULL,
  max_value REAL NOT NULL,
  mean REAL NOT NULL,
  std_dev REAL NOT NULL,
  records_count INTEGER NOT NULL,
  missing_count INTEGER NOT NULL,
  unique_count INTEGER NOT NULL,
  temp_file_path TEXT NOT NULL,
  created_at TEXT NOT NULL
);
"#;

const COLUMNS: &str = "id, file_name, file_size, processing_time, min_value, max_value, \
    mean, std_dev, records_count, missing_count, unique_count, temp_file_path, created_at";

pub struct HistoryStore {
    conn: Connection,
    remove_retained_files: bool,
}

impl HistoryStore {
    /// Wrap an existing connection and make sure the schema exists.
    pub fn new(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            remove_retained_files: true,
        })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Opening history database {}", path.display());
        Self::new(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Whether evicted or deleted records also unlink their retained upload.
    pub fn with_file_cleanup(mut self, enabled: bool) -> Self {
        self.remove_retained_files = enabled;
        self
    }

    pub fn append(&mut self, result: &AnalysisResult, meta: &FileMetadata) -> Result<i64> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO analysis_record ( \
                file_name, file_size, processing_time, min_value, max_value, mean, std_dev, \
                records_count, missing_count, unique_count, temp_file_path, created_at \
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                meta.file_name,
                meta.file_size_bytes as i64,
                result.processing_duration_ms as i64,
                result.min_value,
                result.max_value,
                result.mean,
                result.std_dev,
                result.records_count as i64,
                result.missing_count as i64,
                result.unique_count as i64,
                meta.retained_file_path.to_string_lossy().into_owned(),
                Utc::now(),
            ],
        )?;
        let id = tx.last_insert_rowid();

        let evicted = evict_oldest(&tx)?;
        tx.commit()?;

        debug!("Stored analysis {} for {}", id, meta.file_name);
        self.after_removal(&evicted);

        Ok(id)
    }

    /// Trim the table to the newest [`RETENTION_LIMIT`] records.
    pub fn enforce_retention(&mut self) -> Result<Vec<HistoryRecord>> {
        let tx = self.conn.transaction()?;
        let evicted = evict_oldest(&tx)?;
        tx.commit()?;

        self.after_removal(&evicted);
        Ok(evicted)
    }

    pub fn get(&self, id: i64) -> Result<Option<HistoryRecord>> {
        let sql = format!("SELECT {COLUMNS} FROM analysis_record WHERE id = ?1");
        let record = self
            .conn
            .query_row(&sql, params![id], record_from_row)
            .optional()?;
        Ok(record)
    }

    /// Newest first. Pages are 0-based; a page past the end is empty.
    pub fn list(&self, page: u32, page_size: u32) -> Result<Vec<HistoryRecord>> {
        let offset = page as i64 * page_size as i64;
        let sql = format!(
            "SELECT {COLUMNS} FROM analysis_record ORDER BY id DESC LIMIT ?1 OFFSET ?2"
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![page_size as i64, offset], record_from_row)?;
        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn delete(&mut self, id: i64) -> Result<()> {
        let record = self.get(id)?.ok_or(AnalyzerError::RecordNotFound(id))?;

        self.conn
            .execute("DELETE FROM analysis_record WHERE id = ?1", params![id])?;
        info!("Deleted analysis {} ({})", id, record.file_name);

        self.after_removal(std::slice::from_ref(&record));
        Ok(())
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM analysis_record", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn after_removal(&self, removed: &[HistoryRecord]) {
        if !self.remove_retained_files {
            return;
        }
        for record in removed {
            retain::discard(&record.retained_file_path);
        }
    }
}

fn evict_oldest(conn: &Connection) -> Result<Vec<HistoryRecord>> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM analysis_record", [], |row| row.get(0))?;
    let excess = count - RETENTION_LIMIT as i64;
    if excess <= 0 {
        return Ok(Vec::new());
    }

    let sql = format!("SELECT {COLUMNS} FROM analysis_record ORDER BY id ASC LIMIT ?1");
    let oldest = {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![excess], record_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()?
    };

    for record in &oldest {
        conn.execute("DELETE FROM analysis_record WHERE id = ?1", params![record.id])?;
        info!("Evicted analysis {} ({}) past retention limit", record.id, record.file_name);
    }

    Ok(oldest)
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryRecord> {
    let path: String = row.get(11)?;

    Ok(HistoryRecord {
        id: row.get(0)?,
        file_name: row.get(1)?,
        file_size_bytes: row.get::<_, i64>(2)? as u64,
        result: AnalysisResult {
            processing_duration_ms: row.get::<_, i64>(3)? as u64,
            min_value: row.get(4)?,
            max_value: row.get(5)?,
            mean: row.get(6)?,
            std_dev: row.get(7)?,
            records_count: row.get::<_, i64>(8)? as u64,
            missing_count: row.get::<_, i64>(9)? as u64,
            unique_count: row.get::<_, i64>(10)? as u64,
        },
        retained_file_path: PathBuf::from(path),
        created_at: row.get(12)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::HISTORY_PAGE_SIZE;

    fn result(mean: f64) -> AnalysisResult {
        AnalysisResult {
            records_count: 2,
            missing_count: 1,
            min_value: mean - 1.0,
            max_value: mean + 1.0,
            mean,
            std_dev: 1.4142135623730951,
            unique_count: 2,
            processing_duration_ms: 3,
        }
    }

    fn meta(i: i64) -> FileMetadata {
        FileMetadata {
            file_name: format!("file{i}.csv"),
            file_size_bytes: 100 + i as u64,
            retained_file_path: PathBuf::from(format!("/nonexistent/tmp_{i}.csv")),
        }
    }

    fn store() -> HistoryStore {
        HistoryStore::open_in_memory().unwrap().with_file_cleanup(false)
    }

    fn ids(records: &[HistoryRecord]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_append_and_get() {
        let mut store = store();
        let id = store.append(&result(150.0), &meta(1)).unwrap();

        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.file_name, "file1.csv");
        assert_eq!(record.file_size_bytes, 101);
        assert_eq!(record.result, result(150.0));
        assert_eq!(record.retained_file_path, PathBuf::from("/nonexistent/tmp_1.csv"));

        assert!(store.get(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_retention_keeps_newest_ten() {
        let mut store = store();
        let inserted: Vec<i64> = (1..=12)
            .map(|i| store.append(&result(i as f64), &meta(i)).unwrap())
            .collect();

        assert_eq!(store.count().unwrap(), RETENTION_LIMIT);
        assert!(store.get(inserted[0]).unwrap().is_none());
        assert!(store.get(inserted[1]).unwrap().is_none());
        for id in &inserted[2..] {
            assert!(store.get(*id).unwrap().is_some());
        }

        let first = store.list(0, HISTORY_PAGE_SIZE).unwrap();
        let second = store.list(1, HISTORY_PAGE_SIZE).unwrap();
        let third = store.list(2, HISTORY_PAGE_SIZE).unwrap();

        let mut expected: Vec<i64> = inserted[2..].to_vec();
        expected.reverse();
        assert_eq!(ids(&first), expected[..5]);
        assert_eq!(ids(&second), expected[5..]);
        assert!(third.is_empty());
    }

    #[test]
    fn test_list_past_end_is_empty() {
        let mut store = store();
        store.append(&result(1.0), &meta(1)).unwrap();

        assert_eq!(store.list(0, HISTORY_PAGE_SIZE).unwrap().len(), 1);
        assert!(store.list(7, HISTORY_PAGE_SIZE).unwrap().is_empty());
        assert!(store.list(u32::MAX, HISTORY_PAGE_SIZE).unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let mut store = store();
        let a = store.append(&result(1.0), &meta(1)).unwrap();
        let b = store.append(&result(2.0), &meta(2)).unwrap();

        let err = store.delete(b + 50).unwrap_err();
        assert!(matches!(err, AnalyzerError::RecordNotFound(_)));
        assert_eq!(store.count().unwrap(), 2);

        store.delete(a).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert!(store.get(a).unwrap().is_none());
        assert!(store.get(b).unwrap().is_some());
    }

    #[test]
    fn test_ids_never_reused() {
        let mut store = store();
        let a = store.append(&result(1.0), &meta(1)).unwrap();
        let b = store.append(&result(2.0), &meta(2)).unwrap();
        store.delete(b).unwrap();

        let c = store.append(&result(3.0), &meta(3)).unwrap();
        assert!(a < b);
        assert!(c > b);
    }

    #[test]
    fn test_enforce_retention_without_excess() {
        let mut store = store();
        store.append(&result(1.0), &meta(1)).unwrap();
        assert!(store.enforce_retention().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_eviction_removes_retained_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path().join("db").join("history.db")).unwrap();

        let mut paths = Vec::new();
        for i in 1..=11 {
            let path = dir.path().join(format!("tmp_{i}.csv"));
            std::fs::write(&path, "timestamp,value\na,1\n").unwrap();
            let meta = FileMetadata {
                file_name: format!("file{i}.csv"),
                file_size_bytes: 20,
                retained_file_path: path.clone(),
            };
            store.append(&result(1.0), &meta).unwrap();
            paths.push(path);
        }

        assert!(!paths[0].exists());
        assert!(paths[1..].iter().all(|p| p.exists()));

        let newest = store.list(0, 1).unwrap().remove(0);
        store.delete(newest.id).unwrap();
        assert!(!paths[10].exists());
    }

    #[test]
    fn test_eviction_keeps_files_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open_in_memory().unwrap().with_file_cleanup(false);

        let first = dir.path().join("tmp_first.csv");
        std::fs::write(&first, "timestamp,value\n").unwrap();
        store
            .append(
                &result(1.0),
                &FileMetadata {
                    file_name: "first.csv".into(),
                    file_size_bytes: 16,
                    retained_file_path: first.clone(),
                },
            )
            .unwrap();
        for i in 2..=11 {
            store.append(&result(1.0), &meta(i)).unwrap();
        }

        assert_eq!(store.count().unwrap(), RETENTION_LIMIT);
        assert!(first.exists());
    }

    #[test]
    fn test_reopen_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");

        let id = {
            let mut store = HistoryStore::open(&path).unwrap().with_file_cleanup(false);
            store.append(&result(9.5), &meta(1)).unwrap()
        };

        let store = HistoryStore::open(&path).unwrap();
        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.result.mean, 9.5);
    }
}
