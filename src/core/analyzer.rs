// Streaming CSV analysis: one pass, header skipped, malformed rows counted

use crate::core::constants::CSV_DELIMITER;
use crate::core::error::{AnalyzerError, Result};
use crate::core::record::AnalysisResult;
use crate::core::stats::RunningStats;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowOutcome {
    Valid(f64),
    Missing,
}

/// Classify one data line. The timestamp column is opaque; only the value
/// column is trimmed and parsed.
///
/// Trailing empty fields are dropped before counting, so `t,5,` is a two-field
/// row. Unlike plain `f64` parsing, `NaN` and infinities are counted as
/// missing: neither survives storage as a REAL column nor JSON output.
pub fn parse_row(line: &str) -> RowOutcome {
    let mut fields = line.trim_end_matches(CSV_DELIMITER).split(CSV_DELIMITER);
    let (Some(_timestamp), Some(value), None) = (fields.next(), fields.next(), fields.next())
    else {
        return RowOutcome::Missing;
    };

    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => RowOutcome::Valid(v),
        _ => RowOutcome::Missing,
    }
}

/// Run the statistics pass over a line source whose first line is a header.
///
/// A read failure aborts the whole pass; bad rows never do.
pub fn analyze<R: BufRead>(reader: R) -> Result<AnalysisResult> {
    let mut stats = RunningStats::new();
    let started = Instant::now();

    let mut lines = reader.lines();
    // header: discarded, but a read failure still aborts
    lines.next().transpose().map_err(read_error)?;

    for line in lines {
        let line = line.map_err(read_error)?;

        match parse_row(&line) {
            RowOutcome::Valid(v) => stats.push(v),
            RowOutcome::Missing => stats.mark_missing(),
        }
    }

    let elapsed = started.elapsed();
    debug!(
        "Pass finished: {} valid, {} missing in {:?}",
        stats.records(),
        stats.missing(),
        elapsed
    );

    Ok(stats.finish(elapsed))
}

fn read_error(e: std::io::Error) -> AnalyzerError {
    AnalyzerError::Processing(format!("Failed to read CSV file: {e}"))
}

pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<AnalysisResult> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        AnalyzerError::Processing(format!("Failed to open {}: {e}", path.display()))
    })?;

    analyze(BufReader::new(file))
}
