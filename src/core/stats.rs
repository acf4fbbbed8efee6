// Running statistics for a single pass (Welford's algorithm)

use crate::core::record::AnalysisResult;
use std::collections::HashSet;
use std::time::Duration;

/// Accumulator for one analysis pass.
///
/// Mean and variance are updated with Welford's online method so the values
/// never need to be buffered. Distinct values are tracked by their exact bit
/// pattern, which is the only part whose memory grows with the input.
#[derive(Debug, Clone)]
pub struct RunningStats {
    records: u64,
    missing: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
    unique: HashSet<u64>,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningStats {
    pub fn new() -> Self {
        Self {
            records: 0,
            missing: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            unique: HashSet::new(),
        }
    }

    pub fn push(&mut self, value: f64) {
        self.records += 1;

        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.unique.insert(value.to_bits());

        let delta = value - self.mean;
        self.mean += delta / self.records as f64;
        // M2 must use the updated mean
        self.m2 += delta * (value - self.mean);
    }

    pub fn mark_missing(&mut self) {
        self.missing += 1;
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn missing(&self) -> u64 {
        self.missing
    }

    /// Sample standard deviation (n - 1 denominator).
    pub fn std_dev(&self) -> f64 {
        if self.records > 1 {
            (self.m2 / (self.records - 1) as f64).sqrt()
        } else {
            0.0
        }
    }

    pub fn finish(self, elapsed: Duration) -> AnalysisResult {
        let has_values = self.records > 0;
        let std_dev = self.std_dev();

        AnalysisResult {
            records_count: self.records,
            missing_count: self.missing,
            min_value: if has_values { self.min } else { 0.0 },
            max_value: if has_values { self.max } else { 0.0 },
            mean: if has_values { self.mean } else { 0.0 },
            std_dev,
            unique_count: self.unique.len() as u64,
            processing_duration_ms: elapsed.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(values: &[f64]) -> AnalysisResult {
        let mut stats = RunningStats::new();
        for v in values {
            stats.push(*v);
        }
        stats.finish(Duration::ZERO)
    }

    #[test]
    fn test_two_values() {
        let result = collect(&[100.0, 200.0]);

        assert_eq!(result.records_count, 2);
        assert_eq!(result.missing_count, 0);
        assert_eq!(result.min_value, 100.0);
        assert_eq!(result.max_value, 200.0);
        assert_eq!(result.mean, 150.0);
        assert_eq!(result.unique_count, 2);
        assert!((result.std_dev - 5000.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_identical_values() {
        let result = collect(&[42.5; 20]);

        assert_eq!(result.records_count, 20);
        assert_eq!(result.mean, 42.5);
        assert_eq!(result.std_dev, 0.0);
        assert_eq!(result.unique_count, 1);
    }

    #[test]
    fn test_empty_defaults_to_zero() {
        let mut stats = RunningStats::new();
        stats.mark_missing();
        let result = stats.finish(Duration::ZERO);

        assert_eq!(result.records_count, 0);
        assert_eq!(result.missing_count, 1);
        assert_eq!(result.min_value, 0.0);
        assert_eq!(result.max_value, 0.0);
        assert_eq!(result.mean, 0.0);
        assert_eq!(result.std_dev, 0.0);
        assert_eq!(result.unique_count, 0);
    }

    #[test]
    fn test_single_value_has_zero_std_dev() {
        let result = collect(&[-3.25]);

        assert_eq!(result.mean, -3.25);
        assert_eq!(result.min_value, -3.25);
        assert_eq!(result.max_value, -3.25);
        assert_eq!(result.std_dev, 0.0);
    }

    #[test]
    fn test_all_negative_extrema() {
        let result = collect(&[-5.0, -1.0, -9.0]);
        assert_eq!(result.min_value, -9.0);
        assert_eq!(result.max_value, -1.0);
    }

    #[test]
    fn test_order_independent() {
        let forward = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0, 1e6, -3.5];
        let mut reversed = forward;
        reversed.reverse();

        let a = collect(&forward);
        let b = collect(&reversed);

        assert!((a.mean - b.mean).abs() <= 1e-9 * a.mean.abs());
        assert!((a.std_dev - b.std_dev).abs() <= 1e-9 * a.std_dev);
        assert_eq!(a.unique_count, b.unique_count);
    }

    #[test]
    fn test_matches_two_pass_variance() {
        let values: Vec<f64> = (0..1000).map(|i| 1e9 + (i % 17) as f64 * 0.25).collect();
        let result = collect(&values);

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

        assert!((result.mean - mean).abs() < 1e-3);
        assert!((result.std_dev - var.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_unique_uses_exact_equality() {
        // 0.1 + 0.2 != 0.3 in binary floating point
        let result = collect(&[0.3, 0.1 + 0.2, 0.3]);
        assert_eq!(result.unique_count, 2);
    }
}
