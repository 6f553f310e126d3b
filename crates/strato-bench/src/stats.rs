//! Statistics aggregation over timed samples

use crate::bench_trace;
use crate::error::{BenchError, Result};
use crate::logging::LogCategory;
use serde::{Deserialize, Serialize};

/// Six-number digest of one set of timed runs, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub p95: f64,
    pub p99: f64,
    /// Number of samples the digest was computed from
    pub samples: usize,
}

/// Summarize `samples`.
///
/// Samples are sorted ascending; the median is the element at `n / 2` and
/// the percentiles the elements at `floor(n * 0.95)` and `floor(n * 0.99)`.
/// No interpolation is performed.
pub fn summarize(samples: &[f64]) -> Result<StatSummary> {
    if samples.is_empty() {
        return Err(BenchError::invalid_input("cannot summarize zero samples"));
    }
    if let Some(bad) = samples.iter().find(|s| !s.is_finite()) {
        return Err(BenchError::invalid_input(format!(
            "sample {} is not a finite duration",
            bad
        )));
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let average = sorted.iter().sum::<f64>() / n as f64;
    bench_trace!(LogCategory::Stats, samples = n, average, "samples summarized");

    Ok(StatSummary {
        average,
        median: sorted[n / 2],
        min: sorted[0],
        max: sorted[n - 1],
        p95: sorted[percentile_index(n, 95)],
        p99: sorted[percentile_index(n, 99)],
        samples: n,
    })
}

// floor(n * pct / 100) without floating point rounding, clamped to the last element
fn percentile_index(n: usize, pct: usize) -> usize {
    (n * pct / 100).min(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_one_to_five() {
        let summary = summarize(&[3.0, 1.0, 5.0, 2.0, 4.0]).unwrap();

        assert_eq!(
            summary,
            StatSummary {
                average: 3.0,
                median: 3.0,
                min: 1.0,
                max: 5.0,
                p95: 5.0,
                p99: 5.0,
                samples: 5,
            }
        );
    }

    #[test]
    fn test_even_count_takes_upper_median() {
        let summary = summarize(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.average, 2.5);
    }

    #[test]
    fn test_hundred_samples_percentiles() {
        let samples: Vec<f64> = (1..=100).map(f64::from).collect();
        let summary = summarize(&samples).unwrap();

        assert_eq!(summary.median, 51.0);
        assert_eq!(summary.p95, 96.0);
        assert_eq!(summary.p99, 100.0);
    }

    #[test]
    fn test_single_sample() {
        let summary = summarize(&[0.25]).unwrap();
        assert_eq!(summary.min, 0.25);
        assert_eq!(summary.p99, 0.25);
    }

    #[test]
    fn test_rejects_empty_and_non_finite() {
        assert!(matches!(
            summarize(&[]),
            Err(BenchError::InvalidInput { .. })
        ));
        assert!(summarize(&[1.0, f64::NAN]).is_err());
    }

    proptest! {
        #[test]
        fn prop_ordering_holds(samples in prop::collection::vec(0.0f64..1000.0, 1..200)) {
            let s = summarize(&samples).unwrap();
            prop_assert!(s.min <= s.median);
            prop_assert!(s.median <= s.p95);
            prop_assert!(s.p95 <= s.p99);
            prop_assert!(s.p99 <= s.max);
            prop_assert!(s.min <= s.average + 1e-9 && s.average <= s.max + 1e-9);
            prop_assert_eq!(s.samples, samples.len());
        }

        #[test]
        fn prop_constant_samples_collapse(value in 0.0f64..1000.0, n in 1usize..64) {
            let s = summarize(&vec![value; n]).unwrap();
            prop_assert_eq!(s.min, value);
            prop_assert_eq!(s.median, value);
            prop_assert_eq!(s.max, value);
            prop_assert_eq!(s.p95, value);
            prop_assert_eq!(s.p99, value);
        }
    }
}
