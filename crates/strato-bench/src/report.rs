//! Comparative reporting and JSON export
//!
//! The first adapter in the results table is adapter A, the second is
//! adapter B. `speedup_ratio = B.average / A.average`, so a ratio above 1
//! means adapter A finished the scenario faster. A ratio that is not a
//! finite number (zero-millisecond averages) is recorded as `None`.

use crate::config::{BenchConfig, ReportConfig};
use crate::error::Result;
use crate::logging::LogCategory;
use crate::runner::ResultsTable;
use crate::scenario::ScenarioRegistry;
use crate::stats::StatSummary;
use crate::{bench_debug, bench_info};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Side-by-side average times for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub scenario_name: String,
    /// Average of adapter A, in milliseconds
    pub time_a: f64,
    /// Average of adapter B, in milliseconds
    pub time_b: f64,
    /// `time_b / time_a`, or `None` when that is not finite
    pub speedup_ratio: Option<f64>,
}

/// Compare the first two adapters of `table`, one row per scenario in
/// registry order.
///
/// Returns nothing when fewer than two adapters were measured. Scenarios
/// missing from either adapter are skipped.
pub fn compare(table: &ResultsTable, registry: &ScenarioRegistry) -> Vec<ComparisonRow> {
    let [a, b, ..] = table.adapters() else {
        return Vec::new();
    };

    registry
        .iter()
        .filter_map(|scenario| {
            let time_a = a.get(&scenario.name)?.summary.average;
            let time_b = match b.get(&scenario.name) {
                Some(result) => result.summary.average,
                None => {
                    bench_debug!(LogCategory::Report, scenario = %scenario.name, "no comparison row");
                    return None;
                }
            };
            Some(ComparisonRow {
                scenario_name: scenario.name.clone(),
                time_a,
                time_b,
                speedup_ratio: Some(time_b / time_a).filter(|ratio| ratio.is_finite()),
            })
        })
        .collect()
}

/// Geometric mean of the finite, positive speedup ratios
pub fn geometric_mean_speedup(rows: &[ComparisonRow]) -> Option<f64> {
    let logs: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.speedup_ratio)
        .filter(|ratio| ratio.is_finite() && *ratio > 0.0)
        .map(f64::ln)
        .collect();
    if logs.is_empty() {
        return None;
    }
    Some((logs.iter().sum::<f64>() / logs.len() as f64).exp())
}

/// Human-readable report
#[derive(Debug, Clone)]
pub struct Report<'a> {
    table: &'a ResultsTable,
    registry: &'a ScenarioRegistry,
    rows: Vec<ComparisonRow>,
    precision: usize,
}

impl<'a> Report<'a> {
    pub fn new(table: &'a ResultsTable, registry: &'a ScenarioRegistry) -> Self {
        Self {
            table,
            registry,
            rows: compare(table, registry),
            precision: ReportConfig::default().precision,
        }
    }

    /// Decimal places for millisecond values
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>, summary: &StatSummary) -> fmt::Result {
        let p = self.precision;
        let stats = [
            ("average", summary.average),
            ("median", summary.median),
            ("min", summary.min),
            ("max", summary.max),
            ("p95", summary.p95),
            ("p99", summary.p99),
        ];
        for (label, value) in stats {
            writeln!(f, "    {:<8} {:>12.p$} ms", label, value, p = p)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for adapter in self.table.adapters() {
            writeln!(f, "== {} ==", adapter.adapter)?;
            for scenario in self.registry {
                match adapter.get(&scenario.name) {
                    Some(result) => {
                        write!(f, "  {} ({} samples", scenario.name, result.summary.samples)?;
                        if result.dropped > 0 {
                            write!(f, ", {} dropped", result.dropped)?;
                        }
                        writeln!(f, ")")?;
                        self.write_summary(f, &result.summary)?;
                    }
                    None => writeln!(f, "  {} (no data)", scenario.name)?,
                }
            }
            writeln!(f)?;
        }

        let [a, b, ..] = self.table.adapters() else {
            return Ok(());
        };

        let p = self.precision;
        writeln!(f, "== comparison ==")?;
        writeln!(
            f,
            "  {:<16} {:>14} {:>14} {:>9}",
            "scenario",
            format!("{} (ms)", a.adapter),
            format!("{} (ms)", b.adapter),
            "speedup"
        )?;
        for row in &self.rows {
            write!(
                f,
                "  {:<16} {:>14.p$} {:>14.p$} ",
                row.scenario_name,
                row.time_a,
                row.time_b,
                p = p
            )?;
            match row.speedup_ratio {
                Some(ratio) => writeln!(f, "{:>8.2}x", ratio)?,
                None => writeln!(f, "{:>9}", "n/a")?,
            }
        }

        if let Some(mean) = geometric_mean_speedup(&self.rows) {
            writeln!(
                f,
                "\n{} vs {}: geometric mean speedup {:.2}x over {} scenarios",
                a.adapter,
                b.adapter,
                mean,
                self.rows.len()
            )?;
        }
        Ok(())
    }
}

/// Machine-readable report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub config: BenchConfig,
    pub results: ResultsTable,
    pub comparison: Vec<ComparisonRow>,
    pub geometric_mean_speedup: Option<f64>,
}

impl JsonReport {
    pub fn new(config: BenchConfig, table: &ResultsTable, registry: &ScenarioRegistry) -> Self {
        let comparison = compare(table, registry);
        Self {
            version: crate::VERSION.to_string(),
            timestamp: Utc::now(),
            config,
            results: table.clone(),
            geometric_mean_speedup: geometric_mean_speedup(&comparison),
            comparison,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        bench_info!(LogCategory::Report, path = %path.display(), "wrote JSON report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::LayoutAdapter;
    use crate::adapters::ProbeAdapter;
    use crate::executor::{ManualClock, TimedExecutor};
    use crate::runner::BenchmarkRunner;
    use pretty_assertions::assert_eq;

    fn row(ratio: f64) -> ComparisonRow {
        ComparisonRow {
            scenario_name: "x".to_string(),
            time_a: 1.0,
            time_b: ratio,
            speedup_ratio: Some(ratio).filter(|r| r.is_finite()),
        }
    }

    #[test]
    fn test_geometric_mean() {
        let mean = geometric_mean_speedup(&[row(2.0), row(8.0)]).unwrap();
        assert!((mean - 4.0).abs() < 1e-12);
        assert_eq!(geometric_mean_speedup(&[]), None);
        assert_eq!(geometric_mean_speedup(&[row(f64::INFINITY)]), None);
        assert_eq!(geometric_mean_speedup(&[row(f64::NAN), row(4.0)]), Some(4.0));
    }

    #[test]
    fn test_zero_averages_give_no_ratio_and_valid_json() {
        let clock = ManualClock::new();
        let runner = BenchmarkRunner::with_executor(
            BenchConfig::new(3, 1),
            TimedExecutor::with_clock(clock),
        );
        let mut adapters: Vec<Box<dyn LayoutAdapter>> = vec![
            Box::new(ProbeAdapter::new("a")),
            Box::new(ProbeAdapter::new("b")),
        ];
        let registry = ScenarioRegistry::builtin();
        let table = runner.run_all(&registry, &mut adapters).unwrap();

        let report = Report::new(&table, &registry);
        assert_eq!(report.rows().len(), registry.len());
        assert!(report.rows().iter().all(|row| row.speedup_ratio.is_none()));
        assert!(report.to_string().contains("n/a"));

        let json = JsonReport::new(BenchConfig::new(3, 1), &table, &registry)
            .to_json()
            .unwrap();
        assert!(json.contains("\"speedup_ratio\": null"));
        let parsed: JsonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.comparison, report.rows());
        assert_eq!(parsed.geometric_mean_speedup, None);
        assert_eq!(parsed.results, table);
    }

    #[test]
    fn test_empty_table_has_no_rows() {
        let table = ResultsTable::default();
        let registry = ScenarioRegistry::builtin();
        assert!(compare(&table, &registry).is_empty());
        assert_eq!(Report::new(&table, &registry).to_string(), "");
    }
}
