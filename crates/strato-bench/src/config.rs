//! Configuration for the layout benchmark harness

use crate::error::{BenchError, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Measured iterations per (scenario, adapter) pair when nothing is configured
pub const DEFAULT_ITERATIONS: usize = 100;
/// Discarded warmup iterations per (scenario, adapter) pair
pub const DEFAULT_WARMUP_ITERATIONS: usize = 10;

/// Global configuration for one harness invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Warmup/measurement protocol
    pub bench: BenchConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Report rendering and export
    pub report: ReportConfig,
}

/// Warmup and measurement iteration counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Measured iterations fed to the statistics aggregator (at least 1)
    pub iterations: usize,
    /// Iterations executed and discarded before measurement
    pub warmup_iterations: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Category-specific log levels (category target -> level string)
    pub category_levels: HashMap<String, String>,
    /// Emit ANSI colors
    pub ansi: bool,
}

/// Report configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Decimal places used for millisecond values
    pub precision: usize,
    /// Write a JSON report to this path when set
    pub json_output: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            warmup_iterations: DEFAULT_WARMUP_ITERATIONS,
        }
    }
}

impl BenchConfig {
    /// Create a config with explicit counts
    pub fn new(iterations: usize, warmup_iterations: usize) -> Self {
        Self {
            iterations,
            warmup_iterations,
        }
    }

    /// Check the recognized options
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(BenchError::Configuration {
                message: "iterations must be a positive integer".to_string(),
                context: Some(
                    ErrorContext::new("validate", "config")
                        .with_metadata("iterations", self.iterations),
                ),
            });
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut category_levels = HashMap::new();

        category_levels.insert("ADAPTER".to_string(), "info".to_string());
        category_levels.insert("RUNNER".to_string(), "info".to_string());
        // Per-iteration detail is noisy; keep it off unless asked for
        category_levels.insert("EXECUTOR".to_string(), "warn".to_string());
        category_levels.insert("LAYOUT".to_string(), "warn".to_string());

        Self {
            level: "info".to_string(),
            category_levels,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Build an `EnvFilter`-style directive string from the level and category levels
    pub fn directives(&self) -> String {
        let mut categories: Vec<_> = self.category_levels.iter().collect();
        categories.sort();

        let mut directives = vec![self.level.clone()];
        directives.extend(
            categories
                .into_iter()
                .map(|(category, level)| format!("{}={}", category, level)),
        );
        directives.join(",")
    }

    /// Set log level for a specific category
    pub fn set_category_level(&mut self, category: &str, level: &str) {
        self.category_levels
            .insert(category.to_string(), level.to_string());
    }

    /// Apply `level` to the default directive and to every configured category.
    ///
    /// Category directives are more specific than the default level, so
    /// raising only `level` would leave them in force.
    pub fn set_verbosity(&mut self, level: &str) {
        self.level = level.to_string();
        let categories: Vec<String> = self.category_levels.keys().cloned().collect();
        for category in categories {
            self.set_category_level(&category, level);
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: 3,
            json_output: None,
        }
    }
}

impl HarnessConfig {
    /// Load a configuration file (JSON). Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| BenchError::Configuration {
            message: format!("cannot read config file: {}", e),
            context: Some(
                ErrorContext::new("load", "config").with_metadata("path", path.display()),
            ),
        })?;
        Self::from_json(&contents)
    }

    /// Parse a configuration from JSON text
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: HarnessConfig = serde_json::from_str(contents)?;
        config.bench.validate()?;
        Ok(config)
    }
}
