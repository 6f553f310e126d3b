//! Layout engine benchmark harness for StratoSDK
//!
//! Builds a fixed set of scenario trees through a common adapter interface,
//! times only the layout computation, and compares the native flex solver
//! against Taffy.

pub mod adapter;
pub mod adapters;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod stats;

pub use adapter::{
    detect_adapters, AdapterId, AdapterLoader, Edge, FlexDirection, LayoutAdapter,
    LayoutDirection, NodeHandle,
};
pub use adapters::{builtin_loaders, select_loaders, ProbeAdapter};
pub use config::{BenchConfig, HarnessConfig, LoggingConfig, ReportConfig};
pub use error::{AdapterError, AdapterResult, BenchError, ErrorContext, Result};
pub use executor::{Clock, IterationBatch, ManualClock, MonotonicClock, TimedExecutor};
pub use logging::LogCategory;
pub use report::{compare, geometric_mean_speedup, ComparisonRow, JsonReport, Report};
pub use runner::{AdapterResults, BenchmarkRunner, ResultsTable, ScenarioResult};
pub use scenario::{Scenario, ScenarioRegistry};
pub use stats::{summarize, StatSummary};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        adapter::{Edge, FlexDirection, LayoutAdapter, NodeHandle},
        config::{BenchConfig, HarnessConfig},
        error::{AdapterResult, BenchError, Result},
        report::{compare, Report},
        runner::{BenchmarkRunner, ResultsTable},
        scenario::{Scenario, ScenarioRegistry},
        stats::{summarize, StatSummary},
    };
}

/// Harness version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging from the given configuration
pub fn init(config: &HarnessConfig) {
    if logging::init(&config.logging) {
        bench_debug!(LogCategory::Core, "strato-bench v{} initialized", VERSION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
