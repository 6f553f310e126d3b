//! Logging system for the layout benchmark harness
//!
//! Structured `tracing` events tagged with a category target. Output goes to
//! stderr so the report on stdout stays machine-readable.

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Categories for organizing log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    Core,
    Adapter,
    Scenario,
    Executor,
    Runner,
    Stats,
    Report,
}

impl LogCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Core => "CORE",
            LogCategory::Adapter => "ADAPTER",
            LogCategory::Scenario => "SCENARIO",
            LogCategory::Executor => "EXECUTOR",
            LogCategory::Runner => "RUNNER",
            LogCategory::Stats => "STATS",
            LogCategory::Report => "REPORT",
        }
    }
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Convenience macros for category-tagged logging
#[macro_export]
macro_rules! bench_trace {
    ($category:expr, $($arg:tt)*) => {
        tracing::trace!(target: $category.as_str(), $($arg)*)
    };
}

#[macro_export]
macro_rules! bench_debug {
    ($category:expr, $($arg:tt)*) => {
        tracing::debug!(target: $category.as_str(), $($arg)*)
    };
}

#[macro_export]
macro_rules! bench_info {
    ($category:expr, $($arg:tt)*) => {
        tracing::info!(target: $category.as_str(), $($arg)*)
    };
}

#[macro_export]
macro_rules! bench_warn {
    ($category:expr, $($arg:tt)*) => {
        tracing::warn!(target: $category.as_str(), $($arg)*)
    };
}

#[macro_export]
macro_rules! bench_error {
    ($category:expr, $($arg:tt)*) => {
        tracing::error!(target: $category.as_str(), $($arg)*)
    };
}

/// Build the filter for the given configuration. `RUST_LOG` wins when set.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directives()))
}

/// Initialize the logging system.
///
/// Returns `false` when a global subscriber was already installed (for
/// example by a test harness); that is not an error.
pub fn init(config: &LoggingConfig) -> bool {
    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.ansi)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .is_ok()
}
