//! StratoSDK layout benchmark
//!
//! Re-exports the benchmark harness and the native layout engine it
//! measures. The `strato-layout-bench` binary is the usual entry point.

pub use strato_bench;
pub use strato_layout;

/// Re-export commonly used types
pub mod prelude {
    pub use strato_bench::prelude::*;
}

/// Package version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
