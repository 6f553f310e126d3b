//! Error types for the layout benchmark harness

use crate::adapter::NodeHandle;
use crate::runner::ResultsTable;
use std::collections::BTreeMap;
use thiserror::Error;

/// Context information for errors to aid in debugging
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    /// Operation that was being performed when the error occurred
    pub operation: String,
    /// Component or module where the error occurred
    pub component: String,
    /// Additional contextual data
    pub metadata: BTreeMap<String, String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            component: component.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Add metadata to the context
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }

    /// Format context for logging
    pub fn format_for_log(&self) -> String {
        let mut parts = vec![
            format!("operation={}", self.operation),
            format!("component={}", self.component),
        ];

        if !self.metadata.is_empty() {
            let metadata_str = self
                .metadata
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("metadata=[{}]", metadata_str));
        }

        parts.join(", ")
    }
}

/// Main error type for benchmark harness operations
#[derive(Debug, Error)]
pub enum BenchError {
    /// One adapter could not be loaded. Recovered by skipping that adapter.
    #[error("Adapter '{adapter}' unavailable: {reason}")]
    AdapterUnavailable { adapter: String, reason: String },

    /// No adapter could be loaded at all. `results` is the run's (empty) table.
    #[error("No layout adapters available (attempted: {})", .attempted.join(", "))]
    NoAdaptersAvailable {
        attempted: Vec<String>,
        results: ResultsTable,
    },

    /// Statistics requested over an unusable sample set.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        context: Option<ErrorContext>,
    },

    /// The adapter's layout call failed for one tree.
    #[error("Layout computation failed: {message}")]
    LayoutComputationFailure {
        message: String,
        context: Option<ErrorContext>,
    },

    /// A scenario could not construct its tree.
    #[error("Tree build failed: {message}")]
    TreeBuild {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Invalid scenario: {message}")]
    InvalidScenario {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BenchError {
    /// Create an adapter-unavailable error
    pub fn adapter_unavailable(adapter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AdapterUnavailable {
            adapter: adapter.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid input error from a string
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput {
            message: msg.into(),
            context: None,
        }
    }

    /// Create a layout failure error with context
    pub fn layout_with_context<S: Into<String>>(msg: S, context: ErrorContext) -> Self {
        Self::LayoutComputationFailure {
            message: msg.into(),
            context: Some(context),
        }
    }

    /// Create a tree build error with context
    pub fn tree_build_with_context<S: Into<String>>(msg: S, context: ErrorContext) -> Self {
        Self::TreeBuild {
            message: msg.into(),
            context: Some(context),
        }
    }

    /// Create an invalid scenario error from a string
    pub fn invalid_scenario<S: Into<String>>(msg: S) -> Self {
        Self::InvalidScenario {
            message: msg.into(),
            context: None,
        }
    }

    /// Create an invalid scenario error with context
    pub fn invalid_scenario_with_context<S: Into<String>>(msg: S, context: ErrorContext) -> Self {
        Self::InvalidScenario {
            message: msg.into(),
            context: Some(context),
        }
    }

    /// Create a configuration error from a string
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration {
            message: msg.into(),
            context: None,
        }
    }

    /// Get the error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::InvalidInput { context, .. }
            | Self::LayoutComputationFailure { context, .. }
            | Self::TreeBuild { context, .. }
            | Self::InvalidScenario { context, .. }
            | Self::Configuration { context, .. } => context.as_ref(),
            Self::AdapterUnavailable { .. }
            | Self::NoAdaptersAvailable { .. }
            | Self::Io(_)
            | Self::Serialization(_) => None,
        }
    }

    /// Signal that no adapter could be loaded, carrying an empty results table
    pub fn no_adapters(attempted: Vec<String>) -> Self {
        Self::NoAdaptersAvailable {
            attempted,
            results: ResultsTable::default(),
        }
    }

    /// Format error with context for logging
    pub fn format_for_log(&self) -> String {
        let base_msg = self.to_string();
        if let Some(context) = self.context() {
            format!("{} [{}]", base_msg, context.format_for_log())
        } else {
            base_msg
        }
    }
}

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors reported by a layout engine adapter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    /// The handle does not name a live node in this adapter.
    #[error("Unknown node handle {0:?}")]
    UnknownNode(NodeHandle),

    /// Error raised by the underlying engine.
    #[error("Engine error: {0}")]
    Engine(String),
}

/// Result type for adapter operations.
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

#[cfg(feature = "taffy-engine")]
impl From<taffy::TaffyError> for AdapterError {
    fn from(err: taffy::TaffyError) -> Self {
        AdapterError::Engine(format!("{:?}", err))
    }
}

#[cfg(feature = "native-engine")]
impl From<strato_layout::LayoutError> for AdapterError {
    fn from(err: strato_layout::LayoutError) -> Self {
        AdapterError::Engine(err.to_string())
    }
}
