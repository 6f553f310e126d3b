//! Error types for the native layout engine

use thiserror::Error;

/// Errors raised by [`LayoutTree`](crate::tree::LayoutTree) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// The node key is not (or no longer) part of the tree.
    #[error("Unknown layout node")]
    UnknownNode,

    /// Child index is past the end of the parent's child list.
    #[error("Child index {index} out of bounds for {len} children")]
    ChildIndexOutOfBounds { index: usize, len: usize },

    /// The child is already attached to a parent.
    #[error("Node already has a parent")]
    AlreadyAttached,

    /// Inserting the child would create a cycle.
    #[error("Inserting node would create a cycle")]
    Cycle,

    /// A style value is NaN, infinite or negative.
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f32 },

    /// Viewport size is unusable.
    #[error("Invalid available space: {width}x{height}")]
    InvalidAvailableSpace { width: f32, height: f32 },
}

/// Result type alias for layout operations
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
