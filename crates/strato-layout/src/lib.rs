//! Native flexbox layout engine for StratoSDK
//!
//! A small arena-backed flex solver: nodes carry a style (direction, explicit
//! size, grow/shrink, margin, padding), children are laid out on a single line
//! along the parent's main axis, and every computed box is relative to its
//! parent.

pub mod error;
pub mod layout;
pub mod tree;

pub use error::{LayoutError, LayoutResult};
pub use layout::{
    calculate_flex, Constraints, Direction, EdgeInsets, FlexItem, FlexProps, Layout, Size,
    TextDirection,
};
pub use tree::{LayoutTree, NodeKey, NodeStyle};

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
