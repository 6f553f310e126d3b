//! Layout engine capability interface
//!
//! The harness only talks to engines through [`LayoutAdapter`]. Which engines
//! exist is decided once, at startup, by [`detect_adapters`]; nothing past that
//! boundary branches on the concrete engine.
//!
//! # Architecture
//!
//! ```text
//! AdapterLoader (native, taffy, ...)
//!       ↓
//! detect_adapters()  -- AdapterUnavailable is logged and skipped
//!       ↓
//! Vec<Box<dyn LayoutAdapter>>
//!       ↓
//! BenchmarkRunner::run_all()
//! ```

use crate::error::{AdapterResult, BenchError, Result};
use crate::logging::LogCategory;
use crate::{bench_info, bench_warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a node owned by an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeHandle(pub u64);

/// Identifier of a concrete adapter, used as the results table key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdapterId(String);

impl AdapterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AdapterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Main axis of a container node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlexDirection {
    Row,
    #[default]
    Column,
}

/// Writing direction passed to the layout computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

/// A single physical side of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Edge selector for margin/padding setters: one edge, one axis pair, or all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
    /// Left and right
    Horizontal,
    /// Top and bottom
    Vertical,
    All,
}

impl Edge {
    /// Physical sides covered by this selector
    pub fn sides(self) -> &'static [Side] {
        match self {
            Edge::Top => &[Side::Top],
            Edge::Right => &[Side::Right],
            Edge::Bottom => &[Side::Bottom],
            Edge::Left => &[Side::Left],
            Edge::Horizontal => &[Side::Left, Side::Right],
            Edge::Vertical => &[Side::Top, Side::Bottom],
            Edge::All => &[Side::Top, Side::Right, Side::Bottom, Side::Left],
        }
    }
}

/// Minimal tree API the harness needs from a layout engine.
///
/// Adapters must tolerate many independent trees being built and released
/// over their lifetime. Unknown handles are reported as errors, never panics.
pub trait LayoutAdapter {
    /// Stable identifier of this adapter
    fn id(&self) -> &AdapterId;

    /// Create a detached node with default style
    fn create_node(&mut self) -> AdapterResult<NodeHandle>;

    fn set_flex_direction(&mut self, node: NodeHandle, direction: FlexDirection)
        -> AdapterResult<()>;

    fn set_width(&mut self, node: NodeHandle, width: f32) -> AdapterResult<()>;

    fn set_height(&mut self, node: NodeHandle, height: f32) -> AdapterResult<()>;

    fn set_flex_grow(&mut self, node: NodeHandle, grow: f32) -> AdapterResult<()>;

    fn set_margin(&mut self, node: NodeHandle, edge: Edge, value: f32) -> AdapterResult<()>;

    fn set_padding(&mut self, node: NodeHandle, edge: Edge, value: f32) -> AdapterResult<()>;

    /// Insert `child` under `parent` at `index`
    fn insert_child(
        &mut self,
        parent: NodeHandle,
        child: NodeHandle,
        index: usize,
    ) -> AdapterResult<()>;

    /// Compute layout for the tree rooted at `root`
    fn compute_layout(
        &mut self,
        root: NodeHandle,
        width: f32,
        height: f32,
        direction: LayoutDirection,
    ) -> AdapterResult<()>;

    /// Number of nodes in the tree rooted at `root`
    fn subtree_size(&self, root: NodeHandle) -> AdapterResult<usize>;

    /// Free the tree rooted at `root`. Engines without explicit cleanup keep
    /// the default no-op.
    fn release(&mut self, _root: NodeHandle) -> AdapterResult<()> {
        Ok(())
    }
}

type LoadFn = Box<dyn Fn() -> Result<Box<dyn LayoutAdapter>>>;

/// Named constructor for one adapter, tried once at startup.
pub struct AdapterLoader {
    id: AdapterId,
    load: LoadFn,
}

impl AdapterLoader {
    pub fn new<F>(id: impl Into<AdapterId>, load: F) -> Self
    where
        F: Fn() -> Result<Box<dyn LayoutAdapter>> + 'static,
    {
        Self {
            id: id.into(),
            load: Box::new(load),
        }
    }

    pub fn id(&self) -> &AdapterId {
        &self.id
    }

    pub fn load(&self) -> Result<Box<dyn LayoutAdapter>> {
        (self.load)()
    }
}

impl fmt::Debug for AdapterLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterLoader").field("id", &self.id).finish()
    }
}

/// Try every loader in order and keep the adapters that loaded.
///
/// Failures are logged and skipped; the returned order is the loader order,
/// which fixes adapter A/B assignment in comparisons.
pub fn detect_adapters(loaders: &[AdapterLoader]) -> Vec<Box<dyn LayoutAdapter>> {
    let mut adapters = Vec::with_capacity(loaders.len());

    for loader in loaders {
        match loader.load() {
            Ok(adapter) => {
                bench_info!(LogCategory::Adapter, adapter = %loader.id(), "adapter loaded");
                adapters.push(adapter);
            }
            Err(e) => {
                bench_warn!(
                    LogCategory::Adapter,
                    adapter = %loader.id(),
                    "skipping adapter: {}",
                    e.format_for_log()
                );
            }
        }
    }

    adapters
}

/// Reject loader lists that name the same adapter twice
pub fn ensure_unique_loaders(loaders: &[AdapterLoader]) -> Result<()> {
    for (i, loader) in loaders.iter().enumerate() {
        if loaders[..i].iter().any(|other| other.id() == loader.id()) {
            return Err(BenchError::configuration(format!(
                "adapter '{}' listed twice",
                loader.id()
            )));
        }
    }
    Ok(())
}
