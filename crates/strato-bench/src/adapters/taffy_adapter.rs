//! Adapter over the Taffy layout engine

use crate::adapter::{
    AdapterId, Edge, FlexDirection, LayoutAdapter, LayoutDirection, NodeHandle, Side,
};
use crate::error::{AdapterError, AdapterResult};
use std::collections::HashSet;
use taffy::{
    AvailableSpace, Dimension, LengthPercentage, LengthPercentageAuto, NodeId, Style, TaffyTree,
};

/// [`LayoutAdapter`] backed by a [`TaffyTree`].
///
/// Taffy indexes its storage directly and panics on stale ids, so the adapter
/// tracks live node ids itself and rejects unknown handles up front.
pub struct TaffyAdapter {
    id: AdapterId,
    tree: TaffyTree<()>,
    live: HashSet<u64>,
}

impl TaffyAdapter {
    pub fn new() -> Self {
        Self {
            id: AdapterId::new(super::TAFFY),
            tree: TaffyTree::new(),
            live: HashSet::new(),
        }
    }

    /// Read-only access to the underlying Taffy tree
    pub fn tree(&self) -> &TaffyTree<()> {
        &self.tree
    }

    /// Resolve a handle to a live Taffy node
    pub fn node(&self, handle: NodeHandle) -> AdapterResult<NodeId> {
        if self.live.contains(&handle.0) {
            Ok(NodeId::from(handle.0))
        } else {
            Err(AdapterError::UnknownNode(handle))
        }
    }

    fn update<F>(&mut self, handle: NodeHandle, updater: F) -> AdapterResult<()>
    where
        F: FnOnce(&mut Style),
    {
        let node = self.node(handle)?;
        let mut style = self.tree.style(node)?.clone();
        updater(&mut style);
        self.tree.set_style(node, style)?;
        Ok(())
    }

    /// Root first, then descendants depth-first
    fn collect_subtree(&self, root: NodeId) -> AdapterResult<Vec<NodeId>> {
        let mut nodes = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            nodes.push(node);
            stack.extend(self.tree.children(node)?);
        }
        Ok(nodes)
    }
}

impl Default for TaffyAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaffyAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaffyAdapter")
            .field("id", &self.id)
            .field("live_nodes", &self.live.len())
            .finish()
    }
}

fn apply_margin(margin: &mut taffy::Rect<LengthPercentageAuto>, edge: Edge, value: f32) {
    let value = LengthPercentageAuto::Length(value);
    for side in edge.sides() {
        match side {
            Side::Top => margin.top = value,
            Side::Right => margin.right = value,
            Side::Bottom => margin.bottom = value,
            Side::Left => margin.left = value,
        }
    }
}

fn apply_padding(padding: &mut taffy::Rect<LengthPercentage>, edge: Edge, value: f32) {
    let value = LengthPercentage::Length(value);
    for side in edge.sides() {
        match side {
            Side::Top => padding.top = value,
            Side::Right => padding.right = value,
            Side::Bottom => padding.bottom = value,
            Side::Left => padding.left = value,
        }
    }
}

impl LayoutAdapter for TaffyAdapter {
    fn id(&self) -> &AdapterId {
        &self.id
    }

    fn create_node(&mut self) -> AdapterResult<NodeHandle> {
        // Column is the adapter-level default; CSS (and Taffy) default to row.
        let style = Style {
            flex_direction: taffy::FlexDirection::Column,
            ..Default::default()
        };
        let node = self.tree.new_leaf(style)?;
        let raw = u64::from(node);
        self.live.insert(raw);
        Ok(NodeHandle(raw))
    }

    fn set_flex_direction(
        &mut self,
        node: NodeHandle,
        direction: FlexDirection,
    ) -> AdapterResult<()> {
        self.update(node, |style| {
            style.flex_direction = match direction {
                FlexDirection::Row => taffy::FlexDirection::Row,
                FlexDirection::Column => taffy::FlexDirection::Column,
            }
        })
    }

    fn set_width(&mut self, node: NodeHandle, width: f32) -> AdapterResult<()> {
        self.update(node, |style| style.size.width = Dimension::Length(width))
    }

    fn set_height(&mut self, node: NodeHandle, height: f32) -> AdapterResult<()> {
        self.update(node, |style| style.size.height = Dimension::Length(height))
    }

    fn set_flex_grow(&mut self, node: NodeHandle, grow: f32) -> AdapterResult<()> {
        self.update(node, |style| style.flex_grow = grow)
    }

    fn set_margin(&mut self, node: NodeHandle, edge: Edge, value: f32) -> AdapterResult<()> {
        self.update(node, |style| apply_margin(&mut style.margin, edge, value))
    }

    fn set_padding(&mut self, node: NodeHandle, edge: Edge, value: f32) -> AdapterResult<()> {
        self.update(node, |style| apply_padding(&mut style.padding, edge, value))
    }

    fn insert_child(
        &mut self,
        parent: NodeHandle,
        child: NodeHandle,
        index: usize,
    ) -> AdapterResult<()> {
        let parent = self.node(parent)?;
        let child = self.node(child)?;
        self.tree.insert_child_at_index(parent, index, child)?;
        Ok(())
    }

    /// Taffy 0.4 has no writing-direction input; `direction` is accepted and ignored.
    fn compute_layout(
        &mut self,
        root: NodeHandle,
        width: f32,
        height: f32,
        _direction: LayoutDirection,
    ) -> AdapterResult<()> {
        let root = self.node(root)?;
        let available_space = taffy::Size {
            width: AvailableSpace::Definite(width),
            height: AvailableSpace::Definite(height),
        };
        self.tree.compute_layout(root, available_space)?;
        Ok(())
    }

    fn subtree_size(&self, root: NodeHandle) -> AdapterResult<usize> {
        let root = self.node(root)?;
        Ok(self.collect_subtree(root)?.len())
    }

    fn release(&mut self, root: NodeHandle) -> AdapterResult<()> {
        let root = self.node(root)?;
        for node in self.collect_subtree(root)? {
            self.tree.remove(node)?;
            self.live.remove(&u64::from(node));
        }
        Ok(())
    }
}
