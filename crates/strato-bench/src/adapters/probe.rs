//! Recording adapter that builds plain trees without solving layout.
//!
//! Useful for verifying scenario structure, and for driving the runner with
//! scripted layout behavior through a layout hook.

use crate::adapter::{
    AdapterId, Edge, FlexDirection, LayoutAdapter, LayoutDirection, NodeHandle, Side,
};
use crate::error::{AdapterError, AdapterResult};
use std::collections::HashMap;

/// Every property a scenario can set on a node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProbeStyle {
    pub flex_direction: FlexDirection,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub flex_grow: f32,
    /// Top, right, bottom, left
    pub margin: [f32; 4],
    /// Top, right, bottom, left
    pub padding: [f32; 4],
}

/// One node of a pre-order tree walk
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeEntry {
    pub depth: usize,
    pub style: ProbeStyle,
    pub child_count: usize,
}

#[derive(Debug, Clone, Default)]
struct ProbeNode {
    style: ProbeStyle,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

/// Called on every `compute_layout` with the zero-based call index.
pub type LayoutHook = Box<dyn FnMut(u64) -> AdapterResult<()>>;

/// In-memory [`LayoutAdapter`] that records the trees built against it.
pub struct ProbeAdapter {
    id: AdapterId,
    nodes: HashMap<u64, ProbeNode>,
    next_id: u64,
    layout_calls: u64,
    releases: usize,
    on_layout: Option<LayoutHook>,
}

impl ProbeAdapter {
    pub fn new(id: impl Into<AdapterId>) -> Self {
        Self {
            id: id.into(),
            nodes: HashMap::new(),
            next_id: 1,
            layout_calls: 0,
            releases: 0,
            on_layout: None,
        }
    }

    /// Run `hook` inside every layout computation
    pub fn with_layout_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(u64) -> AdapterResult<()> + 'static,
    {
        self.on_layout = Some(Box::new(hook));
        self
    }

    /// Number of `compute_layout` calls so far
    pub fn layout_calls(&self) -> u64 {
        self.layout_calls
    }

    /// Number of `release` calls so far
    pub fn releases(&self) -> usize {
        self.releases
    }

    /// Nodes created and not yet released
    pub fn live_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Pre-order walk of the tree rooted at `root`
    pub fn snapshot(&self, root: NodeHandle) -> AdapterResult<Vec<ProbeEntry>> {
        let mut entries = Vec::new();
        let mut stack = vec![(root, 0)];
        while let Some((handle, depth)) = stack.pop() {
            let node = self.node(handle)?;
            entries.push(ProbeEntry {
                depth,
                style: node.style.clone(),
                child_count: node.children.len(),
            });
            stack.extend(node.children.iter().rev().map(|c| (*c, depth + 1)));
        }
        Ok(entries)
    }

    fn node(&self, handle: NodeHandle) -> AdapterResult<&ProbeNode> {
        self.nodes
            .get(&handle.0)
            .ok_or(AdapterError::UnknownNode(handle))
    }

    fn style_mut(&mut self, handle: NodeHandle) -> AdapterResult<&mut ProbeStyle> {
        self.nodes
            .get_mut(&handle.0)
            .map(|node| &mut node.style)
            .ok_or(AdapterError::UnknownNode(handle))
    }
}

impl std::fmt::Debug for ProbeAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeAdapter")
            .field("id", &self.id)
            .field("live_nodes", &self.nodes.len())
            .field("layout_calls", &self.layout_calls)
            .field("has_layout_hook", &self.on_layout.is_some())
            .finish()
    }
}

fn apply_edge(sides: &mut [f32; 4], edge: Edge, value: f32) {
    for side in edge.sides() {
        let index = match side {
            Side::Top => 0,
            Side::Right => 1,
            Side::Bottom => 2,
            Side::Left => 3,
        };
        sides[index] = value;
    }
}

impl LayoutAdapter for ProbeAdapter {
    fn id(&self) -> &AdapterId {
        &self.id
    }

    fn create_node(&mut self) -> AdapterResult<NodeHandle> {
        let handle = NodeHandle(self.next_id);
        self.next_id += 1;
        self.nodes.insert(handle.0, ProbeNode::default());
        Ok(handle)
    }

    fn set_flex_direction(
        &mut self,
        node: NodeHandle,
        direction: FlexDirection,
    ) -> AdapterResult<()> {
        self.style_mut(node)?.flex_direction = direction;
        Ok(())
    }

    fn set_width(&mut self, node: NodeHandle, width: f32) -> AdapterResult<()> {
        self.style_mut(node)?.width = Some(width);
        Ok(())
    }

    fn set_height(&mut self, node: NodeHandle, height: f32) -> AdapterResult<()> {
        self.style_mut(node)?.height = Some(height);
        Ok(())
    }

    fn set_flex_grow(&mut self, node: NodeHandle, grow: f32) -> AdapterResult<()> {
        self.style_mut(node)?.flex_grow = grow;
        Ok(())
    }

    fn set_margin(&mut self, node: NodeHandle, edge: Edge, value: f32) -> AdapterResult<()> {
        apply_edge(&mut self.style_mut(node)?.margin, edge, value);
        Ok(())
    }

    fn set_padding(&mut self, node: NodeHandle, edge: Edge, value: f32) -> AdapterResult<()> {
        apply_edge(&mut self.style_mut(node)?.padding, edge, value);
        Ok(())
    }

    fn insert_child(
        &mut self,
        parent: NodeHandle,
        child: NodeHandle,
        index: usize,
    ) -> AdapterResult<()> {
        if self.node(child)?.parent.is_some() {
            return Err(AdapterError::Engine(format!("{:?} already has a parent", child)));
        }

        // Walk up from the parent; reaching the child means a cycle.
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(AdapterError::Engine(format!(
                    "inserting {:?} under {:?} would create a cycle",
                    child, parent
                )));
            }
            cursor = self.node(node)?.parent;
        }

        let len = self.node(parent)?.children.len();
        if index > len {
            return Err(AdapterError::Engine(format!(
                "child index {} out of bounds for {} children",
                index, len
            )));
        }

        if let Some(node) = self.nodes.get_mut(&parent.0) {
            node.children.insert(index, child);
        }
        if let Some(node) = self.nodes.get_mut(&child.0) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    fn compute_layout(
        &mut self,
        root: NodeHandle,
        _width: f32,
        _height: f32,
        _direction: LayoutDirection,
    ) -> AdapterResult<()> {
        self.node(root)?;
        let call = self.layout_calls;
        self.layout_calls += 1;
        match self.on_layout.as_mut() {
            Some(hook) => hook(call),
            None => Ok(()),
        }
    }

    fn subtree_size(&self, root: NodeHandle) -> AdapterResult<usize> {
        Ok(self.snapshot(root)?.len())
    }

    fn release(&mut self, root: NodeHandle) -> AdapterResult<()> {
        self.node(root)?;
        self.releases += 1;
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            if let Some(node) = self.nodes.remove(&handle.0) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }
}
