//! Adapter over the in-house flex solver (`strato-layout`)

use crate::adapter::{
    AdapterId, Edge, FlexDirection, LayoutAdapter, LayoutDirection, NodeHandle, Side,
};
use crate::error::{AdapterError, AdapterResult};
use strato_layout::{Direction, EdgeInsets, LayoutTree, NodeKey, NodeStyle, Size, TextDirection};

/// [`LayoutAdapter`] backed by [`LayoutTree`].
#[derive(Debug)]
pub struct NativeAdapter {
    id: AdapterId,
    tree: LayoutTree,
}

impl NativeAdapter {
    pub fn new() -> Self {
        Self {
            id: AdapterId::new(super::NATIVE),
            tree: LayoutTree::new(),
        }
    }

    /// Read-only access to the underlying tree, for inspecting computed boxes
    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    /// Resolve a handle to a live tree key
    pub fn key(&self, handle: NodeHandle) -> AdapterResult<NodeKey> {
        let key = NodeKey::from_bits(handle.0);
        if self.tree.contains(key) {
            Ok(key)
        } else {
            Err(AdapterError::UnknownNode(handle))
        }
    }

    fn update<F>(&mut self, handle: NodeHandle, updater: F) -> AdapterResult<()>
    where
        F: FnOnce(&mut NodeStyle),
    {
        let key = self.key(handle)?;
        self.tree.update_style(key, updater)?;
        Ok(())
    }
}

impl Default for NativeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_edge(insets: &mut EdgeInsets, edge: Edge, value: f32) {
    for side in edge.sides() {
        match side {
            Side::Top => insets.top = value,
            Side::Right => insets.right = value,
            Side::Bottom => insets.bottom = value,
            Side::Left => insets.left = value,
        }
    }
}

impl LayoutAdapter for NativeAdapter {
    fn id(&self) -> &AdapterId {
        &self.id
    }

    fn create_node(&mut self) -> AdapterResult<NodeHandle> {
        let key = self.tree.new_node(NodeStyle::default())?;
        Ok(NodeHandle(key.to_bits()))
    }

    fn set_flex_direction(
        &mut self,
        node: NodeHandle,
        direction: FlexDirection,
    ) -> AdapterResult<()> {
        self.update(node, |style| {
            style.direction = match direction {
                FlexDirection::Row => Direction::Horizontal,
                FlexDirection::Column => Direction::Vertical,
            }
        })
    }

    fn set_width(&mut self, node: NodeHandle, width: f32) -> AdapterResult<()> {
        self.update(node, |style| style.width = Some(width))
    }

    fn set_height(&mut self, node: NodeHandle, height: f32) -> AdapterResult<()> {
        self.update(node, |style| style.height = Some(height))
    }

    fn set_flex_grow(&mut self, node: NodeHandle, grow: f32) -> AdapterResult<()> {
        self.update(node, |style| style.flex.grow = grow)
    }

    fn set_margin(&mut self, node: NodeHandle, edge: Edge, value: f32) -> AdapterResult<()> {
        self.update(node, |style| apply_edge(&mut style.margin, edge, value))
    }

    fn set_padding(&mut self, node: NodeHandle, edge: Edge, value: f32) -> AdapterResult<()> {
        self.update(node, |style| apply_edge(&mut style.padding, edge, value))
    }

    fn insert_child(
        &mut self,
        parent: NodeHandle,
        child: NodeHandle,
        index: usize,
    ) -> AdapterResult<()> {
        let parent = self.key(parent)?;
        let child = self.key(child)?;
        self.tree.insert_child(parent, index, child)?;
        Ok(())
    }

    fn compute_layout(
        &mut self,
        root: NodeHandle,
        width: f32,
        height: f32,
        direction: LayoutDirection,
    ) -> AdapterResult<()> {
        let root = self.key(root)?;
        let text_direction = match direction {
            LayoutDirection::Ltr => TextDirection::Ltr,
            LayoutDirection::Rtl => TextDirection::Rtl,
        };
        self.tree
            .compute_layout(root, Size::new(width, height), text_direction)?;
        Ok(())
    }

    fn subtree_size(&self, root: NodeHandle) -> AdapterResult<usize> {
        let root = self.key(root)?;
        Ok(self.tree.subtree_len(root)?)
    }

    fn release(&mut self, root: NodeHandle) -> AdapterResult<()> {
        let root = self.key(root)?;
        self.tree.remove_subtree(root)?;
        Ok(())
    }
}
