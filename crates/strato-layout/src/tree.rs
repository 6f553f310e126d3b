//! Arena-backed layout tree
//!
//! # Thread Safety
//!
//! NOT thread-safe. A tree is owned and mutated by one caller at a time.

use crate::error::{LayoutError, LayoutResult};
use crate::layout::{
    calculate_flex, Constraints, Direction, EdgeInsets, FlexItem, FlexProps, Layout, Size,
    TextDirection,
};
use glam::Vec2;
use slotmap::{new_key_type, Key, KeyData, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Key of a node inside a [`LayoutTree`].
    pub struct NodeKey;
}

impl NodeKey {
    /// Stable integer form of the key, for handing across API boundaries
    pub fn to_bits(self) -> u64 {
        self.data().as_ffi()
    }

    /// Rebuild a key from [`NodeKey::to_bits`]. Arbitrary bits are safe; they
    /// simply fail to resolve to a live node.
    pub fn from_bits(bits: u64) -> Self {
        KeyData::from_ffi(bits).into()
    }
}

/// Style of a single node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeStyle {
    /// Main axis used to lay out the children of this node.
    pub direction: Direction,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub flex: FlexProps,
    pub margin: EdgeInsets,
    pub padding: EdgeInsets,
}

impl NodeStyle {
    /// Explicit size along the given axis, if any
    pub fn explicit(&self, axis: Direction) -> Option<f32> {
        match axis {
            Direction::Horizontal => self.width,
            Direction::Vertical => self.height,
        }
    }

    fn validate(&self) -> LayoutResult<()> {
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(LayoutError::InvalidValue { field, value: v });
                }
            }
        }
        if !self.flex.grow.is_finite() || self.flex.grow < 0.0 {
            return Err(LayoutError::InvalidValue {
                field: "flex_grow",
                value: self.flex.grow,
            });
        }
        if !self.margin.is_valid() {
            return Err(LayoutError::InvalidValue {
                field: "margin",
                value: self.margin.top.min(self.margin.left),
            });
        }
        if !self.padding.is_valid() {
            return Err(LayoutError::InvalidValue {
                field: "padding",
                value: self.padding.top.min(self.padding.left),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    style: NodeStyle,
    parent: Option<NodeKey>,
    children: SmallVec<[NodeKey; 4]>,
    layout: Layout,
}

/// Tree of styled nodes with flex layout computation.
#[derive(Debug, Default)]
pub struct LayoutTree {
    nodes: SlotMap<NodeKey, NodeData>,
}

impl LayoutTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Number of live nodes across all roots
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the tree holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check whether a key refers to a live node
    pub fn contains(&self, node: NodeKey) -> bool {
        self.nodes.contains_key(node)
    }

    /// Create a detached node with the given style
    pub fn new_node(&mut self, style: NodeStyle) -> LayoutResult<NodeKey> {
        style.validate()?;
        Ok(self.nodes.insert(NodeData {
            style,
            parent: None,
            children: SmallVec::new(),
            layout: Layout::default(),
        }))
    }

    /// Get the style of a node
    pub fn style(&self, node: NodeKey) -> LayoutResult<&NodeStyle> {
        self.data(node).map(|data| &data.style)
    }

    /// Replace the style of a node
    pub fn set_style(&mut self, node: NodeKey, style: NodeStyle) -> LayoutResult<()> {
        style.validate()?;
        self.data_mut(node)?.style = style;
        Ok(())
    }

    /// Update the style of a node in place
    pub fn update_style<F>(&mut self, node: NodeKey, updater: F) -> LayoutResult<()>
    where
        F: FnOnce(&mut NodeStyle),
    {
        let mut style = *self.style(node)?;
        updater(&mut style);
        self.set_style(node, style)
    }

    /// Children of a node in order
    pub fn children(&self, node: NodeKey) -> LayoutResult<&[NodeKey]> {
        self.data(node).map(|data| data.children.as_slice())
    }

    /// Parent of a node, if attached
    pub fn parent(&self, node: NodeKey) -> LayoutResult<Option<NodeKey>> {
        self.data(node).map(|data| data.parent)
    }

    /// Last computed layout of a node
    pub fn layout(&self, node: NodeKey) -> LayoutResult<Layout> {
        self.data(node).map(|data| data.layout)
    }

    /// Insert `child` into `parent` at `index`
    pub fn insert_child(
        &mut self,
        parent: NodeKey,
        index: usize,
        child: NodeKey,
    ) -> LayoutResult<()> {
        if self.data(child)?.parent.is_some() {
            return Err(LayoutError::AlreadyAttached);
        }

        // Walk up from the parent; reaching the child means a cycle.
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(LayoutError::Cycle);
            }
            cursor = self.data(node)?.parent;
        }

        let len = self.data(parent)?.children.len();
        if index > len {
            return Err(LayoutError::ChildIndexOutOfBounds { index, len });
        }

        self.data_mut(parent)?.children.insert(index, child);
        self.data_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Number of nodes in the subtree rooted at `node` (including it)
    pub fn subtree_len(&self, node: NodeKey) -> LayoutResult<usize> {
        let mut count = 0;
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            count += 1;
            stack.extend(self.data(current)?.children.iter().copied());
        }
        Ok(count)
    }

    /// Remove `node` and all of its descendants, returning how many were removed
    pub fn remove_subtree(&mut self, node: NodeKey) -> LayoutResult<usize> {
        let parent = self.data(node)?.parent;
        if let Some(parent) = parent {
            if let Some(data) = self.nodes.get_mut(parent) {
                data.children.retain(|c| *c != node);
            }
        }

        let mut removed = 0;
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(data) = self.nodes.remove(current) {
                stack.extend(data.children);
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Compute layout for the subtree rooted at `root`.
    ///
    /// The root takes its explicit size, falling back to the available space.
    pub fn compute_layout(
        &mut self,
        root: NodeKey,
        available: Size,
        text_direction: TextDirection,
    ) -> LayoutResult<()> {
        if !available.width.is_finite()
            || !available.height.is_finite()
            || available.width < 0.0
            || available.height < 0.0
        {
            return Err(LayoutError::InvalidAvailableSpace {
                width: available.width,
                height: available.height,
            });
        }

        let style = *self.style(root)?;
        let size = Size::new(
            style.width.unwrap_or(available.width),
            style.height.unwrap_or(available.height),
        );
        self.data_mut(root)?.layout = Layout::new(Vec2::ZERO, size);

        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            self.layout_children(node, text_direction)?;
            pending.extend(self.data(node)?.children.iter().copied());
        }

        tracing::trace!(target: "LAYOUT", nodes = self.nodes.len(), "native layout computed");
        Ok(())
    }

    /// Position the direct children of `node` inside its content box.
    fn layout_children(&mut self, node: NodeKey, text_direction: TextDirection) -> LayoutResult<()> {
        let data = self.data(node)?;
        if data.children.is_empty() {
            return Ok(());
        }

        let style = data.style;
        let size = data.layout.size;
        let children = data.children.clone();

        let direction = style.direction;
        let cross_axis = direction.cross();
        let content = Size::new(
            (size.width - style.padding.horizontal()).max(0.0),
            (size.height - style.padding.vertical()).max(0.0),
        );
        let bounds = Constraints::loose(content.width, content.height);

        let mut items = Vec::with_capacity(children.len());
        for &child in &children {
            let child_style = self.data(child)?.style;
            let basis = self.intrinsic_size(child, direction)?;
            let cross = match child_style.explicit(cross_axis) {
                Some(explicit) => explicit,
                None => (content.along(cross_axis) - child_style.margin.along(cross_axis)).max(0.0),
            };
            items.push(FlexItem {
                props: child_style.flex,
                basis,
                cross,
                margin: child_style.margin,
            });
        }

        let layouts = calculate_flex(direction, &items, content);
        let origin = Vec2::new(style.padding.left, style.padding.top);
        let mirror = text_direction == TextDirection::Rtl && direction == Direction::Horizontal;

        for (child, mut layout) in children.into_iter().zip(layouts) {
            // Cross sizes may overflow the content box; main sizes already fit it.
            let clamped = bounds.constrain(layout.size);
            layout.size = Size::from_axes(
                direction,
                layout.size.along(direction),
                clamped.along(cross_axis),
            );
            if mirror {
                layout.position.x = content.width - layout.position.x - layout.size.width;
            }
            layout.position += origin;
            self.data_mut(child)?.layout = layout;
        }

        Ok(())
    }

    /// Content-driven size along `axis`: explicit size, or padding plus the
    /// children's extents (summed on the node's main axis, max on its cross axis).
    fn intrinsic_size(&self, node: NodeKey, axis: Direction) -> LayoutResult<f32> {
        let data = self.data(node)?;
        if let Some(explicit) = data.style.explicit(axis) {
            return Ok(explicit);
        }

        let mut extent: f32 = 0.0;
        for &child in &data.children {
            let child_extent =
                self.intrinsic_size(child, axis)? + self.data(child)?.style.margin.along(axis);
            if data.style.direction == axis {
                extent += child_extent;
            } else {
                extent = extent.max(child_extent);
            }
        }

        Ok(data.style.padding.along(axis) + extent)
    }

    fn data(&self, node: NodeKey) -> LayoutResult<&NodeData> {
        self.nodes.get(node).ok_or(LayoutError::UnknownNode)
    }

    fn data_mut(&mut self, node: NodeKey) -> LayoutResult<&mut NodeData> {
        self.nodes.get_mut(node).ok_or(LayoutError::UnknownNode)
    }
}
