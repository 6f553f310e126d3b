//! Flexbox primitives for the StratoSDK native layout engine

use glam::Vec2;

/// Size constraints for layout calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Constraints {
    /// Create loose constraints (maximum size)
    pub fn loose(width: f32, height: f32) -> Self {
        Self {
            min_width: 0.0,
            max_width: width.max(0.0),
            min_height: 0.0,
            max_height: height.max(0.0),
        }
    }

    /// Constrain a size to these constraints
    pub fn constrain(&self, size: Size) -> Size {
        Size {
            width: size.width.clamp(self.min_width, self.max_width),
            height: size.height.clamp(self.min_height, self.max_height),
        }
    }
}

/// Size of a layout element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Extent along the given axis
    pub fn along(&self, axis: Direction) -> f32 {
        match axis {
            Direction::Horizontal => self.width,
            Direction::Vertical => self.height,
        }
    }

    /// Build a size from main/cross extents for the given main axis
    pub fn from_axes(axis: Direction, main: f32, cross: f32) -> Self {
        match axis {
            Direction::Horizontal => Self::new(main, cross),
            Direction::Vertical => Self::new(cross, main),
        }
    }
}

/// Layout direction (flex main axis)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Horizontal,
    #[default]
    Vertical,
}

impl Direction {
    /// The perpendicular axis
    pub fn cross(self) -> Self {
        match self {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }
}

/// Writing direction used to place items along a horizontal main axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Flex properties for a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexProps {
    pub grow: f32,
    pub shrink: f32,
}

impl Default for FlexProps {
    fn default() -> Self {
        Self {
            grow: 0.0,
            shrink: 1.0,
        }
    }
}

/// Edge insets (padding/margin)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeInsets {
    /// Create uniform insets
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Get total horizontal insets
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Get total vertical insets
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Total insets along the given axis
    pub fn along(&self, axis: Direction) -> f32 {
        match axis {
            Direction::Horizontal => self.horizontal(),
            Direction::Vertical => self.vertical(),
        }
    }

    /// Leading inset along the given axis (left or top)
    pub fn start(&self, axis: Direction) -> f32 {
        match axis {
            Direction::Horizontal => self.left,
            Direction::Vertical => self.top,
        }
    }

    /// Trailing inset along the given axis (right or bottom)
    pub fn end(&self, axis: Direction) -> f32 {
        match axis {
            Direction::Horizontal => self.right,
            Direction::Vertical => self.bottom,
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Layout result for a node, positioned relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub position: Vec2,
    pub size: Size,
}

impl Layout {
    /// Create a new layout
    pub fn new(position: Vec2, size: Size) -> Self {
        Self { position, size }
    }
}

/// One child participating in a flex line
#[derive(Debug, Clone, Copy)]
pub struct FlexItem {
    pub props: FlexProps,
    /// Hypothetical main-axis size before growing or shrinking
    pub basis: f32,
    /// Cross-axis size (already stretched if the child had none)
    pub cross: f32,
    pub margin: EdgeInsets,
}

/// Resolve a single flex line inside `content`, returning one layout per item.
///
/// Positions are relative to the content box origin. Positive free space is
/// shared by grow factor, negative free space by `shrink * basis`.
pub fn calculate_flex(direction: Direction, items: &[FlexItem], content: Size) -> Vec<Layout> {
    let mut layouts = Vec::with_capacity(items.len());

    if items.is_empty() {
        return layouts;
    }

    let cross_axis = direction.cross();
    let mut total_grow = 0.0;
    let mut total_shrink = 0.0;
    let mut used_space = 0.0;

    for item in items {
        total_grow += item.props.grow;
        total_shrink += item.props.shrink * item.basis;
        used_space += item.basis + item.margin.along(direction);
    }

    let free_space = content.along(direction) - used_space;
    let mut position = 0.0;

    for item in items {
        let main = if free_space > 0.0 && total_grow > 0.0 {
            item.basis + free_space * (item.props.grow / total_grow)
        } else if free_space < 0.0 && total_shrink > 0.0 {
            item.basis + free_space * (item.props.shrink * item.basis / total_shrink)
        } else {
            item.basis
        }
        .max(0.0);

        position += item.margin.start(direction);
        let cross_offset = item.margin.start(cross_axis);

        let offset = match direction {
            Direction::Horizontal => Vec2::new(position, cross_offset),
            Direction::Vertical => Vec2::new(cross_offset, position),
        };
        layouts.push(Layout::new(
            offset,
            Size::from_axes(direction, main, item.cross),
        ));

        position += main + item.margin.end(direction);
    }

    layouts
}
