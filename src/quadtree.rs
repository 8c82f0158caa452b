//! The quadtree a picture is decomposed into.

pub mod build;
pub mod codec;
pub mod paint;

use crate::picture::Pixel;

/// One of the four quadrants of a square block.
///
/// The discriminant is the index of the child covering that quadrant, so
/// building, painting and the wire format all agree on child order.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft = 0,
    TopRight = 1,
    BottomRight = 2,
    BottomLeft = 3,
}

impl Quadrant {
    /// Every quadrant, in child index order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomRight,
        Quadrant::BottomLeft,
    ];

    /// Offset of this quadrant's top-left corner from its parent's, for a
    /// parent of side `2 * half`.
    pub const fn offset(self, half: u32) -> (u32, u32) {
        match self {
            Quadrant::TopLeft => (0, 0),
            Quadrant::TopRight => (half, 0),
            Quadrant::BottomRight => (half, half),
            Quadrant::BottomLeft => (0, half),
        }
    }

    /// Pivot of this quadrant within a parent block at `pivot`.
    pub const fn pivot(self, pivot: (u32, u32), half: u32) -> (u32, u32) {
        let (dx, dy) = self.offset(half);
        (pivot.0 + dx, pivot.1 + dy)
    }
}

/// A node of the decomposition, and through its children the whole subtree.
///
/// An internal node always owns exactly four children, indexed by
/// [`Quadrant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuadTree {
    /// A block stored as one color.
    Leaf(Pixel),

    /// A block split into four equal quadrants.
    Internal(Box<[QuadTree; 4]>),
}

impl QuadTree {
    pub fn internal(children: [QuadTree; 4]) -> Self {
        QuadTree::Internal(Box::new(children))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, QuadTree::Leaf(_))
    }

    /// The stored color, for leaves.
    pub fn pixel(&self) -> Option<Pixel> {
        match self {
            QuadTree::Leaf(pixel) => Some(*pixel),
            QuadTree::Internal(_) => None,
        }
    }

    /// The four children, for internal nodes.
    pub fn children(&self) -> Option<&[QuadTree; 4]> {
        match self {
            QuadTree::Leaf(_) => None,
            QuadTree::Internal(children) => Some(children),
        }
    }

    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadTree> {
        self.children().map(|c| &c[quadrant as usize])
    }

    /// Number of levels in the tree. A lone leaf has height 1.
    pub fn height(&self) -> u32 {
        match self {
            QuadTree::Leaf(_) => 1,
            QuadTree::Internal(children) => {
                1 + children.iter().map(QuadTree::height).max().unwrap_or(0)
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            QuadTree::Leaf(_) => 1,
            QuadTree::Internal(children) => children.iter().map(QuadTree::leaf_count).sum(),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            QuadTree::Leaf(_) => 1,
            QuadTree::Internal(children) => {
                1 + children.iter().map(QuadTree::node_count).sum::<usize>()
            }
        }
    }
}

/// Height of a possibly absent node. Absent nodes have height 0.
pub fn height(node: Option<&QuadTree>) -> u32 {
    node.map_or(0, QuadTree::height)
}
