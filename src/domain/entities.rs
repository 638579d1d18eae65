//! Domain entities: nodes, branches and the keys that link them

use std::fmt;

use generational_arena::Index;

/// Colours handed out round-robin to new branches.
pub const BRANCH_COLORS: [&str; 6] = [
    "#f59e0b", "#10b981", "#3b82f6", "#ec4899", "#8b5cf6", "#ef4444",
];

/// Human-facing node number, assigned monotonically from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Human-facing branch number, assigned monotonically from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BranchId(pub u64);

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena handle of a node.
///
/// Generational: a key to a removed node never resolves again, even if the
/// slot is reused. This is what makes `Branch::parent` a weak reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(pub(crate) Index);

/// Arena handle of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchKey(pub(crate) Index);

/// A point in layout space. `y` grows downwards, so heads have the smallest `y`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A single point on a branch.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    /// Owning branch
    pub branch: BranchKey,
    pub is_head: bool,
    pub is_hidden: bool,
}

impl Node {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// An ordered run of nodes, optionally springing from a node of another branch.
#[derive(Debug, Clone)]
pub struct Branch {
    pub id: BranchId,
    /// Sorted by descending `y`: index 0 is the bottom (root-most) node, the
    /// last entry is the topmost.
    pub nodes: Vec<NodeKey>,
    pub color: &'static str,
    /// Node this branch springs from, `None` only for the main branch
    pub parent: Option<NodeKey>,
    pub is_hidden: bool,
}

impl Branch {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn first(&self) -> Option<NodeKey> {
        self.nodes.first().copied()
    }

    pub fn last(&self) -> Option<NodeKey> {
        self.nodes.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_two_points_when_measuring_then_returns_euclidean_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn given_ids_when_displayed_then_prefixed_with_hash() {
        assert_eq!(NodeId(3).to_string(), "#3");
        assert_eq!(BranchId(12).to_string(), "#12");
    }
}
