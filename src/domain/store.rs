//! Arena-backed graph store

use std::collections::HashSet;

use generational_arena::Arena;
use tracing::{debug, instrument};

use crate::domain::{
    Branch, BranchId, BranchKey, DomainError, DomainResult, Node, NodeId, NodeKey, Point,
    BRANCH_COLORS,
};

/// Arena-backed store for every branch and node of one graph.
///
/// Ids, colours and the branch iteration order are owned here, so several
/// independent graphs can live side by side. Iteration over branches follows
/// creation order regardless of arena slot reuse.
#[derive(Debug, Clone)]
pub struct GraphStore {
    nodes: Arena<Node>,
    branches: Arena<Branch>,
    /// Branch creation order, used for every iteration
    order: Vec<BranchKey>,
    /// The single parentless branch, None before the first reset
    root: Option<BranchKey>,
    next_node_id: u64,
    next_branch_id: u64,
    next_color: usize,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    /// Empty store without a root branch. Call [`GraphStore::reset`] to seed it.
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            branches: Arena::new(),
            order: Vec::new(),
            root: None,
            next_node_id: 1,
            next_branch_id: 1,
            next_color: 0,
        }
    }

    /// Clears everything and seeds the main branch with root, middle and head
    /// nodes stacked one `spacing` apart around `origin`.
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self, origin: Point, spacing: f64) -> BranchKey {
        self.nodes.clear();
        self.branches.clear();
        self.order.clear();
        self.next_node_id = 1;
        self.next_branch_id = 1;
        self.next_color = 0;

        let main = self.insert_branch(None);
        self.root = Some(main);
        let _root = self.create_node(origin.x, origin.y + spacing, main);
        let _middle = self.create_node(origin.x, origin.y, main);
        if let Some(head) = self.create_node(origin.x, origin.y - spacing, main) {
            if let Some(node) = self.nodes.get_mut(head.0) {
                node.is_head = true;
            }
        }
        debug!("reset: seeded main branch with {} nodes", self.nodes.len());
        main
    }

    /// New empty branch springing from `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn create_branch(&mut self, parent: NodeKey) -> BranchKey {
        self.insert_branch(Some(parent))
    }

    fn insert_branch(&mut self, parent: Option<NodeKey>) -> BranchKey {
        let branch = Branch {
            id: BranchId(self.next_branch_id),
            nodes: Vec::new(),
            color: self.take_color(),
            parent,
            is_hidden: false,
        };
        self.next_branch_id += 1;
        let key = BranchKey(self.branches.insert(branch));
        self.order.push(key);
        key
    }

    fn take_color(&mut self) -> &'static str {
        let color = BRANCH_COLORS[self.next_color];
        self.next_color = (self.next_color + 1) % BRANCH_COLORS.len();
        color
    }

    /// New node at `(x, y)` on `branch`, flags cleared.
    ///
    /// The branch's node list is re-sorted by descending `y`. Returns `None`
    /// when the branch does not exist.
    #[instrument(level = "trace", skip(self))]
    pub fn create_node(&mut self, x: f64, y: f64, branch: BranchKey) -> Option<NodeKey> {
        if !self.branches.contains(branch.0) {
            return None;
        }
        let node = Node {
            id: NodeId(self.next_node_id),
            x,
            y,
            branch,
            is_head: false,
            is_hidden: false,
        };
        self.next_node_id += 1;
        let key = NodeKey(self.nodes.insert(node));

        let nodes = &self.nodes;
        let owner = self.branches.get_mut(branch.0)?;
        owner.nodes.push(key);
        owner
            .nodes
            .sort_by(|a, b| y_of(nodes, *b).total_cmp(&y_of(nodes, *a)));
        Some(key)
    }

    /// Removes every branch in `doomed`, together with its nodes.
    ///
    /// The main branch is never removed. Returns the number of branches removed.
    #[instrument(level = "debug", skip(self, doomed))]
    pub fn remove_branches(&mut self, doomed: &HashSet<BranchKey>) -> usize {
        let root = self.root;
        self.remove_branches_where(|key, _| doomed.contains(&key) && Some(key) != root)
    }

    /// Removes every branch matching `predicate`, together with its nodes.
    pub fn remove_branches_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(BranchKey, &Branch) -> bool,
    {
        let root = self.root;
        let doomed: Vec<BranchKey> = self
            .branches()
            .filter(|(key, branch)| Some(*key) != root && predicate(*key, branch))
            .map(|(key, _)| key)
            .collect();

        for key in &doomed {
            if let Some(branch) = self.branches.remove(key.0) {
                for node in branch.nodes {
                    self.nodes.remove(node.0);
                }
                debug!("removed branch {}", branch.id);
            }
        }
        self.order.retain(|key| !doomed.contains(key));
        doomed.len()
    }

    /// Drops `doomed` nodes from `branch` and frees them.
    #[instrument(level = "trace", skip(self, doomed))]
    pub fn remove_nodes(&mut self, branch: BranchKey, doomed: &HashSet<NodeKey>) -> usize {
        let Some(owner) = self.branches.get_mut(branch.0) else {
            return 0;
        };
        let before = owner.nodes.len();
        owner.nodes.retain(|key| !doomed.contains(key));
        let removed = before - owner.nodes.len();
        for key in doomed {
            if self.nodes.get(key.0).is_some_and(|n| n.branch == branch) {
                self.nodes.remove(key.0);
            }
        }
        removed
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key.0)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key.0)
    }

    pub fn branch(&self, key: BranchKey) -> Option<&Branch> {
        self.branches.get(key.0)
    }

    pub fn branch_mut(&mut self, key: BranchKey) -> Option<&mut Branch> {
        self.branches.get_mut(key.0)
    }

    pub fn root(&self) -> Option<BranchKey> {
        self.root
    }

    /// Branches in creation order.
    pub fn branches(&self) -> impl Iterator<Item = (BranchKey, &Branch)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.branches.get(key.0).map(|b| (*key, b)))
    }

    /// Nodes of `branch`, bottom first.
    pub fn nodes_of(&self, branch: BranchKey) -> impl Iterator<Item = (NodeKey, &Node)> + '_ {
        self.branches
            .get(branch.0)
            .into_iter()
            .flat_map(|b| b.nodes.iter())
            .filter_map(|key| self.nodes.get(key.0).map(|n| (*key, n)))
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|(_, node)| node.id == id)
            .map(|(idx, _)| NodeKey(idx))
    }

    pub fn branch_by_id(&self, id: BranchId) -> Option<BranchKey> {
        self.branches()
            .find(|(_, branch)| branch.id == id)
            .map(|(key, _)| key)
    }

    /// Like [`GraphStore::node_by_id`], as an error for callers that must have it.
    pub fn resolve_node(&self, id: NodeId) -> DomainResult<NodeKey> {
        self.node_by_id(id).ok_or(DomainError::UnknownNode(id))
    }

    /// Branches springing directly from `node`, in creation order.
    pub fn child_branches(&self, node: NodeKey) -> Vec<BranchKey> {
        self.branches()
            .filter(|(_, branch)| branch.parent == Some(node))
            .map(|(key, _)| key)
            .collect()
    }

    /// Nodes on the same branch strictly above `node` (smaller `y`).
    pub fn nodes_above(&self, node: NodeKey) -> Vec<NodeKey> {
        let Some(pivot) = self.node(node) else {
            return Vec::new();
        };
        self.nodes_of(pivot.branch)
            .filter(|(_, n)| n.y < pivot.y)
            .map(|(key, _)| key)
            .collect()
    }

    /// True when `node` sits on the main branch.
    pub fn is_on_root_branch(&self, node: NodeKey) -> bool {
        self.node(node)
            .and_then(|n| self.branch(n.branch))
            .is_some_and(Branch::is_root)
    }
}

fn y_of(nodes: &Arena<Node>, key: NodeKey) -> f64 {
    nodes.get(key.0).map_or(f64::NEG_INFINITY, |n| n.y)
}
