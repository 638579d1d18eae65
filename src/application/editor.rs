//! Graph editor: mutation operations, selection and read-only queries
//!
//! Every operation takes the node it acts on (normally the current selection)
//! and checks its preconditions first. When they do not hold the operation is
//! a silent no-op: nothing changes, nothing is logged, `false` is returned.
//! Otherwise the store is mutated, a full relayout runs and `true` is returned.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::application::{Action, ActionLog, ApplicationResult};
use crate::config::LayoutSettings;
use crate::domain::{
    descendant_branches, descendant_branches_of_all, relayout, BranchKey, GraphStore, Node,
    NodeKey, Point,
};

/// One editing session over one graph.
#[derive(Debug)]
pub struct Editor {
    store: GraphStore,
    selected: Option<NodeKey>,
    log: ActionLog,
    layout: LayoutSettings,
}

impl Default for Editor {
    fn default() -> Self {
        let mut editor = Self {
            store: GraphStore::new(),
            selected: None,
            log: ActionLog::new(),
            layout: LayoutSettings::default(),
        };
        editor.reset();
        editor
    }
}

impl Editor {
    /// Editor seeded with a fresh main branch.
    pub fn new(layout: LayoutSettings) -> ApplicationResult<Self> {
        layout.validate()?;
        let mut editor = Self {
            store: GraphStore::new(),
            selected: None,
            log: ActionLog::new(),
            layout,
        };
        editor.reset();
        Ok(editor)
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn layout(&self) -> &LayoutSettings {
        &self.layout
    }

    pub fn selected(&self) -> Option<NodeKey> {
        self.selected
    }

    fn spacing(&self) -> f64 {
        self.layout.grid_spacing
    }

    /// Discards the graph and the log and seeds a new main branch.
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) {
        self.log.clear();
        self.selected = None;
        let main = self.store.reset(self.layout.origin(), self.layout.grid_spacing);
        if let Some(branch) = self.store.branch(main) {
            self.log.push(format!("INIT: Created Main Branch {}", branch.id));
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Selects `node` if it exists and is visible.
    pub fn select(&mut self, node: NodeKey) -> bool {
        if self.is_visible(node) {
            self.selected = Some(node);
            true
        } else {
            false
        }
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Selects whatever sits under `point`, clearing the selection on a miss.
    pub fn select_at(&mut self, point: Point) -> Option<NodeKey> {
        self.selected = self.node_at(point);
        self.selected
    }

    /// First visible node within the hit radius of `point`, searching branches
    /// in creation order and each branch bottom-up.
    pub fn node_at(&self, point: Point) -> Option<NodeKey> {
        self.store
            .branches()
            .filter(|(_, branch)| !branch.is_hidden)
            .flat_map(|(key, _)| self.store.nodes_of(key))
            .find(|(_, node)| {
                !node.is_hidden && node.position().distance(point) < self.layout.hit_radius
            })
            .map(|(key, _)| key)
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Runs `action` on the current selection.
    pub fn apply(&mut self, action: Action) -> bool {
        let target = self.selected;
        match action {
            Action::CreateSubBranch => self.create_sub_branch(target),
            Action::Expand => self.expand_branch(target),
            Action::DeleteChildren => self.delete_children(target),
            Action::DeleteExtension => self.delete_extension(target),
            Action::DeleteNode => self.delete_node(target),
            Action::Fold => self.fold(target),
            Action::Unfold => self.unfold(target),
            Action::Collapse => self.collapse(target),
        }
    }

    /// Hidden targets count as missing.
    fn resolve(&self, target: Option<NodeKey>) -> Option<(NodeKey, Node)> {
        let key = target.filter(|k| self.is_visible(*k))?;
        self.store.node(key).map(|node| (key, node.clone()))
    }

    /// Starts a new branch one grid unit right of `target`, unless `target`
    /// already has one.
    #[instrument(level = "debug", skip(self))]
    pub fn create_sub_branch(&mut self, target: Option<NodeKey>) -> bool {
        let Some((parent, node)) = self.resolve(target) else {
            return false;
        };
        if self.has_child_branches(parent) {
            return false;
        }

        let branch = self.store.create_branch(parent);
        let Some(head) = self.store.create_node(node.x + self.spacing(), node.y, branch) else {
            return false;
        };
        self.set_head(head, true);
        if let Some(created) = self.store.branch(branch) {
            self.log.push(format!(
                "CREATE: Branch {} from Parent Node {}.",
                created.id, node.id
            ));
        }
        debug!("create_sub_branch: parent={}", node.id);
        self.relayout();
        self.deselect();
        true
    }

    /// Grows the branch of head node `target` by one node and selects it.
    ///
    /// No-op while the branch has a folded-away extension above the head.
    #[instrument(level = "debug", skip(self))]
    pub fn expand_branch(&mut self, target: Option<NodeKey>) -> bool {
        let Some((key, head)) = self.resolve(target) else {
            return false;
        };
        if !head.is_head || self.has_hidden_extension(key) {
            return false;
        }

        self.set_head(key, false);
        let Some(new_head) =
            self.store
                .create_node(head.x, head.y - self.spacing(), head.branch)
        else {
            return false;
        };
        self.set_head(new_head, true);
        if let (Some(branch), Some(node)) =
            (self.store.branch(head.branch), self.store.node(new_head))
        {
            self.log.push(format!(
                "EXPAND: Branch {} with new Head Node {}.",
                branch.id, node.id
            ));
        }
        self.relayout();
        self.selected = Some(new_head);
        true
    }

    /// Removes every branch descending from `target`.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_children(&mut self, target: Option<NodeKey>) -> bool {
        let Some((key, node)) = self.resolve(target) else {
            return false;
        };
        self.log.push(format!(
            "DELETE CHILDREN: Deleting all descendants of Node {}.",
            node.id
        ));

        let doomed = descendant_branches(&self.store, key);
        let removed = self.store.remove_branches(&doomed);
        debug!("delete_children: removed {} branches", removed);
        self.deselect();
        self.relayout();
        true
    }

    /// Cuts the branch back to `target`, which becomes its head.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_extension(&mut self, target: Option<NodeKey>) -> bool {
        let Some((key, node)) = self.resolve(target) else {
            return false;
        };
        if node.is_head || self.is_root_branch_node(key) {
            return false;
        }
        self.log.push(format!(
            "DELETE EXTENSION: Deleting extension above Node {}.",
            node.id
        ));

        let above: HashSet<NodeKey> = self.store.nodes_above(key).into_iter().collect();
        let doomed = descendant_branches_of_all(&self.store, above.iter().copied());
        self.store.remove_branches(&doomed);
        self.store.remove_nodes(node.branch, &above);
        self.set_head(key, true);

        self.deselect();
        self.relayout();
        true
    }

    /// Removes `target`, everything above it on its branch and every branch
    /// hanging off those nodes. A branch left without nodes is removed too.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_node(&mut self, target: Option<NodeKey>) -> bool {
        let Some((key, node)) = self.resolve(target) else {
            return false;
        };
        if self.is_root_branch_node(key) {
            return false;
        }
        self.log.push(format!(
            "DELETE NODE: Deleting Node {} and its entire sub-tree.",
            node.id
        ));

        let cut: HashSet<NodeKey> = self
            .store
            .nodes_of(node.branch)
            .filter(|(_, n)| n.y <= node.y)
            .map(|(k, _)| k)
            .collect();
        let doomed = descendant_branches_of_all(&self.store, cut.iter().copied());
        self.store.remove_branches(&doomed);
        self.store.remove_nodes(node.branch, &cut);

        let remaining: Vec<NodeKey> = self
            .store
            .branch(node.branch)
            .map(|b| b.nodes.clone())
            .unwrap_or_default();
        match remaining.last() {
            Some(&top) => {
                for k in &remaining {
                    self.set_head(*k, false);
                }
                self.set_head(top, true);
            }
            None => {
                let empty: HashSet<BranchKey> = [node.branch].into_iter().collect();
                self.store.remove_branches(&empty);
                debug!("delete_node: branch emptied and removed");
            }
        }

        self.deselect();
        self.relayout();
        true
    }

    /// Hides every branch descending from `target`.
    #[instrument(level = "debug", skip(self))]
    pub fn fold(&mut self, target: Option<NodeKey>) -> bool {
        let Some((key, node)) = self.resolve(target) else {
            return false;
        };
        self.log.push(format!(
            "FOLD: Hiding all descendants of Node {}.",
            node.id
        ));

        for branch in descendant_branches(&self.store, key) {
            if let Some(b) = self.store.branch_mut(branch) {
                b.is_hidden = true;
            }
        }
        self.relayout();
        true
    }

    /// Hides the nodes above `target` and every branch hanging off them;
    /// `target` becomes the visible head.
    #[instrument(level = "debug", skip(self))]
    pub fn collapse(&mut self, target: Option<NodeKey>) -> bool {
        let Some((key, node)) = self.resolve(target) else {
            return false;
        };
        if node.is_head {
            return false;
        }
        self.log.push(format!(
            "COLLAPSE: Hiding extension above Node {}.",
            node.id
        ));

        let above = self.store.nodes_above(key);
        for branch in descendant_branches_of_all(&self.store, above.iter().copied()) {
            if let Some(b) = self.store.branch_mut(branch) {
                b.is_hidden = true;
            }
        }
        for k in above {
            if let Some(n) = self.store.node_mut(k) {
                n.is_hidden = true;
                n.is_head = false;
            }
        }
        self.set_head(key, true);
        self.relayout();
        true
    }

    /// Reveals every branch descending from `target` and every hidden node of
    /// its own branch. Each revealed branch ends up with its topmost node as head.
    #[instrument(level = "debug", skip(self))]
    pub fn unfold(&mut self, target: Option<NodeKey>) -> bool {
        let Some((key, node)) = self.resolve(target) else {
            return false;
        };
        self.log.push(format!(
            "UNFOLD: Unfolding all content at Node {}.",
            node.id
        ));

        for branch in descendant_branches(&self.store, key) {
            if let Some(b) = self.store.branch_mut(branch) {
                b.is_hidden = false;
            }
            self.reveal_branch(branch);
        }
        self.reveal_branch(node.branch);
        self.relayout();
        true
    }

    /// Unhides every node of `branch` and moves the head flag to its top.
    fn reveal_branch(&mut self, branch: BranchKey) {
        let nodes: Vec<NodeKey> = self
            .store
            .branch(branch)
            .map(|b| b.nodes.clone())
            .unwrap_or_default();
        for k in &nodes {
            if let Some(n) = self.store.node_mut(*k) {
                n.is_hidden = false;
                n.is_head = false;
            }
        }
        if let Some(top) = nodes.last() {
            self.set_head(*top, true);
        }
    }

    fn set_head(&mut self, node: NodeKey, is_head: bool) {
        if let Some(n) = self.store.node_mut(node) {
            n.is_head = is_head;
        }
    }

    fn relayout(&mut self) {
        self.log.push("RELAYOUT: Reorganizing entire graph.");
        for shift in relayout(&mut self.store, self.layout.grid_spacing) {
            self.log.push(format!(
                "  -> SHIFT: Branch {} moved to X={}.",
                shift.branch, shift.x
            ));
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Any branch springs from `node`, hidden or not.
    pub fn has_child_branches(&self, node: NodeKey) -> bool {
        self.store.branches().any(|(_, b)| b.parent == Some(node))
    }

    pub fn has_visible_child_branches(&self, node: NodeKey) -> bool {
        self.store
            .branches()
            .any(|(_, b)| b.parent == Some(node) && !b.is_hidden)
    }

    pub fn has_hidden_child_branches(&self, node: NodeKey) -> bool {
        self.store
            .branches()
            .any(|(_, b)| b.parent == Some(node) && b.is_hidden)
    }

    /// Some node above `node` on its own branch is hidden.
    pub fn has_hidden_extension(&self, node: NodeKey) -> bool {
        self.store
            .nodes_above(node)
            .into_iter()
            .any(|k| self.store.node(k).is_some_and(|n| n.is_hidden))
    }

    /// Something folded or collapsed away at `node` that unfold would reveal.
    pub fn has_hidden_content(&self, node: NodeKey) -> bool {
        self.has_hidden_child_branches(node) || self.has_hidden_extension(node)
    }

    /// Neither `node` nor its branch is hidden.
    pub fn is_visible(&self, node: NodeKey) -> bool {
        self.store.node(node).is_some_and(|n| {
            !n.is_hidden && self.store.branch(n.branch).is_some_and(|b| !b.is_hidden)
        })
    }

    pub fn is_root_branch_node(&self, node: NodeKey) -> bool {
        self.store.is_on_root_branch(node)
    }

    pub fn is_head(&self, node: NodeKey) -> bool {
        self.store.node(node).is_some_and(|n| n.is_head)
    }

    /// Whether the control for `action` is offered for `node`.
    pub fn is_enabled(&self, action: Action, node: Option<NodeKey>) -> bool {
        let Some(node) = node.filter(|k| self.is_visible(*k)) else {
            return false;
        };
        let on_root = self.is_root_branch_node(node);
        let is_head = self.is_head(node);
        match action {
            Action::CreateSubBranch => !self.has_child_branches(node),
            Action::Expand => is_head,
            Action::Fold => self.has_visible_child_branches(node),
            Action::Collapse | Action::DeleteExtension => !is_head && !on_root,
            Action::Unfold => self.has_hidden_content(node),
            Action::DeleteChildren => self.has_child_branches(node),
            Action::DeleteNode => !on_root,
        }
    }

    /// Actions enabled for the current selection.
    pub fn enabled_actions(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| self.is_enabled(*a, self.selected))
            .collect()
    }

    /// Status line for the current selection.
    pub fn describe_selection(&self) -> String {
        let Some((key, node)) = self.resolve(self.selected) else {
            return "Click a node to select it.".to_string();
        };
        let branch = self
            .store
            .branch(node.branch)
            .map(|b| b.id.to_string())
            .unwrap_or_default();
        let mut text = format!("Node {} on Branch {} selected.", node.id, branch);
        if node.is_head {
            text.push_str(" This is a head node.");
        }
        if self.has_child_branches(key) {
            text.push_str(" It has child branches.");
        }
        text
    }
}
