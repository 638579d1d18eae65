//! Whole-graph horizontal layout
//!
//! Branches form a tree (child branch → branch of its parent node). Starting
//! at the main branch, the children of every branch are packed left to right,
//! depth first, one grid unit to the right of everything already placed. The
//! main branch itself never moves. Vertical positions are left alone.
//!
//! Planning is a pure read of the store; applying a plan shifts every node of
//! a placed branch by the same delta, hidden nodes included.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::{instrument, trace};

use crate::domain::{BranchId, BranchKey, DomainError, DomainResult, GraphStore};

/// Target left edge for one branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub branch: BranchKey,
    pub start_x: f64,
}

/// A branch that actually moved while applying a plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shift {
    pub branch: BranchId,
    /// New x of the branch
    pub x: f64,
    pub delta: f64,
}

/// Placements for every visible non-main branch, in visiting order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPlan {
    placements: Vec<Placement>,
}

impl LayoutPlan {
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn start_of(&self, branch: BranchKey) -> Option<f64> {
        self.placements
            .iter()
            .find(|p| p.branch == branch)
            .map(|p| p.start_x)
    }

    /// Moves each placed branch so its bottom node sits at the planned x.
    #[instrument(level = "debug", skip_all)]
    pub fn apply(&self, store: &mut GraphStore) -> Vec<Shift> {
        let mut shifts = Vec::new();
        for placement in &self.placements {
            let Some(branch) = store.branch(placement.branch) else {
                continue;
            };
            let id = branch.id;
            let keys = branch.nodes.clone();
            let Some(current) = branch.first().and_then(|k| store.node(k)).map(|n| n.x) else {
                continue;
            };

            let delta = placement.start_x - current;
            if delta == 0.0 {
                continue;
            }
            for key in keys {
                if let Some(node) = store.node_mut(key) {
                    node.x += delta;
                }
            }
            trace!("shift: branch {} by {} to x={}", id, delta, placement.start_x);
            shifts.push(Shift {
                branch: id,
                x: placement.start_x,
                delta,
            });
        }
        shifts
    }
}

/// Checks that `spacing` can drive a layout.
pub fn validate_spacing(spacing: f64) -> DomainResult<f64> {
    if spacing.is_finite() && spacing > 0.0 {
        Ok(spacing)
    } else {
        Err(DomainError::InvalidLayout {
            name: "grid_spacing",
            value: spacing,
        })
    }
}

/// Computes where every visible branch should start.
#[instrument(level = "debug", skip(store))]
pub fn plan_layout(store: &GraphStore, spacing: f64) -> LayoutPlan {
    let Some(root) = store.root() else {
        return LayoutPlan::default();
    };
    let Some(origin_x) = store
        .branch(root)
        .and_then(|b| b.first())
        .and_then(|k| store.node(k))
        .map(|n| n.x)
    else {
        return LayoutPlan::default();
    };

    let mut planner = Planner {
        store,
        spacing,
        children: children_by_parent(store),
        placements: Vec::new(),
    };
    planner.place_children(root, origin_x);
    LayoutPlan {
        placements: planner.placements,
    }
}

/// Plans and applies a fresh layout, returning the branches that moved.
pub fn relayout(store: &mut GraphStore, spacing: f64) -> Vec<Shift> {
    plan_layout(store, spacing).apply(store)
}

/// Child branches keyed by the branch owning their parent node.
///
/// Siblings are ordered by ascending parent-node `y`, ties broken by
/// ascending branch id.
fn children_by_parent(store: &GraphStore) -> HashMap<BranchKey, Vec<BranchKey>> {
    store
        .branches()
        .filter_map(|(key, branch)| {
            let parent = store.node(branch.parent?)?;
            Some((parent.branch, (parent.y, branch.id, key)))
        })
        .into_group_map()
        .into_iter()
        .map(|(owner, siblings)| {
            let ordered = siblings
                .into_iter()
                .sorted_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
                .map(|(_, _, key)| key)
                .collect();
            (owner, ordered)
        })
        .collect()
}

struct Planner<'a> {
    store: &'a GraphStore,
    spacing: f64,
    children: HashMap<BranchKey, Vec<BranchKey>>,
    placements: Vec<Placement>,
}

impl Planner<'_> {
    /// Lays out the children of `parent` right of `rightmost`; returns the new
    /// rightmost extent.
    fn place_children(&mut self, parent: BranchKey, mut rightmost: f64) -> f64 {
        let siblings = self.children.get(&parent).cloned().unwrap_or_default();
        for child in siblings {
            let hidden = self.store.branch(child).map_or(true, |b| b.is_hidden);
            if hidden {
                continue;
            }
            rightmost = self.place_subtree(child, rightmost + self.spacing);
        }
        rightmost
    }

    fn place_subtree(&mut self, branch: BranchKey, start_x: f64) -> f64 {
        let any_visible = self
            .store
            .nodes_of(branch)
            .any(|(_, node)| !node.is_hidden);
        if !any_visible {
            return start_x;
        }
        self.placements.push(Placement { branch, start_x });
        self.place_children(branch, start_x)
    }
}
