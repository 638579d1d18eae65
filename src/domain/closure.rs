//! Descendant-branch closure over the branch → parent-node relation

use std::collections::HashSet;

use tracing::instrument;

use crate::domain::{BranchKey, GraphStore, NodeKey};

/// Every branch transitively rooted under `start`.
///
/// Seeds the set with the branches springing directly from `start`, then
/// sweeps the store adding any branch whose parent node lives on a branch
/// already in the set, until a sweep adds nothing.
#[instrument(level = "trace", skip(store))]
pub fn descendant_branches(store: &GraphStore, start: NodeKey) -> HashSet<BranchKey> {
    let mut found: HashSet<BranchKey> = store.child_branches(start).into_iter().collect();
    if found.is_empty() {
        return found;
    }

    loop {
        let additions: Vec<BranchKey> = store
            .branches()
            .filter(|(key, _)| !found.contains(key))
            .filter(|(_, branch)| {
                branch
                    .parent
                    .and_then(|p| store.node(p))
                    .is_some_and(|p| found.contains(&p.branch))
            })
            .map(|(key, _)| key)
            .collect();
        if additions.is_empty() {
            return found;
        }
        found.extend(additions);
    }
}

/// Union of the closures of every node in `starts`.
pub fn descendant_branches_of_all<I>(store: &GraphStore, starts: I) -> HashSet<BranchKey>
where
    I: IntoIterator<Item = NodeKey>,
{
    starts
        .into_iter()
        .flat_map(|node| descendant_branches(store, node))
        .collect()
}
