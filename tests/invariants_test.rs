//! Structural invariants checked after every step of longer editing sessions.

use std::collections::HashMap;

use rstest::rstest;

use branchtree::application::{Action, Editor};
use branchtree::domain::{descendant_branches_of_all, relayout, BranchKey, GraphStore, NodeId};
use branchtree::util::testing;

const S: f64 = 60.0;

fn visible(store: &GraphStore, key: BranchKey) -> bool {
    store.branch(key).is_some_and(|b| !b.is_hidden)
        && store.nodes_of(key).any(|(_, n)| !n.is_hidden)
}

fn branch_x(store: &GraphStore, key: BranchKey) -> f64 {
    store.nodes_of(key).next().map(|(_, n)| n.x).unwrap()
}

fn assert_invariants(editor: &Editor, step: usize) {
    let store = editor.store();

    let root = store.root().expect("root branch exists");
    assert!(store.branch(root).unwrap().parent.is_none(), "step {step}");
    assert!(visible(store, root), "step {step}: main branch visible");

    for (key, branch) in store.branches() {
        let ys: Vec<f64> = store.nodes_of(key).map(|(_, n)| n.y).collect();
        assert!(
            ys.windows(2).all(|w| w[0] > w[1]),
            "step {step}: branch {} not sorted: {:?}",
            branch.id,
            ys
        );
        if visible(store, key) {
            let heads = store.nodes_of(key).filter(|(_, n)| n.is_head).count();
            assert_eq!(heads, 1, "step {step}: branch {} heads", branch.id);
        }
    }

    // siblings of one owner branch, left to right
    let mut siblings: HashMap<BranchKey, Vec<BranchKey>> = HashMap::new();
    for (key, branch) in store.branches() {
        let Some(parent) = branch.parent.and_then(|p| store.node(p)) else {
            continue;
        };
        if visible(store, key) {
            siblings.entry(parent.branch).or_default().push(key);
        }
    }
    for (owner, mut children) in siblings {
        children.sort_by(|a, b| branch_x(store, *a).total_cmp(&branch_x(store, *b)));
        let mut rightmost = branch_x(store, owner);
        for child in children {
            assert!(
                branch_x(store, child) >= rightmost + S,
                "step {step}: overlapping siblings"
            );
            let nodes: Vec<_> = store.nodes_of(child).map(|(k, _)| k).collect();
            rightmost = descendant_branches_of_all(store, nodes)
                .into_iter()
                .filter(|b| visible(store, *b))
                .map(|b| branch_x(store, b))
                .fold(branch_x(store, child), f64::max);
        }
    }

    let mut copy = store.clone();
    assert!(relayout(&mut copy, S).is_empty(), "step {step}: layout not stable");
}

fn run(steps: &[(u64, Action)]) -> Editor {
    testing::init_test_setup();
    let mut editor = Editor::default();
    assert_invariants(&editor, 0);
    for (i, (id, action)) in steps.iter().enumerate() {
        let node = editor
            .store()
            .node_by_id(NodeId(*id))
            .unwrap_or_else(|| panic!("step {}: node #{id} missing", i + 1));
        editor.select(node);
        editor.apply(*action);
        assert_invariants(&editor, i + 1);
    }
    editor
}

#[rstest]
#[case::grow_fold_prune(
    &[
        (2, Action::CreateSubBranch),
        (4, Action::Expand),
        (1, Action::CreateSubBranch),
        (4, Action::CreateSubBranch),
        (5, Action::CreateSubBranch),
        (7, Action::Expand),
        (4, Action::Fold),
        (4, Action::Unfold),
        (4, Action::Collapse),
        (3, Action::CreateSubBranch),
        (4, Action::Unfold),
        (4, Action::DeleteExtension),
        (6, Action::DeleteNode),
        (2, Action::DeleteChildren),
    ],
    2,
    4
)]
#[case::collapse_nested_chain(
    &[
        (1, Action::CreateSubBranch),
        (4, Action::Expand),
        (5, Action::Expand),
        (5, Action::CreateSubBranch),
        (7, Action::CreateSubBranch),
        (2, Action::CreateSubBranch),
        (4, Action::Collapse),
        (4, Action::Expand),
        (4, Action::Unfold),
        (5, Action::Unfold),
        (6, Action::DeleteNode),
        (1, Action::Fold),
        (1, Action::Unfold),
    ],
    5,
    8
)]
fn given_editing_session_when_each_step_applied_then_invariants_hold(
    #[case] steps: &[(u64, Action)],
    #[case] branches: usize,
    #[case] nodes: usize,
) {
    let editor = run(steps);

    assert_eq!(editor.store().branch_count(), branches);
    assert_eq!(editor.store().node_count(), nodes);
}

#[test]
fn given_collapsed_head_when_expanding_then_refused_until_unfolded() {
    let mut editor = run(&[
        (1, Action::CreateSubBranch),
        (4, Action::Expand),
        (4, Action::Collapse),
    ]);
    let n4 = editor.store().node_by_id(NodeId(4)).unwrap();

    assert!(!editor.expand_branch(Some(n4)));
    assert!(editor.unfold(Some(n4)));
    assert!(!editor.expand_branch(Some(n4)));

    let n5 = editor.store().node_by_id(NodeId(5)).unwrap();
    assert!(editor.expand_branch(Some(n5)));
}
