//! Integration tests for replaying action scripts from files.

use std::fs;

use rstest::rstest;
use tempfile::TempDir;

use branchtree::application::{ApplicationError, Editor, Script};
use branchtree::domain::{BranchId, NodeId};
use branchtree::util::testing;

fn load(content: &str) -> Script {
    testing::init_test_setup();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.txt");
    fs::write(&path, content).unwrap();
    Script::load(&path).expect("script loads")
}

#[test]
fn given_script_file_when_run_then_editor_reflects_every_step() {
    let script = load(
        "# side branch with one extension\n\
         select 2\n\
         create-sub-branch\n\
         click 60 0\n\
         expand\n",
    );
    let mut editor = Editor::default();

    let report = script.run(&mut editor).expect("script runs");

    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped, 0);
    assert!(editor.store().branch_by_id(BranchId(2)).is_some());
    assert_eq!(
        editor.selected(),
        editor.store().node_by_id(NodeId(5)),
        "expand selects the new head"
    );
    assert_eq!(
        editor.log().last(),
        Some("RELAYOUT: Reorganizing entire graph.")
    );
}

#[rstest]
#[case("deselect\nexpand\n")]
#[case("select 2\nexpand\n")]
#[case("select 3\ndelete-node\n")]
#[case("click 500 500\nfold\n")]
fn given_inapplicable_operation_when_run_then_counted_as_skipped(#[case] content: &str) {
    let script = load(content);
    let mut editor = Editor::default();

    let report = script.run(&mut editor).expect("script runs");

    assert_eq!(report.applied, 0);
    assert_eq!(report.skipped, 1);
    assert_eq!(editor.store().node_count(), 3);
}

#[test]
fn given_hidden_node_selected_when_run_then_selection_cleared_and_step_skipped() {
    let script = load(
        "select 2\n\
         create-sub-branch\n\
         select 4\n\
         expand\n\
         select 2\n\
         fold\n\
         select 5\n\
         expand\n",
    );
    let mut editor = Editor::default();

    let report = script.run(&mut editor).expect("script runs");

    assert_eq!(report.applied, 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(editor.selected(), None);
    assert_eq!(editor.store().node_count(), 5);
}

#[test]
fn given_reset_in_script_when_run_then_graph_starts_over() {
    let script = load("select 3\nexpand\nreset\nselect 3\nexpand\n");
    let mut editor = Editor::default();

    script.run(&mut editor).expect("script runs");

    assert_eq!(editor.store().node_count(), 4);
    assert!(editor.store().node_by_id(NodeId(5)).is_none());
}

#[test]
fn given_missing_script_when_loading_then_operation_failed() {
    let dir = TempDir::new().unwrap();

    let err = Script::load(&dir.path().join("nope.txt")).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}
