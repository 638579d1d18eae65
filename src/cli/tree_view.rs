//! Render the visible graph as a terminal tree
//!
//! Branches nest under the node they spring from. Hidden branches and nodes
//! are left out; nodes hiding folded content are flagged.

use colored::Colorize;
use termtree::Tree;
use tracing::instrument;

use crate::application::Editor;
use crate::domain::{Branch, BranchKey, Node, NodeKey};

pub trait ToTermTree {
    fn to_term_tree(&self) -> Tree<String>;
}

impl ToTermTree for Editor {
    #[instrument(level = "debug", skip_all)]
    fn to_term_tree(&self) -> Tree<String> {
        match self.store().root() {
            Some(root) => branch_tree(self, root),
            None => Tree::new("Empty graph".to_string()),
        }
    }
}

fn branch_tree(editor: &Editor, key: BranchKey) -> Tree<String> {
    let store = editor.store();
    let Some(branch) = store.branch(key) else {
        return Tree::new(String::new());
    };
    let mut tree = Tree::new(branch_label(branch));

    for (node_key, node) in store.nodes_of(key).filter(|(_, n)| !n.is_hidden) {
        let mut leaf = Tree::new(node_label(editor, node_key, node));
        for child in store.child_branches(node_key) {
            if store.branch(child).is_some_and(|c| !c.is_hidden) {
                leaf.push(branch_tree(editor, child));
            }
        }
        tree.push(leaf);
    }
    tree
}

fn branch_label(branch: &Branch) -> String {
    let marker = match hex_rgb(branch.color) {
        Some((r, g, b)) => "●".truecolor(r, g, b).to_string(),
        None => "●".to_string(),
    };
    format!("{} Branch {}", marker, branch.id)
}

fn node_label(editor: &Editor, key: NodeKey, node: &Node) -> String {
    let mut label = format!("Node {} ({}, {})", node.id, node.x, node.y);
    if node.is_head {
        label.push_str(&format!(" {}", "HEAD".green().bold()));
    }
    if editor.has_hidden_content(key) {
        label.push_str(&format!(" {}", "[+hidden]".cyan()));
    }
    if editor.selected() == Some(key) {
        label.push_str(&format!(" {}", "<selected>".white().bold()));
    }
    label
}

/// `#rrggbb` → components.
fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
