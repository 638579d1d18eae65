//! branchtree: branch-tree editor core
//!
//! A main branch of stacked nodes grows side branches, which can be extended,
//! folded, collapsed and pruned. After every structural change the layout
//! engine places sibling branches so that no two subtrees overlap.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
