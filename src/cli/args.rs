//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Branch-tree editor: grow, fold and prune branches with deterministic layout
#[derive(Parser, Debug)]
#[command(name = "branchtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: ./.branchtree.toml if present)
    #[arg(short, long, global = true, env = "BRANCHTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay an action script and print the resulting tree
    Run {
        /// Script file (one command per line)
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
        /// Do not print the action log
        #[arg(long)]
        no_log: bool,
    },

    /// Replay the built-in demo script
    Demo {
        /// Do not print the action log
        #[arg(long)]
        no_log: bool,
    },

    /// Print the freshly seeded tree
    Tree,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings as TOML
    Show,
    /// Show config file locations
    Path,
    /// Print a commented config template
    Template,
}
