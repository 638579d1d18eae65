//! Application layer: the editing session and its surfaces
//!
//! This layer drives the domain graph: operations with their preconditions,
//! the action log, selection, and script replay.

pub mod action;
pub mod editor;
pub mod error;
pub mod error_ext;
pub mod log;
pub mod script;

pub use action::Action;
pub use editor::Editor;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use log::{ActionLog, LogEntry};
pub use script::{Command, Script, ScriptReport, DEMO_SCRIPT};
