//! Domain layer: graph entities, store, closure and layout
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod closure;
pub mod entities;
pub mod error;
pub mod layout;
pub mod store;

pub use closure::{descendant_branches, descendant_branches_of_all};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use layout::{plan_layout, relayout, validate_spacing, LayoutPlan, Placement, Shift};
pub use store::GraphStore;
