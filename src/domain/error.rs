//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::NodeId;

/// Domain errors represent lookups or parameters the graph cannot satisfy.
///
/// Mutation operations never produce these: an operation whose precondition
/// does not hold is a silent no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    UnknownNode(NodeId),

    #[error("invalid layout parameter {name}: {value}")]
    InvalidLayout { name: &'static str, value: f64 },
}

/// Result type for domain lookups.
pub type DomainResult<T> = Result<T, DomainError>;
