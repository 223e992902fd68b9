//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business logic violations.
///
/// Not-found and already-resolved variants are expected, routine outcomes;
/// callers decide whether they are worth reporting.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("level out of range: {level} (tree has {levels} levels)")]
    LevelOutOfRange { level: i32, levels: i32 },

    #[error("modification id must be positive")]
    NonPositiveId,

    #[error("group not found: {0}")]
    GroupNotFound(String),

    #[error("modification not found: id {0}")]
    ModificationNotFound(u64),

    #[error("group already present in tree: {0}")]
    DuplicateGroup(String),

    #[error("modification already resolved: {0}")]
    AlreadyResolved(String),

    #[error("tree is empty")]
    EmptyTree,
}

pub type DomainResult<T> = Result<T, DomainError>;
