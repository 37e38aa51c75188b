//! Error taxonomy.
//!
//! - [`ValidationError`]: caller input rejected before any mutation.
//! - [`WorkflowError`]: a command refused by the workflow engine.
//! - [`PersistenceError`]: the key-value collaborator failed.
//! - [`StoreError`]: what store mutations report back to callers.

use thiserror::Error;

use crate::models::{Capability, DirectiveStatus, Role};
use crate::workflow::Action;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("all fields required")]
    AllFieldsRequired,

    #[error("text must not be empty")]
    EmptyText,

    #[error("no directive ids left to assign")]
    IdsExhausted,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The action is not offered for this status and role. Callers only
    /// ever offer [`allowed_actions`](crate::workflow::allowed_actions), so
    /// reaching this is a bug in the caller, not a user mistake.
    #[error("illegal transition: {action} is not available to {role} while {status}")]
    IllegalTransition {
        action: Action,
        status: DirectiveStatus,
        role: Role,
    },

    #[error("{role} may not {capability}")]
    NotPermitted { capability: Capability, role: Role },
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    LockPoisoned,

    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("directive {0} not found")]
    NotFound(u64),

    #[error("directive id {0} appears more than once")]
    DuplicateId(u64),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}
