//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, FactorPair};

/// Application errors wrap domain errors and add session-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("please enter an integer greater than 1 (got {raw:?})")]
    InvalidInput { raw: String },

    #[error("no number has been started yet")]
    NoActiveSession,

    #[error("tree not found: {0}")]
    TreeNotFound(usize),

    #[error("tree {tree} has no node #{ordinal}")]
    NodeNotFound { tree: usize, ordinal: usize },

    #[error("no factor choice is open on tree {0}")]
    NoOpenChoice(usize),

    #[error("choice {choice} out of range, {available} available")]
    ChoiceOutOfRange { choice: usize, available: usize },

    #[error("{pair} was not offered for this node")]
    ChoiceNotOffered { pair: FactorPair },

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
