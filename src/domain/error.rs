//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::number::FactorPair;

/// Precondition violations on the factorization tree.
///
/// The interaction controller routes user actions so that none of these
/// is reachable through its transitions; seeing one means a caller drove
/// the tree model out of sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("value must be greater than 1: {0}")]
    ValueTooSmall(u64),

    #[error("node not found in tree")]
    NodeNotFound,

    #[error("{0} is prime and cannot be decomposed")]
    NotComposite(u64),

    #[error("{0} has already been decomposed")]
    AlreadyDecomposed(u64),

    #[error("{pair} is not a factor pair of {value}")]
    InvalidFactorPair { value: u64, pair: FactorPair },

    #[error("{0} is not prime")]
    NotPrime(u64),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
