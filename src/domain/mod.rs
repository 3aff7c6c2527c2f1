//! Domain layer: number theory, the factorization tree and its layout
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod factorization;
pub mod layout;
pub mod number;

pub use arena::{FactorNode, FactorTree, NodeData, NodeKind};
pub use error::{DomainError, DomainResult};
pub use factorization::{Factorization, PrimePower};
pub use layout::{connector, Connector, LayoutConfig, LayoutEngine, Point};
pub use number::{factor_pairs, is_prime, FactorPair};
