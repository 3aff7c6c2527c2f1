//! Automatic factor pair selection.

use serde::{Deserialize, Serialize};

use crate::domain::FactorPair;

/// How to pick a pair when nobody clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Split off the smallest factor first: `(2, n/2)`
    #[default]
    Smallest,
    /// Split as close to the square root as possible
    Balanced,
}

impl Strategy {
    /// Picks from pairs ordered by increasing smaller factor.
    pub fn select(&self, pairs: &[FactorPair]) -> Option<FactorPair> {
        match self {
            Strategy::Smallest => pairs.first().copied(),
            Strategy::Balanced => pairs.last().copied(),
        }
    }
}
