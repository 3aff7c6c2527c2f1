//! Final product report of a completed tree.

use std::fmt;

use itertools::Itertools;

/// Sorted prime factors of a value, rendered expanded and exponent-compacted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factorization {
    pub value: u64,
    /// Ascending, with repetition
    pub primes: Vec<u64>,
}

/// One `base^exponent` group of the compact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimePower {
    pub base: u64,
    pub exponent: usize,
}

impl fmt::Display for PrimePower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exponent == 1 {
            write!(f, "{}", self.base)
        } else {
            write!(f, "{}^{}", self.base, self.exponent)
        }
    }
}

impl Factorization {
    pub fn new(value: u64, mut primes: Vec<u64>) -> Self {
        primes.sort_unstable();
        Self { value, primes }
    }

    /// Equal primes grouped, ascending by base.
    pub fn powers(&self) -> Vec<PrimePower> {
        self.primes
            .iter()
            .dedup_with_count()
            .map(|(exponent, &base)| PrimePower { base, exponent })
            .collect()
    }

    /// `12 = 2 × 2 × 3`
    pub fn expanded(&self) -> String {
        format!("{} = {}", self.value, self.primes.iter().join(" × "))
    }

    /// `2^2 × 3`
    pub fn compact(&self) -> String {
        self.powers().iter().join(" × ")
    }
}

impl fmt::Display for Factorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.expanded(), self.compact())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve() {
        let f = Factorization::new(12, vec![2, 3, 2]);
        assert_eq!(f.expanded(), "12 = 2 × 2 × 3");
        assert_eq!(f.compact(), "2^2 × 3");
    }

    #[test]
    fn test_thirty_six() {
        let f = Factorization::new(36, vec![3, 2, 3, 2]);
        assert_eq!(f.expanded(), "36 = 2 × 2 × 3 × 3");
        assert_eq!(f.compact(), "2^2 × 3^2");
    }

    #[test]
    fn test_powers_order_by_base() {
        let f = Factorization::new(360, vec![5, 3, 2, 3, 2, 2]);
        assert_eq!(
            f.powers(),
            vec![
                PrimePower { base: 2, exponent: 3 },
                PrimePower { base: 3, exponent: 2 },
                PrimePower { base: 5, exponent: 1 },
            ]
        );
        assert_eq!(f.compact(), "2^3 × 3^2 × 5");
    }
}
