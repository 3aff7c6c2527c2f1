//! Number theory utilities: trial-division primality and factor pairs.

/// A nontrivial factorization `a * b = n` with `2 <= a <= b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactorPair(pub u64, pub u64);

impl FactorPair {
    pub fn product(&self) -> u64 {
        self.0 * self.1
    }
}

impl std::fmt::Display for FactorPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} × {}", self.0, self.1)
    }
}

impl From<(u64, u64)> for FactorPair {
    fn from((a, b): (u64, u64)) -> Self {
        Self(a, b)
    }
}

/// Iterates `i` in `[2, floor(sqrt(n))]` without floating point.
fn trial_divisors(n: u64) -> impl Iterator<Item = u64> {
    (2u64..).take_while(move |&i| i.checked_mul(i).is_some_and(|sq| sq <= n))
}

/// True iff `n > 1` and no `i` in `[2, floor(sqrt(n))]` divides `n`.
///
/// Total over all inputs: `0` and `1` are not prime.
pub fn is_prime(n: u64) -> bool {
    n > 1 && trial_divisors(n).all(|i| n % i != 0)
}

/// All factor pairs of `n` in increasing order of the smaller factor.
///
/// Empty for primes and for `n <= 1`; callers classify before calling.
pub fn factor_pairs(n: u64) -> Vec<FactorPair> {
    if n <= 1 {
        return Vec::new();
    }
    trial_divisors(n)
        .filter(|&a| n % a == 0)
        .map(|a| FactorPair(a, n / a))
        .collect()
}
