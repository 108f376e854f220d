//! Selection strategies.
//!
//! The same [`Selection`] enum drives both parent selection (pick one
//! member, with replacement) and survivor selection (keep `k` distinct
//! members, discard the rest).
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::Individual;
use rand::Rng;

/// Selection strategy.
///
/// All strategies assume **minimization** (lower cost = better).
///
/// # Examples
///
/// ```
/// use u_srflp::ga::Selection;
///
/// // Tournament with size 3 (moderate selection pressure)
/// let sel = Selection::Tournament(3);
///
/// // Roulette wheel (fitness-proportionate)
/// let sel = Selection::Roulette;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Uniform random choice, ignoring cost.
    Random,

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Since we minimize, weights use the inverse transformation
    /// `max_cost - cost + ε`.
    ///
    /// # Complexity
    /// O(n) per selection
    Roulette,

    /// Tournament selection: pick `k` members at random, select the best.
    ///
    /// Higher `k` = stronger selection pressure.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Linear rank selection: weight `n - rank`, best rank first.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    ///
    /// # Complexity
    /// O(n log n) per selection
    Rank,

    /// Deterministic: the cheapest member first.
    ///
    /// As a survivor operator this keeps the `k` best in a single ranking
    /// pass. As a parent operator it always returns the best member.
    Truncation,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Selects one index from `pool`.
    ///
    /// # Panics
    /// Panics if `pool` is empty.
    pub fn select<I: Individual, R: Rng>(&self, pool: &[I], rng: &mut R) -> usize {
        assert!(!pool.is_empty(), "cannot select from empty population");
        self.pick(pool.len(), |i| pool[i].cost(), rng)
    }

    /// Chooses `count` distinct indices of `pool` to keep.
    ///
    /// [`Truncation`](Selection::Truncation) keeps the `count` cheapest
    /// (ties to the earlier member). Every other strategy is applied
    /// repeatedly without replacement. The returned indices are sorted
    /// ascending so callers can keep the pool's original order.
    ///
    /// # Panics
    /// Panics if `count > pool.len()`.
    pub fn survivors<I: Individual, R: Rng>(
        &self,
        pool: &[I],
        count: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        assert!(
            count <= pool.len(),
            "cannot keep {count} of {} members",
            pool.len()
        );

        let mut chosen = match self {
            Selection::Truncation => {
                let mut order = rank_order(pool);
                order.truncate(count);
                order
            }
            _ => {
                let mut remaining: Vec<usize> = (0..pool.len()).collect();
                let mut chosen = Vec::with_capacity(count);
                while chosen.len() < count {
                    let k = self.pick(remaining.len(), |i| pool[remaining[i]].cost(), rng);
                    chosen.push(remaining.swap_remove(k));
                }
                chosen
            }
        };
        chosen.sort_unstable();
        chosen
    }

    /// Picks a position in `0..len` given a cost lookup.
    fn pick<R: Rng>(&self, len: usize, cost_of: impl Fn(usize) -> f64, rng: &mut R) -> usize {
        if len == 1 {
            return 0;
        }
        match self {
            Selection::Random => rng.random_range(0..len),
            Selection::Roulette => roulette(len, cost_of, rng),
            Selection::Tournament(k) => tournament(len, *k, cost_of, rng),
            Selection::Rank => rank(len, cost_of, rng),
            Selection::Truncation => best_of(len, cost_of),
        }
    }
}

/// Indices of `pool` sorted by cost, cheapest first; stable on ties.
pub(crate) fn rank_order<I: Individual>(pool: &[I]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..pool.len()).collect();
    order.sort_by(|&a, &b| pool[a].cost().total_cmp(&pool[b].cost()));
    order
}

/// Tournament selection: pick k random members, return best.
fn tournament<R: Rng>(len: usize, k: usize, cost_of: impl Fn(usize) -> f64, rng: &mut R) -> usize {
    let k = k.max(1);

    let mut best_idx = rng.random_range(0..len);
    for _ in 1..k {
        let idx = rng.random_range(0..len);
        if cost_of(idx) < cost_of(best_idx) {
            best_idx = idx;
        }
    }
    best_idx
}

/// Roulette wheel selection using inverse cost transformation.
///
/// For minimization: weight_i = max_cost - cost_i + epsilon
/// This ensures the cheapest member gets the highest weight.
fn roulette<R: Rng>(len: usize, cost_of: impl Fn(usize) -> f64, rng: &mut R) -> usize {
    let costs: Vec<f64> = (0..len).map(&cost_of).collect();
    let max_cost = costs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let epsilon = 1e-10;
    let weights: Vec<f64> = costs
        .iter()
        .map(|&c| {
            let w = max_cost - c + epsilon;
            if w > 0.0 {
                w
            } else {
                epsilon
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return rng.random_range(0..len);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    len - 1 // floating-point fallback
}

/// Rank-based selection using linear ranking.
fn rank<R: Rng>(len: usize, cost_of: impl Fn(usize) -> f64, rng: &mut R) -> usize {
    let mut indexed: Vec<(usize, f64)> = (0..len).map(|i| (i, cost_of(i))).collect();
    indexed.sort_by(|a, b| a.1.total_cmp(&b.1));

    // rank 0 (best) gets weight n
    let total = (len * (len + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for (rank, &(original_idx, _)) in indexed.iter().enumerate() {
        cumulative += (len - rank) as f64;
        if cumulative > threshold {
            return original_idx;
        }
    }

    indexed[len - 1].0 // fallback
}

/// First index with the lowest cost.
fn best_of(len: usize, cost_of: impl Fn(usize) -> f64) -> usize {
    let mut best = 0;
    for i in 1..len {
        if cost_of(i) < cost_of(best) {
            best = i;
        }
    }
    best
}
