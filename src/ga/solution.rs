//! A candidate arrangement with an incrementally maintained cost.

use super::types::Individual;
use crate::error::Result;
use crate::problem::LayoutProblem;
use rand::Rng;

/// One arrangement of the facilities along the row, plus its cached cost.
///
/// The cost always matches [`LayoutProblem::objective`] on the current
/// arrangement. Local moves ([`swap_positions`](Self::swap_positions),
/// [`two_opt_move`](Self::two_opt_move), [`insert_move`](Self::insert_move))
/// update it through [`LayoutProblem`]'s segment cost instead of a full
/// recomputation: only pairs touching the moved segment change distance.
///
/// Moves with equal or out-of-range positions are no-ops and return `false`.
#[derive(Debug, Clone)]
pub struct Solution<'a> {
    problem: &'a LayoutProblem,
    arrangement: Vec<usize>,
    cost: f64,
}

impl<'a> Solution<'a> {
    /// Uniformly random arrangement.
    ///
    /// Each position takes a facility drawn uniformly from those not yet
    /// placed, which is then removed from the candidate list.
    pub fn random<R: Rng>(problem: &'a LayoutProblem, rng: &mut R) -> Self {
        let n = problem.facility_count();
        let mut unplaced: Vec<usize> = (0..n).collect();
        let mut arrangement = Vec::with_capacity(n);
        while !unplaced.is_empty() {
            let idx = rng.random_range(0..unplaced.len());
            arrangement.push(unplaced.remove(idx));
        }
        Self::evaluated(problem, arrangement)
    }

    /// Copies `arrangement` after checking it is a permutation of `0..n`.
    pub fn from_arrangement(problem: &'a LayoutProblem, arrangement: &[usize]) -> Result<Self> {
        problem.validate_arrangement(arrangement)?;
        Ok(Self::evaluated(problem, arrangement.to_vec()))
    }

    /// Wraps an already validated arrangement and computes its cost.
    pub(crate) fn evaluated(problem: &'a LayoutProblem, arrangement: Vec<usize>) -> Self {
        let cost = problem.objective(&arrangement);
        Self {
            problem,
            arrangement,
            cost,
        }
    }

    /// Overwrites this solution with `other`, reusing the allocation.
    pub fn copy_from(&mut self, other: &Solution<'a>) {
        self.problem = other.problem;
        self.arrangement.clone_from(&other.arrangement);
        self.cost = other.cost;
    }

    /// Cached layout cost.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Facility indices in row order.
    pub fn arrangement(&self) -> &[usize] {
        &self.arrangement
    }

    /// The problem this solution belongs to.
    pub fn problem(&self) -> &'a LayoutProblem {
        self.problem
    }

    /// Position of `facility` in the row.
    pub fn position(&self, facility: usize) -> Option<usize> {
        self.arrangement.iter().position(|&f| f == facility)
    }

    /// Facility placed at `position`.
    pub fn facility_at(&self, position: usize) -> Option<usize> {
        self.arrangement.get(position).copied()
    }

    /// Exchanges the facilities at positions `i` and `j`.
    pub fn swap_positions(&mut self, i: usize, j: usize) -> bool {
        let Some((start, end)) = self.segment(i, j) else {
            return false;
        };
        self.apply_in_segment(start, end, |row| row.swap(start, end));
        true
    }

    /// Reverses the segment between positions `i` and `j` (inclusive).
    pub fn two_opt_move(&mut self, i: usize, j: usize) -> bool {
        let Some((start, end)) = self.segment(i, j) else {
            return false;
        };
        self.apply_in_segment(start, end, |row| row[start..=end].reverse());
        true
    }

    /// Removes the facility at position `from` and reinserts it at `to`.
    pub fn insert_move(&mut self, from: usize, to: usize) -> bool {
        let Some((start, end)) = self.segment(from, to) else {
            return false;
        };
        self.apply_in_segment(start, end, |row| {
            if from < to {
                row[start..=end].rotate_left(1);
            } else {
                row[start..=end].rotate_right(1);
            }
        });
        true
    }

    /// Swaps two distinct random positions. No-op for fewer than 2 facilities.
    pub fn random_swap<R: Rng>(&mut self, rng: &mut R) -> bool {
        let n = self.arrangement.len();
        if n < 2 {
            return false;
        }
        let (i, j) = distinct_pair(n, rng);
        self.swap_positions(i, j)
    }

    /// Reverses a random segment of at least three positions, so the move
    /// always changes the arrangement. No-op for fewer than 3 facilities.
    pub fn random_two_opt<R: Rng>(&mut self, rng: &mut R) -> bool {
        let n = self.arrangement.len();
        if n < 3 {
            return false;
        }
        loop {
            let i = rng.random_range(0..n);
            let j = rng.random_range(0..n);
            if i.abs_diff(j) >= 2 {
                return self.two_opt_move(i, j);
            }
        }
    }

    /// Moves a random facility to another random position.
    /// No-op for fewer than 2 facilities.
    pub fn random_insert<R: Rng>(&mut self, rng: &mut R) -> bool {
        let n = self.arrangement.len();
        if n < 2 {
            return false;
        }
        let (from, to) = distinct_pair(n, rng);
        self.insert_move(from, to)
    }

    /// Replaces the cached cost with a full recomputation.
    ///
    /// Returns the absolute difference between the old cache and the fresh
    /// value (accumulated rounding drift).
    pub fn recompute_cost(&mut self) -> f64 {
        let fresh = self.problem.objective(&self.arrangement);
        let drift = (fresh - self.cost).abs();
        self.cost = fresh;
        drift
    }

    /// Ordered `(start, end)` for a move between two distinct in-range positions.
    fn segment(&self, i: usize, j: usize) -> Option<(usize, usize)> {
        let n = self.arrangement.len();
        if i == j || i >= n || j >= n {
            return None;
        }
        Some((i.min(j), i.max(j)))
    }

    /// Applies a rearrangement confined to `start..=end` and updates the cost
    /// from the pairs touching that segment.
    fn apply_in_segment(&mut self, start: usize, end: usize, rearrange: impl FnOnce(&mut [usize])) {
        let before = self.problem.segment_cost(&self.arrangement, start, end);
        rearrange(&mut self.arrangement);
        let after = self.problem.segment_cost(&self.arrangement, start, end);
        self.cost += after - before;
    }
}

impl Individual for Solution<'_> {
    fn cost(&self) -> f64 {
        self.cost
    }
}

/// Two distinct uniform positions in `0..n`; requires `n >= 2`.
fn distinct_pair<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    (i, j)
}
