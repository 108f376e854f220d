//! Permutation crossover operators and the mutation move catalogue.
//!
//! The crossover functions operate on `&[usize]` arrangements and always
//! return a permutation of the same facilities.
//!
//! # Crossover Operators
//!
//! - [`linear_order_crossover`] (LOX): keeps a slice of parent 1 in place and
//!   fills the row left to right in parent 2's order
//! - [`order_crossover`] (OX): Davis (1985), fill wraps around after the slice
//! - [`pmx_crossover`] (PMX): Goldberg & Lingle (1985), preserves absolute position
//!
//! # Mutation Moves
//!
//! - [`Mutation::Swap`]: exchange two random positions
//! - [`Mutation::TwoOpt`]: reverse a random segment of length ≥ 3
//! - [`Mutation::Insert`]: remove a facility and reinsert it elsewhere
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Falkenauer & Bouffouix (1991), "A Genetic Algorithm for Job Shop"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"

use super::solution::Solution;
use rand::Rng;

/// Crossover operator, chosen once in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// Linear order crossover.
    #[default]
    LinearOrder,
    /// Davis order crossover.
    Order,
    /// Partially mapped crossover.
    PartiallyMapped,
}

impl Crossover {
    /// Builds one child arrangement from two parent arrangements.
    ///
    /// # Panics
    /// Panics if the parents have different lengths or are empty.
    pub fn recombine<R: Rng>(&self, parent1: &[usize], parent2: &[usize], rng: &mut R) -> Vec<usize> {
        match self {
            Crossover::LinearOrder => linear_order_crossover(parent1, parent2, rng),
            Crossover::Order => order_crossover(parent1, parent2, rng),
            Crossover::PartiallyMapped => pmx_crossover(parent1, parent2, rng),
        }
    }
}

/// Mutation move, chosen once in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutation {
    /// [`Solution::random_swap`].
    #[default]
    Swap,
    /// [`Solution::random_two_opt`].
    TwoOpt,
    /// [`Solution::random_insert`].
    Insert,
}

impl Mutation {
    /// Applies one random move; returns whether the arrangement changed.
    pub fn apply<R: Rng>(&self, solution: &mut Solution<'_>, rng: &mut R) -> bool {
        match self {
            Mutation::Swap => solution.random_swap(rng),
            Mutation::TwoOpt => solution.random_two_opt(rng),
            Mutation::Insert => solution.random_insert(rng),
        }
    }
}

// ============================================================================
// Crossover operators
// ============================================================================

/// Linear Order Crossover (LOX).
///
/// 1. Select a random segment `[start, end]` and copy it from `parent1`
/// 2. Fill the remaining positions left to right with `parent2`'s facilities
///    in their order, skipping those already placed
///
/// Suited to linear layouts: the left and right ends of the row are not
/// treated as neighbours.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths or are empty.
pub fn linear_order_crossover<R: Rng>(parent1: &[usize], parent2: &[usize], rng: &mut R) -> Vec<usize> {
    let n = check_parents(parent1, parent2);
    if n == 1 {
        return parent1.to_vec();
    }
    let (start, end) = random_segment(n, rng);
    lox_build_child(parent1, parent2, start, end)
}

fn lox_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![usize::MAX; n];
    let mut in_segment = vec![false; n];

    for i in start..=end {
        child[i] = template[i];
        in_segment[template[i]] = true;
    }

    let mut fill = donor.iter().copied().filter(|&v| !in_segment[v]);
    for pos in (0..start).chain(end + 1..n) {
        if let Some(v) = fill.next() {
            child[pos] = v;
        }
    }

    child
}

/// Order Crossover (OX) for permutations.
///
/// Preserves the **relative order** of `parent2`'s remaining facilities.
///
/// 1. Select a random segment `[start, end]` from `parent1`
/// 2. Copy segment to child at the same positions
/// 3. Fill remaining positions from `parent2`, starting after the segment
///    end and wrapping around, skipping facilities already placed
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths or are empty.
pub fn order_crossover<R: Rng>(parent1: &[usize], parent2: &[usize], rng: &mut R) -> Vec<usize> {
    let n = check_parents(parent1, parent2);
    if n == 1 {
        return parent1.to_vec();
    }
    let (start, end) = random_segment(n, rng);
    ox_build_child(parent1, parent2, start, end)
}

fn ox_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![usize::MAX; n];
    let mut in_segment = vec![false; n];

    for i in start..=end {
        child[i] = template[i];
        in_segment[template[i]] = true;
    }

    let mut pos = (end + 1) % n;
    for offset in 0..n {
        let val = donor[(end + 1 + offset) % n];
        if !in_segment[val] {
            child[pos] = val;
            pos = (pos + 1) % n;
        }
    }

    child
}

/// Partially Mapped Crossover (PMX) for permutations.
///
/// Preserves the **absolute position** of facilities from both parents
/// as much as possible.
///
/// 1. Select a random segment `[start, end]` from `parent1`
/// 2. Copy segment to child at the same positions
/// 3. For each facility in `parent2`'s segment that isn't in the child yet,
///    follow the mapping chain to a free position and place it there
/// 4. Fill remaining positions from `parent2`
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths or are empty.
pub fn pmx_crossover<R: Rng>(parent1: &[usize], parent2: &[usize], rng: &mut R) -> Vec<usize> {
    let n = check_parents(parent1, parent2);
    if n == 1 {
        return parent1.to_vec();
    }
    let (start, end) = random_segment(n, rng);
    pmx_build_child(parent1, parent2, start, end)
}

fn pmx_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let sentinel = usize::MAX;
    let mut child = vec![sentinel; n];
    let mut placed = vec![false; n];

    // position of every facility in the donor
    let mut donor_pos = vec![0; n];
    for (i, &v) in donor.iter().enumerate() {
        donor_pos[v] = i;
    }

    for i in start..=end {
        child[i] = template[i];
        placed[template[i]] = true;
    }

    for i in start..=end {
        let donor_val = donor[i];
        if placed[donor_val] {
            continue;
        }
        let mut pos = i;
        loop {
            let next = donor_pos[template[pos]];
            if next < start || next > end {
                child[next] = donor_val;
                placed[donor_val] = true;
                break;
            }
            pos = next;
        }
    }

    for (slot, &v) in child.iter_mut().zip(donor) {
        if *slot == sentinel {
            *slot = v;
        }
    }

    child
}

// ============================================================================
// Helpers
// ============================================================================

fn check_parents(parent1: &[usize], parent2: &[usize]) -> usize {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n > 0, "parents must not be empty");
    n
}

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================================
// Tests
// ============================================================================
