//! Ordered pool of solutions and the operators that act on it.

use super::operators::{Crossover, Mutation};
use super::selection::{rank_order, Selection};
use super::solution::Solution;
use crate::error::{Result, SrflpError};
use crate::problem::LayoutProblem;
use rand::Rng;

/// An ordered multiset of [`Solution`]s over one problem.
///
/// Member order is insertion order. It only makes iteration deterministic
/// and carries no meaning for cost.
#[derive(Debug, Clone)]
pub struct Population<'a> {
    problem: &'a LayoutProblem,
    members: Vec<Solution<'a>>,
}

impl<'a> Population<'a> {
    /// Empty population.
    pub fn new(problem: &'a LayoutProblem) -> Self {
        Self {
            problem,
            members: Vec::new(),
        }
    }

    /// `size` independent random solutions.
    pub fn random<R: Rng>(problem: &'a LayoutProblem, size: usize, rng: &mut R) -> Self {
        let members = (0..size).map(|_| Solution::random(problem, rng)).collect();
        Self { problem, members }
    }

    /// Population holding `members` in the given order.
    pub fn from_members(problem: &'a LayoutProblem, members: Vec<Solution<'a>>) -> Self {
        Self { problem, members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Solution<'a>] {
        &self.members
    }

    pub fn get(&self, index: usize) -> Option<&Solution<'a>> {
        self.members.get(index)
    }

    pub fn add(&mut self, solution: Solution<'a>) {
        self.members.push(solution);
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Cheapest member; ties go to the first in iteration order.
    pub fn best(&self) -> Option<&Solution<'a>> {
        self.members
            .iter()
            .reduce(|best, s| if s.cost() < best.cost() { s } else { best })
    }

    /// Two member indices drawn independently with `selection`.
    ///
    /// The same member may be returned twice.
    pub fn select_parents<R: Rng>(&self, selection: Selection, rng: &mut R) -> Result<(usize, usize)> {
        if self.members.is_empty() {
            return Err(SrflpError::Internal(
                "cannot select parents from an empty population".into(),
            ));
        }
        let first = selection.select(&self.members, rng);
        let second = selection.select(&self.members, rng);
        Ok((first, second))
    }

    /// One child of the members at `parents` (segment from the first).
    ///
    /// Parents are borrowed, so they always stay in the population unchanged.
    /// A child that is not a permutation is reported as an internal error.
    pub fn crossover<R: Rng>(
        &self,
        parents: (usize, usize),
        crossover: Crossover,
        rng: &mut R,
    ) -> Result<Solution<'a>> {
        let (a, b) = parents;
        let parent = |i: usize| {
            self.members.get(i).ok_or_else(|| {
                SrflpError::Internal(format!(
                    "parent index {i} out of range for population of {}",
                    self.members.len()
                ))
            })
        };
        let (first, second) = (parent(a)?, parent(b)?);

        let child = crossover.recombine(first.arrangement(), second.arrangement(), rng);
        self.problem.validate_arrangement(&child).map_err(|e| {
            SrflpError::Internal(format!("{crossover:?} crossover produced {child:?}: {e}"))
        })?;
        Ok(Solution::evaluated(self.problem, child))
    }

    /// Applies one `mutation` move to each member independently with
    /// `probability`. Returns how many members changed.
    pub fn mutate<R: Rng>(&mut self, probability: f64, mutation: Mutation, rng: &mut R) -> usize {
        let mut changed = 0;
        for member in &mut self.members {
            if rng.random_range(0.0..1.0) < probability && mutation.apply(member, rng) {
                changed += 1;
            }
        }
        changed
    }

    /// Shrinks the population to exactly `target` members chosen by
    /// `selection`; the rest are dropped. Survivors keep their relative order.
    ///
    /// Asking for more members than the population holds is an internal error.
    pub fn select_population<R: Rng>(
        &mut self,
        target: usize,
        selection: Selection,
        rng: &mut R,
    ) -> Result<()> {
        if target > self.members.len() {
            return Err(SrflpError::Internal(format!(
                "cannot select {target} survivors from {} members",
                self.members.len()
            )));
        }
        if target == self.members.len() {
            return Ok(());
        }

        let mut keep = vec![false; self.members.len()];
        for i in selection.survivors(&self.members, target, rng) {
            keep[i] = true;
        }
        let mut flags = keep.into_iter();
        self.members.retain(|_| flags.next().unwrap_or(false));
        Ok(())
    }

    /// Removes and returns the `k` cheapest members, cheapest first.
    pub fn drain_best(&mut self, k: usize) -> Vec<Solution<'a>> {
        let k = k.min(self.members.len());
        if k == 0 {
            return Vec::new();
        }
        let order = rank_order(&self.members);
        let mut slots: Vec<Option<Solution<'a>>> = self.members.drain(..).map(Some).collect();
        let best = order[..k].iter().filter_map(|&i| slots[i].take()).collect();
        self.members = slots.into_iter().flatten().collect();
        best
    }

    /// Appends all of `other`'s members (the μ+λ union). No deduplication.
    pub fn join(&mut self, other: Population<'a>) {
        self.members.extend(other.members);
    }

    /// Replaces the members with copies of `other`'s.
    pub fn copy_from(&mut self, other: &Population<'a>) {
        self.problem = other.problem;
        self.members.clone_from(&other.members);
    }

    /// Refreshes every member's cached cost from the full objective.
    /// Returns the largest drift found.
    pub fn recompute_costs(&mut self) -> f64 {
        self.members
            .iter_mut()
            .map(Solution::recompute_cost)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn problem(n: usize) -> LayoutProblem {
        let sizes = (0..n).map(|i| (i % 4 + 1) as f64).collect();
        let flow = (0..n)
            .map(|i| (0..n).map(|j| ((i * 7 + j * 3) % 5) as f64).collect())
            .collect();
        LayoutProblem::new(sizes, flow).unwrap()
    }

    fn is_permutation(arrangement: &[usize], n: usize) -> bool {
        let mut seen = vec![false; n];
        arrangement.len() == n
            && arrangement
                .iter()
                .all(|&f| f < n && !std::mem::replace(&mut seen[f], true))
    }

    #[test]
    fn test_random_population() {
        let p = problem(8);
        let mut rng = create_rng(1);
        let pop = Population::random(&p, 20, &mut rng);
        assert_eq!(pop.len(), 20);
        for s in pop.members() {
            assert!(is_permutation(s.arrangement(), 8));
        }
    }

    #[test]
    fn test_best_ties_go_to_first() {
        let p = problem(4);
        let a = Solution::from_arrangement(&p, &[0, 1, 2, 3]).unwrap();
        let b = Solution::from_arrangement(&p, &[3, 2, 1, 0]).unwrap();
        // reversal has the same cost under a pair-weight objective
        assert_eq!(a.cost(), b.cost());
        let pop = Population::from_members(&p, vec![b.clone(), a.clone()]);
        assert_eq!(pop.best().unwrap().arrangement(), b.arrangement());
    }

    #[test]
    fn test_best_is_minimum() {
        let p = problem(7);
        let mut rng = create_rng(3);
        let pop = Population::random(&p, 30, &mut rng);
        let min = pop
            .members()
            .iter()
            .map(Solution::cost)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(pop.best().unwrap().cost(), min);
    }

    #[test]
    fn test_empty_population() {
        let p = problem(3);
        let mut rng = create_rng(3);
        let pop = Population::new(&p);
        assert!(pop.is_empty());
        assert!(pop.best().is_none());
        let err = pop
            .select_parents(Selection::Random, &mut rng)
            .unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_select_parents_in_range() {
        let p = problem(6);
        let mut rng = create_rng(4);
        let pop = Population::random(&p, 10, &mut rng);
        for sel in [
            Selection::Random,
            Selection::Roulette,
            Selection::Tournament(3),
            Selection::Rank,
            Selection::Truncation,
        ] {
            for _ in 0..50 {
                let (a, b) = pop.select_parents(sel, &mut rng).unwrap();
                assert!(a < 10 && b < 10);
            }
        }
    }

    #[test]
    fn test_crossover_children_are_valid_and_parents_untouched() {
        let p = problem(10);
        let mut rng = create_rng(5);
        let pop = Population::random(&p, 6, &mut rng);
        let snapshot: Vec<Vec<usize>> = pop.members().iter().map(|s| s.arrangement().to_vec()).collect();

        for op in [Crossover::LinearOrder, Crossover::Order, Crossover::PartiallyMapped] {
            for _ in 0..50 {
                let parents = pop.select_parents(Selection::Random, &mut rng).unwrap();
                let child = pop.crossover(parents, op, &mut rng).unwrap();
                assert!(is_permutation(child.arrangement(), 10));
                assert_eq!(child.cost(), p.objective(child.arrangement()));
            }
        }

        let after: Vec<Vec<usize>> = pop.members().iter().map(|s| s.arrangement().to_vec()).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn test_crossover_bad_parent_index() {
        let p = problem(5);
        let mut rng = create_rng(6);
        let pop = Population::random(&p, 3, &mut rng);
        let err = pop
            .crossover((0, 3), Crossover::LinearOrder, &mut rng)
            .unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_mutation_probability_bounds() {
        let p = problem(9);
        let mut rng = create_rng(7);
        let mut pop = Population::random(&p, 25, &mut rng);
        let before: Vec<Vec<usize>> = pop.members().iter().map(|s| s.arrangement().to_vec()).collect();

        assert_eq!(pop.mutate(0.0, Mutation::Swap, &mut rng), 0);
        let unchanged: Vec<Vec<usize>> = pop.members().iter().map(|s| s.arrangement().to_vec()).collect();
        assert_eq!(before, unchanged);

        for mutation in [Mutation::Swap, Mutation::TwoOpt, Mutation::Insert] {
            assert_eq!(pop.mutate(1.0, mutation, &mut rng), 25);
            for s in pop.members() {
                assert!(is_permutation(s.arrangement(), 9));
                let full = p.objective(s.arrangement());
                assert!((s.cost() - full).abs() < 1e-9 * full.max(1.0));
            }
        }
    }

    #[test]
    fn test_select_population_sizes() {
        let p = problem(6);
        let mut rng = create_rng(8);
        for sel in [
            Selection::Random,
            Selection::Roulette,
            Selection::Tournament(2),
            Selection::Rank,
            Selection::Truncation,
        ] {
            for k in [0, 1, 7, 15] {
                let mut pop = Population::random(&p, 15, &mut rng);
                pop.select_population(k, sel, &mut rng).unwrap();
                assert_eq!(pop.len(), k, "{sel:?}");
            }
        }
    }

    #[test]
    fn test_select_population_truncation_keeps_best() {
        let p = problem(7);
        let mut rng = create_rng(9);
        let mut pop = Population::random(&p, 20, &mut rng);
        let mut costs: Vec<f64> = pop.members().iter().map(Solution::cost).collect();
        costs.sort_by(f64::total_cmp);

        pop.select_population(5, Selection::Truncation, &mut rng).unwrap();
        let mut kept: Vec<f64> = pop.members().iter().map(Solution::cost).collect();
        kept.sort_by(f64::total_cmp);
        assert_eq!(kept, costs[..5].to_vec());
    }

    #[test]
    fn test_select_population_too_many() {
        let p = problem(4);
        let mut rng = create_rng(10);
        let mut pop = Population::random(&p, 3, &mut rng);
        let err = pop
            .select_population(4, Selection::Truncation, &mut rng)
            .unwrap_err();
        assert!(err.is_internal());
        assert_eq!(pop.len(), 3);
    }

    #[test]
    fn test_join_sizes_add_up() {
        let p = problem(5);
        let mut rng = create_rng(11);
        let mut a = Population::random(&p, 4, &mut rng);
        let b = Population::random(&p, 7, &mut rng);
        a.join(b);
        assert_eq!(a.len(), 11);
        a.join(Population::new(&p));
        assert_eq!(a.len(), 11);
    }

    #[test]
    fn test_copy_from_is_independent() {
        let p = problem(6);
        let mut rng = create_rng(12);
        let source = Population::random(&p, 5, &mut rng);
        let mut target = Population::random(&p, 2, &mut rng);
        target.copy_from(&source);
        assert_eq!(target.len(), 5);

        target.mutate(1.0, Mutation::TwoOpt, &mut rng);
        target.clear();
        assert!(target.is_empty());
        assert_eq!(source.len(), 5);
    }

    #[test]
    fn test_drain_best() {
        let p = problem(8);
        let mut rng = create_rng(13);
        let mut pop = Population::random(&p, 10, &mut rng);
        let best_cost = pop.best().unwrap().cost();

        let elites = pop.drain_best(3);
        assert_eq!(elites.len(), 3);
        assert_eq!(pop.len(), 7);
        assert_eq!(elites[0].cost(), best_cost);
        assert!(elites.windows(2).all(|w| w[0].cost() <= w[1].cost()));
        let worst_elite = elites[2].cost();
        assert!(pop.members().iter().all(|s| s.cost() >= worst_elite));

        assert_eq!(pop.drain_best(100).len(), 7);
        assert!(pop.is_empty());
    }
}
