//! Generational loop.
//!
//! [`EvolutionEngine`] runs the complete evolutionary process:
//! initialization → breeding → mutation → replacement → repeat.

use super::config::{EvolutionConfig, Replacement};
use super::population::Population;
use super::solution::Solution;
use crate::error::{Result, SrflpError};
use crate::problem::LayoutProblem;
use crate::random::create_rng;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, trace};

/// Result of a search.
#[derive(Debug, Clone)]
pub struct EvolutionResult<'a> {
    /// Cheapest solution seen during the entire run.
    pub best: Solution<'a>,

    /// Same as `best.cost()`.
    pub best_cost: f64,

    /// Generations executed.
    pub generations: usize,

    /// Children evaluated (`generations * offspring_size`).
    pub evaluations: usize,

    /// Best-so-far cost after initialization and after each generation.
    ///
    /// Holds `generations + 1` entries and never increases.
    pub cost_history: Vec<f64>,
}

/// Evolutionary search over one problem.
///
/// The engine is consumed by [`search`](Self::search), so a configured
/// engine runs exactly once.
///
/// ```
/// use u_srflp::ga::{EvolutionConfig, EvolutionEngine};
/// use u_srflp::problem::LayoutProblem;
///
/// let problem = LayoutProblem::new(
///     vec![1.0, 2.0, 3.0, 4.0],
///     vec![
///         vec![0.0, 3.0, 1.0, 0.0],
///         vec![3.0, 0.0, 2.0, 1.0],
///         vec![1.0, 2.0, 0.0, 4.0],
///         vec![0.0, 1.0, 4.0, 0.0],
///     ],
/// )
/// .unwrap();
/// let config = EvolutionConfig::default()
///     .with_population_size(20)
///     .with_offspring_size(20)
///     .with_max_generations(30)
///     .with_seed(7);
///
/// let result = EvolutionEngine::run(&problem, &config).unwrap();
/// assert_eq!(result.generations, 30);
/// assert_eq!(result.best_cost, problem.objective(result.best.arrangement()));
/// ```
#[derive(Debug, Clone)]
pub struct EvolutionEngine<'a> {
    problem: &'a LayoutProblem,
    config: EvolutionConfig,
}

impl<'a> EvolutionEngine<'a> {
    /// Binds a validated configuration to a problem.
    pub fn new(problem: &'a LayoutProblem, config: EvolutionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { problem, config })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Shorthand for `EvolutionEngine::new(problem, config.clone())?.search()`.
    pub fn run(problem: &'a LayoutProblem, config: &EvolutionConfig) -> Result<EvolutionResult<'a>> {
        Self::new(problem, config.clone())?.search()
    }

    /// Runs the generational loop until an enabled limit is reached.
    pub fn search(self) -> Result<EvolutionResult<'a>> {
        let config = &self.config;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);

        info!(
            facilities = self.problem.facility_count(),
            population = config.population_size,
            offspring = config.offspring_size,
            replacement = ?config.replacement,
            seed,
            "starting evolutionary search"
        );

        let mut parents = Population::random(self.problem, config.population_size, &mut rng);
        let mut best = parents
            .best()
            .cloned()
            .ok_or_else(|| SrflpError::Internal("initial population is empty".into()))?;

        let mut generations = 0;
        let mut evaluations = 0;
        let mut cost_history = Vec::new();
        cost_history.push(best.cost());

        while !self.limit_reached(generations, evaluations) {
            let mut offspring = self.breed(&parents, &mut rng)?;
            offspring.mutate(config.mutation_probability, config.mutation, &mut rng);
            let offspring_best = offspring.best().map_or(f64::INFINITY, Solution::cost);

            self.replace(&mut parents, offspring, &mut rng)?;
            generations += 1;
            evaluations += config.offspring_size;

            if config.resync_interval > 0 && generations % config.resync_interval == 0 {
                let drift = parents.recompute_costs().max(best.recompute_cost());
                trace!(generation = generations, drift, "recomputed population costs");
            }

            let improved = match parents.best() {
                Some(candidate) if candidate.cost() < best.cost() => {
                    best.copy_from(candidate);
                    true
                }
                _ => false,
            };
            cost_history.push(best.cost());

            debug!(
                generation = generations,
                offspring_best,
                best = best.cost(),
                improved,
                "generation complete"
            );
        }

        info!(
            generations,
            evaluations,
            best = best.cost(),
            "evolutionary search finished"
        );

        Ok(EvolutionResult {
            best_cost: best.cost(),
            best,
            generations,
            evaluations,
            cost_history,
        })
    }

    fn limit_reached(&self, generations: usize, evaluations: usize) -> bool {
        let config = &self.config;
        (config.max_generations > 0 && generations >= config.max_generations)
            || (config.max_evaluations > 0 && evaluations >= config.max_evaluations)
    }

    /// Breeds `offspring_size` children of `parents`.
    ///
    /// Each child gets its own generator seeded from `rng`, so the result does
    /// not depend on whether children are bred sequentially or on the rayon
    /// pool.
    fn breed(&self, parents: &Population<'a>, rng: &mut StdRng) -> Result<Population<'a>> {
        let seeds: Vec<u64> = (0..self.config.offspring_size).map(|_| rng.random()).collect();
        let child = |seed: u64| -> Result<Solution<'a>> {
            let mut rng = create_rng(seed);
            let pair = parents.select_parents(self.config.parent_selection, &mut rng)?;
            parents.crossover(pair, self.config.crossover, &mut rng)
        };

        #[cfg(feature = "parallel")]
        let children: Result<Vec<_>> = if self.config.parallel {
            use rayon::prelude::*;
            seeds.into_par_iter().map(child).collect()
        } else {
            seeds.into_iter().map(child).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let children: Result<Vec<_>> = seeds.into_iter().map(child).collect();

        Ok(Population::from_members(self.problem, children?))
    }

    /// Forms the next parent population from `parents` and `offspring`.
    fn replace(
        &self,
        parents: &mut Population<'a>,
        mut offspring: Population<'a>,
        rng: &mut StdRng,
    ) -> Result<()> {
        let config = &self.config;
        let elites = parents.drain_best(config.elitism);
        let slots = config.population_size - elites.len();

        match config.replacement {
            Replacement::Offspring => {
                if offspring.len() > slots {
                    offspring.select_population(slots, config.survivor_selection, rng)?;
                }
            }
            Replacement::Union => {
                let previous = std::mem::replace(parents, Population::new(self.problem));
                offspring.join(previous);
                offspring.select_population(slots, config.survivor_selection, rng)?;
            }
        }
        trace!(
            elites = elites.len(),
            survivors = offspring.len(),
            "replaced parent population"
        );

        let mut next = Population::from_members(self.problem, elites);
        next.join(offspring);
        *parents = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{Crossover, Mutation, Selection};

    fn problem(n: usize) -> LayoutProblem {
        let sizes = (0..n).map(|i| (i % 5 + 1) as f64).collect();
        let flow = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { 0.0 } else { ((i * 3 + j * 7) % 6) as f64 })
                    .collect()
            })
            .collect();
        LayoutProblem::new(sizes, flow).unwrap()
    }

    fn small_config() -> EvolutionConfig {
        EvolutionConfig::default()
            .with_population_size(20)
            .with_offspring_size(30)
            .with_max_generations(40)
            .with_seed(42)
    }

    #[test]
    fn test_zero_flow_gives_zero_cost() {
        let p = LayoutProblem::new(vec![1.0; 3], vec![vec![0.0; 3]; 3]).unwrap();
        let config = EvolutionConfig::default()
            .with_population_size(10)
            .with_offspring_size(10)
            .with_max_generations(5)
            .with_seed(1);
        let result = EvolutionEngine::run(&p, &config).unwrap();
        assert_eq!(result.best_cost, 0.0);
    }

    #[test]
    fn test_evaluation_budget_smaller_than_offspring() {
        let p = problem(8);
        let config = small_config()
            .with_max_generations(0)
            .with_offspring_size(50)
            .with_max_evaluations(30);
        let result = EvolutionEngine::run(&p, &config).unwrap();
        assert_eq!(result.generations, 1);
        assert_eq!(result.evaluations, 50);
        assert_eq!(result.cost_history.len(), 2);
    }

    #[test]
    fn test_evaluation_budget_counts_whole_generations() {
        let p = problem(8);
        let config = small_config()
            .with_max_generations(0)
            .with_offspring_size(30)
            .with_max_evaluations(100);
        let result = EvolutionEngine::run(&p, &config).unwrap();
        assert_eq!(result.generations, 4);
        assert_eq!(result.evaluations, 120);
    }

    #[test]
    fn test_huge_generation_limit_with_small_budget() {
        let p = problem(6);
        let config = EvolutionConfig::default()
            .with_population_size(5)
            .with_offspring_size(5)
            .with_max_generations(1usize << 60)
            .with_max_evaluations(20)
            .with_seed(8);
        let result = EvolutionEngine::run(&p, &config).unwrap();
        assert_eq!(result.generations, 4);
        assert_eq!(result.cost_history.len(), 5);
    }

    #[test]
    fn test_first_limit_wins() {
        let p = problem(8);
        let config = small_config()
            .with_max_generations(3)
            .with_max_evaluations(1_000_000);
        assert_eq!(EvolutionEngine::run(&p, &config).unwrap().generations, 3);
    }

    #[test]
    fn test_history_is_non_increasing() {
        let p = problem(12);
        for replacement in [Replacement::Offspring, Replacement::Union] {
            let config = small_config().with_replacement(replacement);
            let result = EvolutionEngine::run(&p, &config).unwrap();
            assert_eq!(result.cost_history.len(), result.generations + 1);
            for window in result.cost_history.windows(2) {
                assert!(window[1] <= window[0], "{replacement:?}: {window:?}");
            }
            assert_eq!(result.cost_history.last(), Some(&result.best_cost));
        }
    }

    #[test]
    fn test_best_cost_matches_objective() {
        let p = problem(10);
        let config = small_config()
            .with_mutation(Mutation::Insert)
            .with_mutation_probability(0.5)
            .with_resync_interval(0);
        let result = EvolutionEngine::run(&p, &config).unwrap();
        let fresh = p.objective(result.best.arrangement());
        assert!((result.best_cost - fresh).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_result() {
        let p = problem(10);
        let config = small_config().with_crossover(Crossover::Order);
        let a = EvolutionEngine::run(&p, &config).unwrap();
        let b = EvolutionEngine::run(&p, &config).unwrap();
        assert_eq!(a.best.arrangement(), b.best.arrangement());
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let p = problem(10);
        let config = small_config();
        let seq = EvolutionEngine::run(&p, &config).unwrap();
        let par = EvolutionEngine::run(&p, &config.clone().with_parallel(true)).unwrap();
        assert_eq!(seq.best.arrangement(), par.best.arrangement());
        assert_eq!(seq.cost_history, par.cost_history);
    }

    #[test]
    fn test_offspring_replacement_with_fewer_children() {
        let p = problem(8);
        let config = small_config()
            .with_population_size(20)
            .with_offspring_size(5)
            .with_max_generations(10);
        let result = EvolutionEngine::run(&p, &config).unwrap();
        assert_eq!(result.evaluations, 50);
        assert!(result.best_cost.is_finite());
    }

    #[test]
    fn test_union_keeps_population_size() {
        let p = problem(8);
        let engine = EvolutionEngine::new(
            &p,
            small_config()
                .with_replacement(Replacement::Union)
                .with_offspring_size(7),
        )
        .unwrap();
        let mut rng = create_rng(3);
        let mut parents = Population::random(&p, 20, &mut rng);
        let offspring = engine.breed(&parents, &mut rng).unwrap();
        assert_eq!(offspring.len(), 7);
        engine.replace(&mut parents, offspring, &mut rng).unwrap();
        assert_eq!(parents.len(), 20);
    }

    #[test]
    fn test_elites_survive_replacement() {
        let p = problem(8);
        let engine = EvolutionEngine::new(
            &p,
            small_config()
                .with_elitism(3)
                .with_survivor_selection(Selection::Random),
        )
        .unwrap();
        let mut rng = create_rng(9);
        let mut parents = Population::random(&p, 20, &mut rng);
        let mut costs: Vec<f64> = parents.members().iter().map(Solution::cost).collect();
        costs.sort_by(f64::total_cmp);

        let offspring = engine.breed(&parents, &mut rng).unwrap();
        engine.replace(&mut parents, offspring, &mut rng).unwrap();

        assert_eq!(parents.len(), 20);
        let kept: Vec<f64> = parents.members()[..3].iter().map(Solution::cost).collect();
        assert_eq!(kept, costs[..3].to_vec());
    }

    #[test]
    fn test_offspring_replacement_discards_parents() {
        let p = problem(8);
        let engine = EvolutionEngine::new(&p, small_config().with_offspring_size(20)).unwrap();
        let mut rng = create_rng(5);
        let mut parents = Population::random(&p, 20, &mut rng);
        let offspring = engine.breed(&parents, &mut rng).unwrap();
        let expected: Vec<Vec<usize>> = offspring
            .members()
            .iter()
            .map(|s| s.arrangement().to_vec())
            .collect();
        engine.replace(&mut parents, offspring, &mut rng).unwrap();
        let got: Vec<Vec<usize>> = parents
            .members()
            .iter()
            .map(|s| s.arrangement().to_vec())
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let p = problem(5);
        let config = EvolutionConfig::default().with_population_size(0);
        assert!(matches!(
            EvolutionEngine::new(&p, config),
            Err(SrflpError::Config(_))
        ));
        let config = EvolutionConfig::default()
            .with_max_generations(0)
            .with_max_evaluations(0);
        assert!(EvolutionEngine::run(&p, &config).is_err());
    }

    #[test]
    fn test_single_facility() {
        let p = LayoutProblem::new(vec![3.0], vec![vec![0.0]]).unwrap();
        let config = small_config().with_max_generations(3);
        let result = EvolutionEngine::run(&p, &config).unwrap();
        assert_eq!(result.best.arrangement(), &[0]);
        assert_eq!(result.best_cost, 0.0);
    }

    #[test]
    fn test_improves_on_initial_population() {
        let p = problem(15);
        let config = EvolutionConfig::default()
            .with_population_size(40)
            .with_offspring_size(60)
            .with_replacement(Replacement::Union)
            .with_max_generations(100)
            .with_seed(11);
        let result = EvolutionEngine::run(&p, &config).unwrap();
        assert!(result.best_cost <= result.cost_history[0]);
    }
}
