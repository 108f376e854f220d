//! Engine configuration.
//!
//! [`EvolutionConfig`] holds all parameters that control the generational loop.

use super::operators::{Crossover, Mutation};
use super::selection::Selection;
use crate::error::{Result, SrflpError};

/// How the next parent population is formed from parents and offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Replacement {
    /// (μ,λ): survivors are drawn from the offspring only.
    ///
    /// When there are more offspring than the population size they are
    /// reduced first; otherwise the offspring replace the parents as they are.
    #[default]
    Offspring,

    /// (μ+λ): survivors are drawn from the union of parents and offspring.
    Union,
}

/// Configuration for the evolutionary engine.
///
/// # Defaults
///
/// ```
/// use u_srflp::ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 500);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_srflp::ga::{EvolutionConfig, Replacement, Selection};
///
/// let config = EvolutionConfig::default()
///     .with_population_size(50)
///     .with_offspring_size(80)
///     .with_parent_selection(Selection::Tournament(4))
///     .with_replacement(Replacement::Union)
///     .with_mutation_probability(0.2)
///     .with_max_evaluations(20_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionConfig {
    /// Number of parents μ kept between generations.
    pub population_size: usize,

    /// Number of children λ bred per generation. May be smaller or larger
    /// than `population_size`.
    pub offspring_size: usize,

    /// Operator choosing the two parents of each child.
    pub parent_selection: Selection,

    /// Recombination operator.
    pub crossover: Crossover,

    /// Move applied by mutation.
    pub mutation: Mutation,

    /// Per-child probability of one mutation move (0.0–1.0).
    pub mutation_probability: f64,

    /// (μ,λ) or (μ+λ).
    pub replacement: Replacement,

    /// Operator reducing a pool to the population size.
    pub survivor_selection: Selection,

    /// Number of cheapest parents carried over unchanged each generation.
    ///
    /// The replacement strategy fills the remaining slots. 0 disables elitism.
    pub elitism: usize,

    /// Stop once this many children have been evaluated (0 = no limit).
    ///
    /// Counted in whole generations: each generation adds `offspring_size`.
    pub max_evaluations: usize,

    /// Stop after this many generations (0 = no limit).
    pub max_generations: usize,

    /// Generations between full cost recomputations of the population,
    /// clearing accumulated rounding from incremental updates (0 = never).
    pub resync_interval: usize,

    /// Breed offspring on the rayon pool. Only honoured when the crate is
    /// built with the `parallel` feature; results are identical either way.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            offspring_size: 100,
            parent_selection: Selection::default(),
            crossover: Crossover::default(),
            mutation: Mutation::default(),
            mutation_probability: 0.1,
            replacement: Replacement::default(),
            survivor_selection: Selection::Truncation,
            elitism: 0,
            max_evaluations: 0,
            max_generations: 500,
            resync_interval: 50,
            parallel: false,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Sets the population size μ.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the offspring size λ.
    pub fn with_offspring_size(mut self, n: usize) -> Self {
        self.offspring_size = n;
        self
    }

    /// Sets the parent selection operator.
    pub fn with_parent_selection(mut self, sel: Selection) -> Self {
        self.parent_selection = sel;
        self
    }

    /// Convenience for `.with_parent_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_parent_selection(Selection::Tournament(k))
    }

    /// Sets the crossover operator.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the mutation move.
    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the mutation probability, clamped to `[0, 1]`.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the replacement strategy.
    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = replacement;
        self
    }

    /// Sets the survivor selection operator.
    pub fn with_survivor_selection(mut self, sel: Selection) -> Self {
        self.survivor_selection = sel;
        self
    }

    /// Sets the elitism count.
    pub fn with_elitism(mut self, k: usize) -> Self {
        self.elitism = k;
        self
    }

    /// Sets the evaluation budget (0 to disable).
    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = n;
        self
    }

    /// Sets the generation limit (0 to disable).
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the full-recomputation interval (0 to disable).
    pub fn with_resync_interval(mut self, n: usize) -> Self {
        self.resync_interval = n;
        self
    }

    /// Enables or disables parallel breeding.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for small instances: μ = λ = 50, 200 generations.
    pub fn fast() -> Self {
        Self {
            population_size: 50,
            offspring_size: 50,
            max_generations: 200,
            ..Self::default()
        }
    }

    /// Preset for medium instances: μ = 100, λ = 150, (μ+λ), 1 000 generations.
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            offspring_size: 150,
            replacement: Replacement::Union,
            max_generations: 1_000,
            ..Self::default()
        }
    }

    /// Preset for large instances: μ = 200, λ = 300, (μ+λ) with 2 elites,
    /// 2-opt mutation, 3 000 generations.
    pub fn quality() -> Self {
        Self {
            population_size: 200,
            offspring_size: 300,
            replacement: Replacement::Union,
            mutation: Mutation::TwoOpt,
            mutation_probability: 0.2,
            elitism: 2,
            max_generations: 3_000,
            ..Self::default()
        }
    }

    /// Picks a preset from the facility count.
    ///
    /// - `facilities < 30` → [`fast()`](Self::fast)
    /// - `30 ≤ facilities < 80` → [`balanced()`](Self::balanced)
    /// - `facilities ≥ 80` → [`quality()`](Self::quality)
    pub fn auto_select(facilities: usize) -> Self {
        if facilities < 30 {
            Self::fast()
        } else if facilities < 80 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns [`SrflpError::Config`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(SrflpError::Config(msg.into()));

        if self.population_size == 0 {
            return fail("population_size must be at least 1");
        }
        if self.offspring_size == 0 {
            return fail("offspring_size must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return fail("mutation_probability must be within [0, 1]");
        }
        for sel in [self.parent_selection, self.survivor_selection] {
            if sel == Selection::Tournament(0) {
                return fail("tournament size must be at least 1");
            }
        }
        if self.elitism >= self.population_size {
            return fail("elitism must be smaller than population_size");
        }
        if self.max_evaluations == 0 && self.max_generations == 0 {
            return fail("at least one of max_evaluations and max_generations must be positive");
        }
        Ok(())
    }
}
