//! Genetic algorithm over facility arrangements.
//!
//! Candidate layouts are permutations of facility indices. The engine keeps a
//! population of them, breeds children by permutation crossover, perturbs them
//! with neighbourhood moves whose cost is updated incrementally, and replaces
//! the parents with a (μ,λ) or (μ+λ) strategy.
//!
//! # Key Types
//!
//! - [`Solution`]: One arrangement with its cached cost and the move operators
//! - [`Population`]: Ordered pool of solutions with selection, crossover and
//!   mutation acting on it
//! - [`EvolutionConfig`]: Algorithm parameters (sizes, operators, limits, presets)
//! - [`EvolutionEngine`]: Executes the generational loop
//! - [`EvolutionResult`]: Best solution found with run statistics
//!
//! # Submodules
//!
//! - [`operators`]: Permutation crossover (LOX, OX, PMX) and mutation dispatch
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Falkenauer & Bouffouix (1991), *A genetic algorithm for job shop* (linear order crossover)
//! - Simmons (1969), *One-dimensional space allocation: an ordering algorithm*

mod config;
pub mod operators;
mod population;
mod runner;
mod selection;
mod solution;
mod types;

pub use config::{EvolutionConfig, Replacement};
pub use operators::{Crossover, Mutation};
pub use population::Population;
pub use runner::{EvolutionEngine, EvolutionResult};
pub use selection::Selection;
pub use solution::Solution;
pub use types::Individual;
