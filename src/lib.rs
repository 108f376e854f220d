//! Evolutionary search for the Single Row Facility Layout Problem (SRFLP).
//!
//! Facilities of given lengths are placed side by side on a line. Each pair
//! with a positive flow between them costs flow × centre-to-centre distance,
//! and the goal is the arrangement with the smallest total cost.
//!
//! - **Problem model**: [`problem::LayoutProblem`] holds sizes and flows and
//!   evaluates the objective; [`problem::loader`] reads instance files.
//! - **Genetic algorithm**: [`ga::EvolutionEngine`] evolves a population of
//!   [`ga::Solution`]s with pluggable selection, crossover, mutation and
//!   replacement, configured through [`ga::EvolutionConfig`].
//!
//! # Example
//!
//! ```
//! use u_srflp::ga::{EvolutionConfig, EvolutionEngine};
//! use u_srflp::problem::parse_instance;
//!
//! let problem = parse_instance("3\n1,2,3\n0,4,1\n4,0,2\n1,2,0\n").unwrap();
//! let config = EvolutionConfig::fast().with_max_generations(20).with_seed(42);
//! let result = EvolutionEngine::run(&problem, &config).unwrap();
//! assert_eq!(result.best.arrangement().len(), 3);
//! ```

pub mod error;
pub mod ga;
pub mod problem;
pub mod random;

pub use error::{Result, SrflpError};
