//! SRFLP instance model.
//!
//! - [`LayoutProblem`]: facility sizes, flow matrix, and the layout objective
//! - [`loader`]: reads the comma-separated instance text format
//!
//! # References
//!
//! - Simmons (1969), "One-Dimensional Space Allocation: An Ordering Algorithm"
//! - Anjos & Vannelli (2008), "Computing Globally Optimal Solutions for
//!   Single-Row Layout Problems Using Semidefinite Programming and Cutting Planes"

pub mod loader;
mod model;

pub use loader::{load_instance, parse_instance};
pub use model::LayoutProblem;
