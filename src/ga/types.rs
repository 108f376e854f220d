//! Core trait shared by the selection operators.

/// Anything that selection operators can rank.
///
/// Lower cost is better (minimization). [`Solution`](super::Solution)
/// implements it; the selection tests use a bare cost wrapper.
pub trait Individual {
    /// Current objective value.
    fn cost(&self) -> f64;
}
