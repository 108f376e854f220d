//! The immutable SRFLP instance and its objective function.

use crate::error::{Result, SrflpError};

/// A Single Row Facility Layout Problem instance.
///
/// Holds the facility sizes and the flow matrix. Once constructed the model
/// never changes; solutions, populations, and the engine all borrow it.
///
/// # Pair weights
///
/// The flow matrix need not be symmetric. The objective charges the pair
/// `{u, v}` with `flow[min(u, v)][max(u, v)]`, i.e. the entry above the
/// diagonal, so both full symmetric matrices and upper-triangular instance
/// files are priced correctly.
///
/// # Examples
///
/// ```
/// use u_srflp::problem::LayoutProblem;
///
/// let problem = LayoutProblem::new(
///     vec![2.0, 4.0, 2.0],
///     vec![
///         vec![0.0, 1.0, 0.0],
///         vec![1.0, 0.0, 3.0],
///         vec![0.0, 3.0, 0.0],
///     ],
/// )
/// .unwrap();
///
/// // 0 | 1 | 2: pair (0,1) at distance 3, pair (1,2) at distance 3
/// assert_eq!(problem.objective(&[0, 1, 2]), 1.0 * 3.0 + 3.0 * 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutProblem {
    sizes: Vec<f64>,
    /// Row-major `n × n`.
    flow: Vec<f64>,
}

impl LayoutProblem {
    /// Builds a problem from facility sizes and a square flow matrix.
    ///
    /// Returns [`SrflpError::Instance`] when there are no facilities, when the
    /// matrix is not `n × n`, when a size is not a positive finite number, or
    /// when a flow entry is negative or not finite.
    pub fn new(sizes: Vec<f64>, flow: Vec<Vec<f64>>) -> Result<Self> {
        let n = sizes.len();
        if n == 0 {
            return Err(SrflpError::Instance(
                "at least one facility is required".into(),
            ));
        }
        if let Some((i, s)) = sizes
            .iter()
            .enumerate()
            .find(|(_, s)| !s.is_finite() || **s <= 0.0)
        {
            return Err(SrflpError::Instance(format!(
                "facility {i} has invalid size {s}"
            )));
        }
        if flow.len() != n {
            return Err(SrflpError::Instance(format!(
                "flow matrix has {} rows, expected {n}",
                flow.len()
            )));
        }

        let mut flat = Vec::with_capacity(n * n);
        for (i, row) in flow.into_iter().enumerate() {
            if row.len() != n {
                return Err(SrflpError::Instance(format!(
                    "flow row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            if let Some((j, w)) = row
                .iter()
                .enumerate()
                .find(|(_, w)| !w.is_finite() || **w < 0.0)
            {
                return Err(SrflpError::Instance(format!(
                    "flow[{i}][{j}] has invalid weight {w}"
                )));
            }
            flat.extend(row);
        }

        Ok(Self { sizes, flow: flat })
    }

    /// Number of facilities `n`.
    pub fn facility_count(&self) -> usize {
        self.sizes.len()
    }

    /// All facility sizes in index order.
    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    /// Size of facility `i`.
    pub fn facility_size(&self, i: usize) -> Result<f64> {
        self.sizes.get(i).copied().ok_or(SrflpError::OutOfRange {
            index: i,
            count: self.facility_count(),
        })
    }

    /// Raw flow entry `flow[i][j]`.
    ///
    /// An out-of-range index means the caller computed a bad facility index,
    /// so the error is classified as internal.
    pub fn weight(&self, i: usize, j: usize) -> Result<f64> {
        let n = self.facility_count();
        for index in [i, j] {
            if index >= n {
                return Err(SrflpError::OutOfRange { index, count: n });
            }
        }
        Ok(self.flow[i * n + j])
    }

    /// Weight charged to the unordered pair `{u, v}`.
    #[inline]
    pub(crate) fn pair_weight(&self, u: usize, v: usize) -> f64 {
        let (lo, hi) = if u <= v { (u, v) } else { (v, u) };
        self.flow[lo * self.facility_count() + hi]
    }

    /// Checks that `arrangement` is a permutation of `0..n`.
    pub fn validate_arrangement(&self, arrangement: &[usize]) -> Result<()> {
        let n = self.facility_count();
        if arrangement.len() != n {
            return Err(SrflpError::Instance(format!(
                "arrangement has {} positions, expected {n}",
                arrangement.len()
            )));
        }
        let mut seen = vec![false; n];
        for &facility in arrangement {
            if facility >= n {
                return Err(SrflpError::Instance(format!(
                    "facility {facility} out of range for {n} facilities"
                )));
            }
            if std::mem::replace(&mut seen[facility], true) {
                return Err(SrflpError::Instance(format!(
                    "facility {facility} appears more than once"
                )));
            }
        }
        Ok(())
    }

    /// Total layout cost of `arrangement`.
    ///
    /// For every pair of positions `i < j` the cost adds the pair weight times
    /// the centre-to-centre distance `size[p_i]/2 + middle + size[p_j]/2`,
    /// where `middle` is the total size of the facilities strictly between
    /// the two. O(n²).
    ///
    /// # Panics
    /// Panics if `arrangement` contains an index `>= n`. Use
    /// [`validate_arrangement`](Self::validate_arrangement) on untrusted input.
    pub fn objective(&self, arrangement: &[usize]) -> f64 {
        let mut total = 0.0;
        for (i, &p1) in arrangement.iter().enumerate() {
            let half = self.sizes[p1] / 2.0;
            let mut middle = 0.0;
            for &p2 in &arrangement[i + 1..] {
                let size2 = self.sizes[p2];
                total += self.pair_weight(p1, p2) * (half + middle + size2 / 2.0);
                middle += size2;
            }
        }
        total
    }

    /// Cost contributed by every pair with at least one member placed at a
    /// position in `start..=end`.
    ///
    /// Swap and 2-opt moves only relocate facilities inside that range, so
    /// `cost - segment_cost(before) + segment_cost(after)` is the exact new
    /// cost. O(n · (end - start + 1)).
    pub(crate) fn segment_cost(&self, arrangement: &[usize], start: usize, end: usize) -> f64 {
        let centers = self.centers(arrangement);
        let segment = start..=end;
        let mut total = 0.0;
        for a in start..=end {
            let u = arrangement[a];
            for (b, &v) in arrangement.iter().enumerate() {
                // pairs inside the segment are counted once, from their left member
                if segment.contains(&b) && b <= a {
                    continue;
                }
                total += self.pair_weight(u, v) * (centers[a] - centers[b]).abs();
            }
        }
        total
    }

    /// Centre coordinate of each position along the row.
    fn centers(&self, arrangement: &[usize]) -> Vec<f64> {
        let mut offset = 0.0;
        arrangement
            .iter()
            .map(|&facility| {
                let size = self.sizes[facility];
                let center = offset + size / 2.0;
                offset += size;
                center
            })
            .collect()
    }
}
