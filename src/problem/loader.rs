//! Instance file reader.
//!
//! The text format is line oriented:
//!
//! ```text
//! # comment lines and blank lines are skipped
//! 4
//! 1, 2, 3, 4
//! 0, 1, 0, 2
//! 1, 0, 3, 0
//! 0, 3, 0, 1
//! 2, 0, 1, 0
//! EOF
//! ```
//!
//! The first data line is the facility count `n`, the second the `n`
//! facility sizes, then `n` rows of the flow matrix. A line starting with
//! `EOF` (or the end of the input) stops reading. Only the shape is checked
//! here; value checks happen in [`LayoutProblem::new`].

use std::fs;
use std::path::Path;

use tracing::debug;

use super::model::LayoutProblem;
use crate::error::{Result, SrflpError};

/// Reads and parses an instance file.
pub fn load_instance(path: impl AsRef<Path>) -> Result<LayoutProblem> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let problem = parse_instance(&text)?;
    debug!(
        path = %path.display(),
        facilities = problem.facility_count(),
        "instance loaded"
    );
    Ok(problem)
}

/// Parses instance text.
pub fn parse_instance(text: &str) -> Result<LayoutProblem> {
    let mut count: Option<usize> = None;
    let mut sizes: Option<Vec<f64>> = None;
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut last_line = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        let line = raw.trim();
        if line.starts_with("EOF") {
            break;
        }
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match (count, sizes.is_some()) {
            (None, _) => {
                let n = line.parse::<usize>().map_err(|e| SrflpError::Parse {
                    line: line_no,
                    message: format!("invalid facility count {line:?}: {e}"),
                })?;
                count = Some(n);
            }
            (Some(n), false) => sizes = Some(parse_row(line, n, line_no)?),
            (Some(n), true) => {
                if rows.len() == n {
                    return Err(SrflpError::Parse {
                        line: line_no,
                        message: format!("unexpected data after {n} flow rows"),
                    });
                }
                rows.push(parse_row(line, n, line_no)?);
            }
        }
    }

    let n = count.ok_or_else(|| SrflpError::Parse {
        line: last_line,
        message: "missing facility count".into(),
    })?;
    let sizes = sizes.ok_or_else(|| SrflpError::Parse {
        line: last_line,
        message: "missing facility sizes".into(),
    })?;
    if rows.len() != n {
        return Err(SrflpError::Parse {
            line: last_line,
            message: format!("expected {n} flow rows, found {}", rows.len()),
        });
    }

    LayoutProblem::new(sizes, rows)
}

/// Parses one comma-separated row of exactly `n` numbers.
///
/// A trailing comma is tolerated.
fn parse_row(line: &str, n: usize, line_no: usize) -> Result<Vec<f64>> {
    let values = line
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<f64>().map_err(|e| SrflpError::Parse {
                line: line_no,
                message: format!("invalid number {token:?}: {e}"),
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    if values.len() != n {
        return Err(SrflpError::Parse {
            line: line_no,
            message: format!("expected {n} values, found {}", values.len()),
        });
    }
    Ok(values)
}
