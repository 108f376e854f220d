//! Error type shared by the whole crate.
//!
//! Input problems (bad configuration, malformed instance data) and
//! programming errors inside the search core (out-of-range lookups, broken
//! permutations) are both reported through [`SrflpError`]. Use
//! [`SrflpError::is_internal`] to tell them apart.

use thiserror::Error;

/// Errors produced by the layout model, the loader, and the evolutionary engine.
#[derive(Debug, Error)]
pub enum SrflpError {
    /// The engine configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A problem model has the wrong shape or contains invalid values.
    #[error("invalid instance: {0}")]
    Instance(String),

    /// The instance text could not be parsed.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number in the instance text.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// The instance file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A facility index lookup fell outside `0..count`.
    #[error("facility index {index} out of range for {count} facilities")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// Number of facilities in the problem.
        count: usize,
    },

    /// An invariant of the search core was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SrflpError {
    /// Returns `true` for errors that indicate a bug in the search core
    /// rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, SrflpError::OutOfRange { .. } | SrflpError::Internal(_))
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SrflpError>;
