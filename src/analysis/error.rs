//! Error types for analysis
//!
//! Usage errors only: malformed selectors and window lengths. Data
//! irregularities (absent symbols, dangling slices) are modeled as
//! values, not errors.

use thiserror::Error;

/// Errors raised by analyzer entry points
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// A selector referenced a part the score does not have
    #[error("part index {index} out of range (score has {num_parts} parts)")]
    PartOutOfRange { index: usize, num_parts: usize },

    /// A window query asked for a zero-length window
    #[error("window length must be at least 1")]
    InvalidWindowLength,
}
