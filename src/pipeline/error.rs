//! Error types for the statistics pipeline.
//!
//! Every variant carries enough context (which series, how many rows) for the
//! caller to print an actionable message without re-inspecting the data.

use thiserror::Error;

/// Failures raised by the outlier filter, the metric engine and the
/// per-category aggregator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    /// Two paired sequences have different lengths.
    #[error("Shape mismatch for {pair}: {left} vs {right} values")]
    ShapeMismatch {
        /// Human-readable name of the column pair
        pair: String,
        left: usize,
        right: usize,
    },

    /// A computation needs at least one observation and received none.
    #[error("Empty input for {what}: at least one observation is required")]
    EmptyInput { what: String },

    /// Error estimates are missing, non-positive, non-finite, or their
    /// sequence lengths disagree with the value sequences.
    #[error("Invalid error values: {detail}")]
    InvalidError { detail: String },

    /// The correlation denominator is zero, so the coefficient is undefined.
    #[error("Correlation undefined: {series} values have zero variance across {rows} row(s)")]
    DegenerateVariance { series: String, rows: usize },

    /// The outlier threshold must be a positive, finite number.
    #[error("Invalid outlier threshold {threshold}: must be a positive, finite number")]
    InvalidThreshold { threshold: f64 },
}

impl MetricError {
    pub(crate) fn shape(pair: &str, left: usize, right: usize) -> Self {
        MetricError::ShapeMismatch {
            pair: pair.to_string(),
            left,
            right,
        }
    }

    pub(crate) fn empty(what: &str) -> Self {
        MetricError::EmptyInput {
            what: what.to_string(),
        }
    }

    pub(crate) fn invalid_error(detail: impl Into<String>) -> Self {
        MetricError::InvalidError {
            detail: detail.into(),
        }
    }

    pub(crate) fn degenerate(series: &str, rows: usize) -> Self {
        MetricError::DegenerateVariance {
            series: series.to_string(),
            rows,
        }
    }
}
