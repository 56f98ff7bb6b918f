//! Residual-based outlier removal
//!
//! A row is an outlier when the z-score of its residual (`column_a - column_b`)
//! exceeds the threshold in absolute value. The z-score uses the population
//! standard deviation (divide by N).

use log::debug;

use super::dataset::{Dataset, ValueColumn};
use super::error::MetricError;

/// Default |z| cutoff for outlier removal
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Residual spread at or below this fraction of `max(1, |mean|)` is rounding noise.
const SPREAD_EPSILON: f64 = 1e-12;

/// Rows that survived filtering plus how many were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    pub filtered: Dataset,
    pub removed: usize,
}

impl FilterResult {
    pub fn kept(&self) -> usize {
        self.filtered.len()
    }
}

/// Standardized scores of a residual sequence.
///
/// Returns all zeros when the sequence has fewer than two values or its
/// spread is within rounding noise of zero.
pub fn z_scores(residuals: &[f64]) -> Vec<f64> {
    let n = residuals.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let mean = residuals.iter().sum::<f64>() / n as f64;
    let variance = residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n as f64;
    let std = variance.sqrt();
    if std <= SPREAD_EPSILON * mean.abs().max(1.0) {
        return vec![0.0; n];
    }

    residuals.iter().map(|r| (r - mean) / std).collect()
}

/// Remove rows whose residual `column_a - column_b` has |z| above `threshold`.
///
/// The input dataset is left untouched; kept rows are cloned in their
/// original order.
pub fn filter_outliers(
    dataset: &Dataset,
    column_a: ValueColumn,
    column_b: ValueColumn,
    threshold: f64,
) -> Result<FilterResult, MetricError> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(MetricError::InvalidThreshold { threshold });
    }

    if dataset.len() < 2 {
        return Ok(FilterResult {
            filtered: dataset.clone(),
            removed: 0,
        });
    }

    let a = dataset.column(column_a)?;
    let b = dataset.column(column_b)?;
    let residuals: Vec<f64> = a.iter().zip(&b).map(|(x, y)| x - y).collect();
    let scores = z_scores(&residuals);

    let filtered: Dataset = dataset
        .iter()
        .zip(&scores)
        .filter(|(_, z)| z.abs() <= threshold)
        .map(|(obs, _)| obs.clone())
        .collect();
    let removed = dataset.len() - filtered.len();

    debug!(
        "Outlier filter on {} - {} (|z| <= {}): kept {}, removed {}",
        column_a,
        column_b,
        threshold,
        filtered.len(),
        removed
    );

    Ok(FilterResult { filtered, removed })
}
