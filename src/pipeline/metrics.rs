//! Agreement metrics between predicted and experimental values

use serde::Serialize;

use super::dataset::{is_constant, Dataset, ValueColumn};
use super::error::MetricError;

/// Largest excursion outside [-1, 1] that is treated as rounding noise.
const CLAMP_EPSILON: f64 = 1e-9;

/// Which statistics to compute for a set of observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricMode {
    /// RMSD only; correlation is reported as absent.
    RmsdOnly,
    /// RMSD plus the error-weighted correlation coefficient.
    #[default]
    Weighted,
}

/// Scalar agreement statistics for one group of observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricResult {
    pub rmsd: f64,
    pub correlation: Option<f64>,
}

/// Root-mean-square deviation between paired sequences.
pub fn rmsd(predicted: &[f64], experimental: &[f64]) -> Result<f64, MetricError> {
    if predicted.len() != experimental.len() {
        return Err(MetricError::shape(
            "predicted/experimental",
            predicted.len(),
            experimental.len(),
        ));
    }
    if predicted.is_empty() {
        return Err(MetricError::empty("RMSD"));
    }

    let sum_sq: f64 = predicted
        .iter()
        .zip(experimental)
        .map(|(p, e)| (p - e).powi(2))
        .sum();

    Ok((sum_sq / predicted.len() as f64).sqrt())
}

/// Correlation coefficient where each pair is weighted by the inverse of its
/// combined variance, `1 / (predicted_error² + experimental_error²)`.
///
/// With equal error estimates on every row this is the ordinary Pearson
/// coefficient.
pub fn weighted_correlation(
    predicted: &[f64],
    experimental: &[f64],
    predicted_error: &[f64],
    experimental_error: &[f64],
) -> Result<f64, MetricError> {
    let n = predicted.len();
    for (label, len) in [
        ("experimental values", experimental.len()),
        ("predicted errors", predicted_error.len()),
        ("experimental errors", experimental_error.len()),
    ] {
        if len != n {
            return Err(MetricError::invalid_error(format!(
                "{} has {} entries but predicted values has {}",
                label, len, n
            )));
        }
    }
    if n == 0 {
        return Err(MetricError::empty("weighted correlation"));
    }

    let weights = inverse_variance_weights(predicted_error, experimental_error)?;
    let sum_w: f64 = weights.iter().sum();

    let mean_p = weighted_mean(predicted, &weights, sum_w);
    let mean_e = weighted_mean(experimental, &weights, sum_w);

    let mut cov = 0.0;
    let mut var_p = 0.0;
    let mut var_e = 0.0;
    for ((&p, &e), &w) in predicted.iter().zip(experimental).zip(&weights) {
        let dp = p - mean_p;
        let de = e - mean_e;
        cov += w * dp * de;
        var_p += w * dp * dp;
        var_e += w * de * de;
    }

    // A constant series can leave a rounding residue in the variance sum
    if var_p == 0.0 || is_constant(predicted) {
        return Err(MetricError::degenerate("predicted", n));
    }
    if var_e == 0.0 || is_constant(experimental) {
        return Err(MetricError::degenerate("experimental", n));
    }

    let r = cov / (var_p * var_e).sqrt();
    if !r.is_finite() {
        return Err(MetricError::invalid_error(format!(
            "error estimates produce a non-finite correlation over {} row(s)",
            n
        )));
    }
    if r.abs() > 1.0 && r.abs() - 1.0 <= CLAMP_EPSILON {
        return Ok(r.clamp(-1.0, 1.0));
    }
    Ok(r)
}

/// Half-width of the uncertainty band drawn around the identity line:
/// `sqrt(mean(predicted_error)² + mean(experimental_error)²)`.
pub fn error_margin(
    predicted_error: &[f64],
    experimental_error: &[f64],
) -> Result<f64, MetricError> {
    if predicted_error.len() != experimental_error.len() {
        return Err(MetricError::shape(
            "predicted error/experimental error",
            predicted_error.len(),
            experimental_error.len(),
        ));
    }
    if predicted_error.is_empty() {
        return Err(MetricError::empty("error margin"));
    }

    let n = predicted_error.len() as f64;
    let mean_p = predicted_error.iter().sum::<f64>() / n;
    let mean_e = experimental_error.iter().sum::<f64>() / n;
    Ok((mean_p.powi(2) + mean_e.powi(2)).sqrt())
}

/// Compute the statistics selected by `mode` over a dataset.
///
/// `Weighted` requires both error columns on every row.
pub fn compute_metrics(dataset: &Dataset, mode: MetricMode) -> Result<MetricResult, MetricError> {
    let predicted = dataset.predicted();
    let experimental = dataset.experimental();
    let rmsd = rmsd(&predicted, &experimental)?;

    let correlation = match mode {
        MetricMode::RmsdOnly => None,
        MetricMode::Weighted => {
            let predicted_error = dataset.column(ValueColumn::PredictedError)?;
            let experimental_error = dataset.column(ValueColumn::ExperimentalError)?;
            Some(weighted_correlation(
                &predicted,
                &experimental,
                &predicted_error,
                &experimental_error,
            )?)
        }
    };

    Ok(MetricResult { rmsd, correlation })
}

/// Weights `1 / (pe² + ee²)` computed on errors divided by the largest one.
///
/// The correlation is invariant under a common scale of the weights, and the
/// rescaling keeps the squares clear of overflow and underflow.
fn inverse_variance_weights(
    predicted_error: &[f64],
    experimental_error: &[f64],
) -> Result<Vec<f64>, MetricError> {
    for (row, (&pe, &ee)) in predicted_error.iter().zip(experimental_error).enumerate() {
        for (label, value) in [("predicted", pe), ("experimental", ee)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MetricError::invalid_error(format!(
                    "{} error at row {} is {}; errors must be positive and finite",
                    label, row, value
                )));
            }
        }
    }

    let scale = predicted_error
        .iter()
        .chain(experimental_error)
        .fold(0.0f64, |acc, &v| acc.max(v));

    predicted_error
        .iter()
        .zip(experimental_error)
        .enumerate()
        .map(|(row, (&pe, &ee))| {
            let (pe, ee) = (pe / scale, ee / scale);
            let weight = 1.0 / (pe * pe + ee * ee);
            if weight.is_finite() && weight > 0.0 {
                Ok(weight)
            } else {
                Err(MetricError::invalid_error(format!(
                    "errors at row {} are too small relative to the largest error ({}) to weight",
                    row, scale
                )))
            }
        })
        .collect()
}

#[inline]
fn weighted_mean(values: &[f64], weights: &[f64], sum_w: f64) -> f64 {
    values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / sum_w
}
