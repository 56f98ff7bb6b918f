//! End-to-end analysis: outlier filter, overall metrics, per-category metrics

use log::info;

use super::category::{aggregate, CategoryMetrics, CategorySelection};
use super::dataset::{Dataset, ValueColumn};
use super::error::MetricError;
use super::metrics::{compute_metrics, error_margin, MetricMode, MetricResult};
use super::outlier::{filter_outliers, FilterResult, DEFAULT_Z_THRESHOLD};

/// Parameters for one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Columns whose difference defines the residual used for outlier removal
    pub residual_columns: (ValueColumn, ValueColumn),
    pub threshold: f64,
    pub mode: MetricMode,
    pub categories: CategorySelection,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            residual_columns: (ValueColumn::Predicted, ValueColumn::Experimental),
            threshold: DEFAULT_Z_THRESHOLD,
            mode: MetricMode::default(),
            categories: CategorySelection::default(),
        }
    }
}

/// Everything the report and export layers need, with no recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub input_rows: usize,
    pub filter: FilterResult,
    pub overall: MetricResult,
    pub categories: CategoryMetrics,
    /// Uncertainty band half-width; present when every kept row has errors
    pub error_margin: Option<f64>,
}

impl AnalysisReport {
    pub fn filtered(&self) -> &Dataset {
        &self.filter.filtered
    }
}

/// Run the full pipeline over `dataset`.
///
/// With [`CategorySelection::Observed`], categories that only occurred in
/// rows removed as outliers are still listed (after the surviving ones) and
/// reported as "no data".
pub fn run_analysis(
    dataset: &Dataset,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, MetricError> {
    let (column_a, column_b) = config.residual_columns;
    let filter = filter_outliers(dataset, column_a, column_b, config.threshold)?;
    let filtered = &filter.filtered;

    let overall = compute_metrics(filtered, config.mode)?;

    let selection = match &config.categories {
        CategorySelection::Observed => {
            let mut labels = filtered.categories();
            for label in dataset.categories() {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
            CategorySelection::Listed(labels)
        }
        listed => listed.clone(),
    };
    let mode = config.mode;
    let categories = aggregate(filtered, &selection, |subset| compute_metrics(subset, mode));

    let error_margin = if filtered.has_errors() {
        let predicted_error = filtered.column(ValueColumn::PredictedError)?;
        let experimental_error = filtered.column(ValueColumn::ExperimentalError)?;
        Some(error_margin(&predicted_error, &experimental_error)?)
    } else {
        None
    };

    info!(
        "Analysis complete: {} of {} rows kept, {} categories ({} computed)",
        filter.kept(),
        dataset.len(),
        categories.len(),
        categories.computed_count()
    );

    Ok(AnalysisReport {
        input_rows: dataset.len(),
        filter,
        overall,
        categories,
        error_margin,
    })
}
