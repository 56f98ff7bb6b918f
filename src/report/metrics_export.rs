//! JSON export of an analysis run for plotting and archiving

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{AnalysisReport, CategoryOutcome, ColumnMapping, MetricMode};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    pub pkacorr_version: String,
    pub input_file: String,
    pub predicted_column: String,
    pub experimental_column: String,
    pub category_column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_error_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental_error_column: Option<String>,
    /// |z| cutoff used for outlier removal
    pub outlier_threshold: f64,
    pub mode: MetricMode,
}

/// Overall counts and metrics
#[derive(Serialize)]
pub struct OverallSummary {
    pub input_rows: usize,
    pub skipped_rows: usize,
    pub removed_outliers: usize,
    pub scored_rows: usize,
    pub rmsd: f64,
    pub correlation: Option<f64>,
    /// Half-width of the uncertainty band around the identity line
    pub error_margin: Option<f64>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    Computed,
    NoData,
    Failed,
}

/// One category's outcome
#[derive(Serialize)]
pub struct CategoryExportEntry {
    pub category: String,
    pub rows: usize,
    pub status: CategoryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rmsd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A scored point, in plot axes order
#[derive(Serialize)]
pub struct PointExport {
    pub experimental: f64,
    pub predicted: f64,
    pub category: String,
}

/// Complete export document
#[derive(Serialize)]
pub struct MetricsExport {
    pub metadata: RunMetadata,
    pub summary: OverallSummary,
    pub categories: Vec<CategoryExportEntry>,
    pub points: Vec<PointExport>,
}

/// Parameters describing the run, recorded in the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub mapping: &'a ColumnMapping,
    pub threshold: f64,
    pub mode: MetricMode,
    pub skipped_rows: usize,
}

/// Assemble the export document from a finished analysis
pub fn build_metrics_export(report: &AnalysisReport, params: &ExportParams) -> MetricsExport {
    let categories = report
        .categories
        .iter()
        .map(|entry| {
            let (status, metrics, error) = match &entry.outcome {
                CategoryOutcome::Computed(m) => (CategoryStatus::Computed, Some(*m), None),
                CategoryOutcome::NoData => (CategoryStatus::NoData, None, None),
                CategoryOutcome::Failed(e) => (CategoryStatus::Failed, None, Some(e.to_string())),
            };
            CategoryExportEntry {
                category: entry.category.clone(),
                rows: entry.rows,
                status,
                rmsd: metrics.map(|m| m.rmsd),
                correlation: metrics.and_then(|m| m.correlation),
                error,
            }
        })
        .collect();

    let points = report
        .filtered()
        .iter()
        .map(|obs| PointExport {
            experimental: obs.experimental,
            predicted: obs.predicted,
            category: obs.category.clone(),
        })
        .collect();

    let mapping = params.mapping;
    MetricsExport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            pkacorr_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            predicted_column: mapping.predicted.clone(),
            experimental_column: mapping.experimental.clone(),
            category_column: mapping.category.clone(),
            predicted_error_column: mapping.predicted_error.clone(),
            experimental_error_column: mapping.experimental_error.clone(),
            outlier_threshold: params.threshold,
            mode: params.mode,
        },
        summary: OverallSummary {
            input_rows: report.input_rows + params.skipped_rows,
            skipped_rows: params.skipped_rows,
            removed_outliers: report.filter.removed,
            scored_rows: report.filter.kept(),
            rmsd: report.overall.rmsd,
            correlation: report.overall.correlation,
            error_margin: report.error_margin,
        },
        categories,
        points,
    }
}

/// Write the analysis export as pretty-printed JSON
pub fn export_metrics(
    report: &AnalysisReport,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = build_metrics_export(report, params);

    let json =
        serde_json::to_string_pretty(&export).context("Failed to serialize metrics to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write metrics to {}", output_path.display()))?;

    Ok(())
}
