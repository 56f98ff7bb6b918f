//! Command-line argument definitions using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::pipeline::{
    AnalysisConfig, CategorySelection, ColumnMapping, MetricMode, ValueColumn,
    DEFAULT_Z_THRESHOLD,
};

/// Residue categories reported for pKa shift tables
pub const DELTA_CATEGORIES: [&str; 3] = ["ASP", "LYS", "GLU"];

/// Column layout and default analysis for a known table kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Absolute pKa values with uncertainties: RMSD + weighted correlation
    Absolute,
    /// pKa shifts: RMSD only, reported for ASP, LYS and GLU
    Delta,
}

/// pKa-corr - Score predicted pKa values against experiment
#[derive(Parser, Debug)]
#[command(name = "pkacorr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Table layout: column names, metric mode and category defaults
    #[arg(short, long, value_enum, default_value = "absolute")]
    pub preset: Preset,

    /// Predicted value column (overrides the preset)
    #[arg(long)]
    pub predicted_column: Option<String>,

    /// Experimental value column (overrides the preset)
    #[arg(long)]
    pub experimental_column: Option<String>,

    /// Category column, e.g. residue type (overrides the preset)
    #[arg(long)]
    pub category_column: Option<String>,

    /// Predicted error column (overrides the preset)
    #[arg(long)]
    pub predicted_error_column: Option<String>,

    /// Experimental error column (overrides the preset)
    #[arg(long)]
    pub experimental_error_column: Option<String>,

    /// Outlier threshold - drop rows whose residual z-score exceeds this in absolute value
    #[arg(long, default_value_t = DEFAULT_Z_THRESHOLD, value_parser = validate_threshold)]
    pub threshold: f64,

    /// Compute RMSD only and ignore error columns
    #[arg(long, default_value = "false")]
    pub rmsd_only: bool,

    /// Categories to report (comma-separated), in this order.
    /// Categories without rows are reported as "no data".
    /// Defaults to every category in the data (ASP,LYS,GLU for the delta preset).
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// JSON export path.
    /// Defaults to input directory with '_metrics.json' suffix (e.g., data.csv → data_metrics.json).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip writing the JSON export
    #[arg(long, default_value = "false")]
    pub no_export: bool,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Column names from the preset with any explicit overrides applied.
    pub fn column_mapping(&self) -> ColumnMapping {
        let mut mapping = match self.preset {
            Preset::Absolute => ColumnMapping::absolute(),
            Preset::Delta => ColumnMapping::delta(),
        };

        if let Some(name) = &self.predicted_column {
            mapping.predicted = name.clone();
        }
        if let Some(name) = &self.experimental_column {
            mapping.experimental = name.clone();
        }
        if let Some(name) = &self.category_column {
            mapping.category = name.clone();
        }
        if let Some(name) = &self.predicted_error_column {
            mapping.predicted_error = Some(name.clone());
        }
        if let Some(name) = &self.experimental_error_column {
            mapping.experimental_error = Some(name.clone());
        }

        if self.rmsd_only {
            mapping.without_errors()
        } else {
            mapping
        }
    }

    /// Metric mode implied by the mapping: weighted only when errors are available.
    pub fn metric_mode(&self) -> MetricMode {
        if self.column_mapping().has_error_columns() {
            MetricMode::Weighted
        } else {
            MetricMode::RmsdOnly
        }
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        let listed: Vec<String> = self
            .categories
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        let categories = if !listed.is_empty() {
            CategorySelection::Listed(listed)
        } else if self.preset == Preset::Delta {
            CategorySelection::Listed(DELTA_CATEGORIES.iter().map(|s| s.to_string()).collect())
        } else {
            CategorySelection::Observed
        };

        AnalysisConfig {
            residual_columns: (ValueColumn::Predicted, ValueColumn::Experimental),
            threshold: self.threshold,
            mode: self.metric_mode(),
            categories,
        }
    }

    /// Get the export path, deriving from input if not explicitly provided.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let parent = self
                .input
                .parent()
                .unwrap_or_else(|| std::path::Path::new("."));
            let stem = self
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            parent.join(format!("{}_metrics.json", stem))
        })
    }
}

/// Validator for the outlier threshold
fn validate_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !value.is_finite() || value <= 0.0 {
        Err(format!(
            "threshold must be a positive, finite number, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
