//! Dataset loader for CSV and Parquet files
//!
//! Reads a table with polars and converts the mapped columns into a typed
//! [`Dataset`]. Rows with a missing or non-finite value in any required
//! column are skipped here so the statistics never see them.

use anyhow::{Context, Result};
use log::warn;
use polars::prelude::*;
use std::path::Path;

use super::dataset::{Dataset, Observation};

/// Names of the table columns feeding each observation field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub predicted: String,
    pub experimental: String,
    pub category: String,
    pub predicted_error: Option<String>,
    pub experimental_error: Option<String>,
}

impl ColumnMapping {
    /// Absolute pKa table with per-row uncertainties.
    pub fn absolute() -> Self {
        Self {
            predicted: "Predicted_pKa".to_string(),
            experimental: "Experimental_pKa".to_string(),
            category: "Residue_Type".to_string(),
            predicted_error: Some("Predicted_Error".to_string()),
            experimental_error: Some("Experimental_Error".to_string()),
        }
    }

    /// pKa shift table (no uncertainties).
    pub fn delta() -> Self {
        Self {
            predicted: "Delta_Predicted".to_string(),
            experimental: "Delta_Experimental".to_string(),
            category: "Residue_Type".to_string(),
            predicted_error: None,
            experimental_error: None,
        }
    }

    /// Drop the error columns (RMSD-only analysis).
    pub fn without_errors(mut self) -> Self {
        self.predicted_error = None;
        self.experimental_error = None;
        self
    }

    pub fn has_error_columns(&self) -> bool {
        self.predicted_error.is_some() && self.experimental_error.is_some()
    }
}

/// A typed dataset plus bookkeeping about rows the loader rejected.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub total_rows: usize,
    pub skipped_rows: usize,
}

/// Load a table from a file (CSV or Parquet based on extension)
///
/// `infer_schema_length` applies to CSV only; 0 scans the whole file.
pub fn load_dataframe(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let lf = scan_file(path, infer_schema_length)?;
    lf.collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Column names of a CSV or Parquet file without loading its rows
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let mut lf = scan_file(path, 100)?;
    let schema = lf
        .collect_schema()
        .with_context(|| format!("Failed to read schema: {}", path.display()))?;
    Ok(schema.iter_names().map(|name| name.to_string()).collect())
}

/// Convert the mapped columns of `df` into a [`Dataset`].
pub fn extract_dataset(df: &DataFrame, mapping: &ColumnMapping) -> Result<LoadedDataset> {
    let predicted = float_column(df, &mapping.predicted)?;
    let experimental = float_column(df, &mapping.experimental)?;
    let categories = string_column(df, &mapping.category)?;

    let errors = match (&mapping.predicted_error, &mapping.experimental_error) {
        (Some(pe), Some(ee)) => Some((float_column(df, pe)?, float_column(df, ee)?)),
        (None, None) => None,
        _ => anyhow::bail!(
            "Both predicted and experimental error columns must be given, or neither"
        ),
    };

    let total_rows = df.height();
    let mut observations = Vec::with_capacity(total_rows);

    for row in 0..total_rows {
        let (Some(p), Some(e), Some(category)) =
            (predicted[row], experimental[row], categories[row].as_ref())
        else {
            continue;
        };

        let mut obs = Observation::new(p, e, category.clone());
        if let Some((pe, ee)) = &errors {
            let (Some(pe), Some(ee)) = (pe[row], ee[row]) else {
                continue;
            };
            obs = obs.with_errors(pe, ee);
        }
        observations.push(obs);
    }

    let skipped_rows = total_rows - observations.len();
    if skipped_rows > 0 {
        warn!(
            "Skipped {} of {} row(s) with missing or non-finite values",
            skipped_rows, total_rows
        );
    }

    Ok(LoadedDataset {
        dataset: Dataset::new(observations),
        total_rows,
        skipped_rows,
    })
}

/// Load a file and extract the mapped columns in one step
pub fn load_dataset(
    path: &Path,
    mapping: &ColumnMapping,
    infer_schema_length: usize,
) -> Result<LoadedDataset> {
    let df = load_dataframe(path, infer_schema_length)?;
    extract_dataset(&df, mapping)
        .with_context(|| format!("Failed to extract columns from {}", path.display()))
}

fn scan_file(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let infer = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(infer)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    Ok(lf)
}

fn lookup<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| {
        let available: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        anyhow::anyhow!(
            "Column '{}' not found in dataset. Available columns: {:?}",
            name,
            available
        )
    })
}

/// Numeric column as `Option<f64>` per row; nulls and non-finite values are `None`
fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = lookup(df, name)?;
    let float_col = column.cast(&DataType::Float64).map_err(|_| {
        anyhow::anyhow!(
            "Column '{}' must be numeric (cannot cast to Float64)",
            name
        )
    })?;
    let ca = float_col
        .f64()
        .map_err(|_| anyhow::anyhow!("Failed to access column '{}' as Float64", name))?;

    Ok(ca.iter().map(|v| v.filter(|x| x.is_finite())).collect())
}

/// Category column as text; numeric labels are rendered as strings
fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = lookup(df, name)?;
    let str_col = column
        .cast(&DataType::String)
        .with_context(|| format!("Failed to read column '{}' as text", name))?;
    let ca = str_col
        .str()
        .map_err(|_| anyhow::anyhow!("Failed to access column '{}' as String", name))?;

    Ok(ca
        .iter()
        .map(|v| v.map(str::trim).filter(|s| !s.is_empty()).map(String::from))
        .collect())
}
