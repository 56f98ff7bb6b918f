//! Shared test utilities and fixture generators
#![allow(dead_code)]

use pkacorr::pipeline::{Dataset, Observation};
use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Absolute pKa table with uncertainties.
///
/// - `ASP`, `GLU`, `HIS`: three rows each, predictions close to experiment
/// - one `LYS` row with a large residual that the default filter removes
pub fn create_absolute_dataframe() -> DataFrame {
    df! {
        "Predicted_pKa" => [3.9f64, 3.6, 4.1, 4.5, 4.2, 4.0, 6.4, 6.1, 6.6, 14.5, 4.0, 4.3, 6.3, 10.6, 10.4],
        "Experimental_pKa" => [4.0f64, 3.5, 4.3, 4.4, 4.3, 4.1, 6.5, 6.0, 6.7, 10.4, 3.8, 4.2, 6.4, 10.5, 10.6],
        "Residue_Type" => ["ASP", "ASP", "ASP", "GLU", "GLU", "GLU", "HIS", "HIS", "HIS", "LYS", "ASP", "GLU", "HIS", "CYS", "CYS"],
        "Predicted_Error" => [0.2f64, 0.3, 0.2, 0.4, 0.3, 0.2, 0.5, 0.4, 0.3, 0.5, 0.2, 0.3, 0.4, 0.3, 0.2],
        "Experimental_Error" => [0.1f64, 0.1, 0.2, 0.1, 0.2, 0.1, 0.1, 0.2, 0.1, 0.1, 0.1, 0.2, 0.1, 0.1, 0.2],
    }
    .unwrap()
}

/// pKa shift table without uncertainties; contains no GLU rows
pub fn create_delta_dataframe() -> DataFrame {
    df! {
        "Delta_Predicted" => [-0.5f64, 0.3, -1.1, 0.8, 1.2, 0.4, -0.2],
        "Delta_Experimental" => [-0.4f64, 0.1, -1.0, 1.0, 0.9, 0.5, -0.3],
        "Residue_Type" => ["ASP", "ASP", "ASP", "LYS", "LYS", "LYS", "HIS"],
    }
    .unwrap()
}

/// Write a DataFrame to a CSV inside a fresh temporary directory
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Write a DataFrame to a Parquet file inside a fresh temporary directory
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Build a dataset from `(predicted, experimental, category)` triples
pub fn dataset_from(rows: &[(f64, f64, &str)]) -> Dataset {
    rows.iter()
        .map(|&(p, e, c)| Observation::new(p, e, c))
        .collect()
}

/// Build a dataset with errors from `(predicted, experimental, category, p_err, e_err)`
pub fn dataset_with_errors(rows: &[(f64, f64, &str, f64, f64)]) -> Dataset {
    rows.iter()
        .map(|&(p, e, c, pe, ee)| Observation::new(p, e, c).with_errors(pe, ee))
        .collect()
}

/// Random dataset with errors spread over the given categories
pub fn create_random_dataset(rows: usize, categories: &[&str], seed: u64) -> Dataset {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    (0..rows)
        .map(|i| {
            let experimental = rng.gen_range(2.0..12.0);
            let predicted = experimental + rng.gen_range(-1.5..1.5);
            let category = categories[i % categories.len()];
            Observation::new(predicted, experimental, category)
                .with_errors(rng.gen_range(0.05..1.0), rng.gen_range(0.05..0.5))
        })
        .collect()
}

/// Plain Pearson correlation for cross-checking the weighted version
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let cov: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    let vx: f64 = x.iter().map(|a| (a - mx).powi(2)).sum();
    let vy: f64 = y.iter().map(|b| (b - my).powi(2)).sum();
    cov / (vx * vy).sqrt()
}

/// Assert two floats agree within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "Expected {} (±{}), got {}",
        expected,
        tol,
        actual
    );
}
