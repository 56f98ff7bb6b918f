//! Unit tests for dataset loading and column extraction

use pkacorr::pipeline::{
    extract_dataset, get_column_names, load_dataframe, load_dataset, ColumnMapping,
};
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_load_csv_file() {
    let mut df = create_absolute_dataframe();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let loaded = load_dataset(&csv_path, &ColumnMapping::absolute(), 100).unwrap();

    assert_eq!(loaded.total_rows, 15);
    assert_eq!(loaded.skipped_rows, 0);
    assert_eq!(loaded.dataset.len(), 15);
    assert!(loaded.dataset.has_errors());
    assert_eq!(
        loaded.dataset.categories(),
        vec!["ASP", "GLU", "HIS", "LYS", "CYS"]
    );
}

#[test]
fn test_load_parquet_file() {
    let mut df = create_delta_dataframe();
    let (_temp_dir, parquet_path) = create_temp_parquet(&mut df);

    let loaded = load_dataset(&parquet_path, &ColumnMapping::delta(), 100).unwrap();

    assert_eq!(loaded.dataset.len(), 7);
    assert!(!loaded.dataset.has_errors());
    assert_eq!(loaded.dataset.predicted()[0], -0.5);
}

#[test]
fn test_unsupported_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.xlsx");
    std::fs::write(&path, "irrelevant").unwrap();

    let result = load_dataframe(&path, 100);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Unsupported file format"));
}

#[test]
fn test_get_column_names_csv() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "Delta_Predicted,Delta_Experimental,Residue_Type").unwrap();
    writeln!(file, "0.1,0.2,ASP").unwrap();
    drop(file);

    let columns = get_column_names(&csv_path).unwrap();

    assert_eq!(
        columns,
        vec!["Delta_Predicted", "Delta_Experimental", "Residue_Type"]
    );
}

#[test]
fn test_missing_column_lists_available() {
    let df = create_delta_dataframe();

    let result = extract_dataset(&df, &ColumnMapping::absolute());

    let message = result.unwrap_err().to_string();
    assert!(message.contains("Predicted_pKa"), "got: {}", message);
    assert!(message.contains("Delta_Predicted"), "got: {}", message);
}

#[test]
fn test_rows_with_missing_values_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("gaps.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "Delta_Predicted,Delta_Experimental,Residue_Type").unwrap();
    writeln!(file, "0.1,0.2,ASP").unwrap();
    writeln!(file, ",0.3,ASP").unwrap();
    writeln!(file, "0.4,0.5,").unwrap();
    writeln!(file, "0.6,0.7,LYS").unwrap();
    drop(file);

    let loaded = load_dataset(&csv_path, &ColumnMapping::delta(), 100).unwrap();

    assert_eq!(loaded.total_rows, 4);
    assert_eq!(loaded.skipped_rows, 2);
    assert_eq!(loaded.dataset.predicted(), vec![0.1, 0.6]);
}

#[test]
fn test_non_finite_values_are_skipped() {
    let df = df! {
        "Delta_Predicted" => [0.1f64, f64::NAN, 0.3, f64::INFINITY],
        "Delta_Experimental" => [0.2f64, 0.2, 0.4, 0.5],
        "Residue_Type" => ["ASP", "ASP", "GLU", "GLU"],
    }
    .unwrap();

    let loaded = extract_dataset(&df, &ColumnMapping::delta()).unwrap();

    assert_eq!(loaded.skipped_rows, 2);
    assert_eq!(loaded.dataset.experimental(), vec![0.2, 0.4]);
}

#[test]
fn test_rows_missing_errors_are_skipped_when_errors_mapped() {
    let df = df! {
        "Predicted_pKa" => [4.0f64, 4.5, 6.0],
        "Experimental_pKa" => [3.9f64, 4.4, 6.2],
        "Residue_Type" => ["ASP", "GLU", "HIS"],
        "Predicted_Error" => [Some(0.2f64), None, Some(0.3)],
        "Experimental_Error" => [0.1f64, 0.1, 0.2],
    }
    .unwrap();

    let with_errors = extract_dataset(&df, &ColumnMapping::absolute()).unwrap();
    assert_eq!(with_errors.skipped_rows, 1);
    assert!(with_errors.dataset.has_errors());

    let without = extract_dataset(&df, &ColumnMapping::absolute().without_errors()).unwrap();
    assert_eq!(without.skipped_rows, 0);
    assert!(!without.dataset.has_errors());
}

#[test]
fn test_numeric_category_labels_become_text() {
    let df = df! {
        "Delta_Predicted" => [0.1f64, 0.2],
        "Delta_Experimental" => [0.2f64, 0.1],
        "Residue_Type" => [1i32, 2],
    }
    .unwrap();

    let loaded = extract_dataset(&df, &ColumnMapping::delta()).unwrap();
    assert_eq!(loaded.dataset.categories(), vec!["1", "2"]);
}

#[test]
fn test_half_specified_error_columns_rejected() {
    let df = create_absolute_dataframe();
    let mut mapping = ColumnMapping::absolute();
    mapping.experimental_error = None;

    assert!(extract_dataset(&df, &mapping).is_err());
}
