//! Tests for residual z-score outlier filtering

use pkacorr::pipeline::{
    filter_outliers, z_scores, MetricError, ValueColumn, DEFAULT_Z_THRESHOLD,
};

#[path = "common/mod.rs"]
mod common;

use common::*;

const P: ValueColumn = ValueColumn::Predicted;
const E: ValueColumn = ValueColumn::Experimental;

#[test]
fn test_single_large_residual_removed() {
    let ds = dataset_from(&[(1.0, 1.0, "A"), (2.0, 2.0, "A"), (10.0, 1.0, "A")]);

    let z = z_scores(&[0.0, 0.0, 9.0]);
    assert_close(z[0], -0.7071, 1e-4);
    assert_close(z[1], -0.7071, 1e-4);
    assert_close(z[2], 1.4142, 1e-4);

    let result = filter_outliers(&ds, P, E, 1.0).unwrap();

    assert_eq!(result.removed, 1);
    assert_eq!(result.filtered.predicted(), vec![1.0, 2.0]);
    assert_eq!(result.filtered.experimental(), vec![1.0, 2.0]);
}

#[test]
fn test_row_counts_are_conserved() {
    let ds = create_random_dataset(200, &["ASP", "GLU", "LYS"], 7);

    for threshold in [0.5, 1.0, 2.0, DEFAULT_Z_THRESHOLD] {
        let result = filter_outliers(&ds, P, E, threshold).unwrap();
        assert_eq!(
            result.filtered.len() + result.removed,
            ds.len(),
            "kept + removed must equal input at threshold {}",
            threshold
        );
    }
}

#[test]
fn test_input_is_not_mutated() {
    let ds = dataset_from(&[(1.0, 1.0, "A"), (2.0, 2.0, "A"), (10.0, 1.0, "A")]);
    let before = ds.clone();

    let _ = filter_outliers(&ds, P, E, 1.0).unwrap();

    assert_eq!(ds, before);
}

#[test]
fn test_identical_residuals_keep_everything() {
    let ds = dataset_from(&[(1.5, 1.0, "A"), (2.5, 2.0, "B"), (3.5, 3.0, "A"), (9.5, 9.0, "B")]);

    let result = filter_outliers(&ds, P, E, 0.1).unwrap();

    assert_eq!(result.removed, 0);
    assert_eq!(result.filtered, ds);
}

#[test]
fn test_fewer_than_two_rows_pass_through() {
    let single = dataset_from(&[(100.0, 1.0, "A")]);
    let result = filter_outliers(&single, P, E, 0.5).unwrap();
    assert_eq!(result.filtered, single);
    assert_eq!(result.removed, 0);

    let empty = dataset_from(&[]);
    let result = filter_outliers(&empty, P, E, 0.5).unwrap();
    assert!(result.filtered.is_empty());
    assert_eq!(result.removed, 0);
}

#[test]
fn test_non_positive_threshold_is_rejected() {
    let ds = dataset_from(&[(1.0, 1.0, "A"), (2.0, 2.0, "A")]);

    for threshold in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let result = filter_outliers(&ds, P, E, threshold);
        assert!(
            matches!(result, Err(MetricError::InvalidThreshold { .. })),
            "threshold {} should be rejected",
            threshold
        );
    }
}

#[test]
fn test_threshold_rejected_even_for_tiny_input() {
    let single = dataset_from(&[(1.0, 1.0, "A")]);
    assert!(filter_outliers(&single, P, E, 0.0).is_err());
}

#[test]
fn test_idempotent_once_threshold_covers_all_scores() {
    let ds = create_random_dataset(50, &["ASP", "GLU"], 11);
    let residuals: Vec<f64> = ds
        .iter()
        .map(|o| o.predicted - o.experimental)
        .collect();
    let max_z = z_scores(&residuals)
        .into_iter()
        .fold(0.0f64, |acc, z| acc.max(z.abs()));

    let first = filter_outliers(&ds, P, E, max_z + 1e-9).unwrap();
    assert_eq!(first.removed, 0);

    let second = filter_outliers(&first.filtered, P, E, max_z + 1e-9).unwrap();
    assert_eq!(second.removed, 0);
    assert_eq!(second.filtered, first.filtered);
}

#[test]
fn test_filter_on_error_columns() {
    let ds = dataset_with_errors(&[
        (1.0, 1.0, "A", 0.2, 0.1),
        (2.0, 2.0, "A", 0.2, 0.1),
        (3.0, 3.0, "A", 5.0, 0.1),
    ]);

    let result = filter_outliers(
        &ds,
        ValueColumn::PredictedError,
        ValueColumn::ExperimentalError,
        1.0,
    )
    .unwrap();

    assert_eq!(result.removed, 1);
    assert_eq!(result.filtered.predicted(), vec![1.0, 2.0]);
}

#[test]
fn test_filter_on_missing_error_column_fails() {
    let ds = dataset_from(&[(1.0, 1.0, "A"), (2.0, 2.0, "A")]);
    let result = filter_outliers(&ds, ValueColumn::PredictedError, E, 3.0);
    assert!(matches!(result, Err(MetricError::InvalidError { .. })));
}

#[test]
fn test_rounding_noise_in_residuals_is_not_spread() {
    // 0.3 - 0.1 differs from 0.2 - 0.0 only in the last bit
    let ds = dataset_from(&[(0.3, 0.1, "A"), (0.2, 0.0, "A"), (0.2, 0.0, "B")]);

    let result = filter_outliers(&ds, P, E, 1.0).unwrap();

    assert_eq!(result.removed, 0);
    assert_eq!(result.filtered, ds);
}
