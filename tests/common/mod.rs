//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Tolerance for floating point comparisons of frequencies
pub const TOLERANCE: f64 = 1e-9;

/// Create a small traffic-like training DataFrame with known category counts
///
/// This DataFrame includes:
/// - `holiday`: 8 x "None", 2 x "Labor Day"
/// - `temp`: numeric feature, never encoded
/// - `weather_main`: 5 x "Clouds", 3 x "Clear", 2 x "Rain"
/// - `hour`: integer column usable as a category
pub fn create_training_dataframe() -> DataFrame {
    df! {
        "holiday" => ["None", "None", "None", "Labor Day", "None", "None", "None", "Labor Day", "None", "None"],
        "temp" => [12.5f64, 14.0, 9.5, 21.0, 18.0, 3.0, -2.0, 25.5, 16.0, 11.0],
        "weather_main" => ["Clouds", "Clear", "Clouds", "Rain", "Clouds", "Clear", "Clouds", "Rain", "Clear", "Clouds"],
        "hour" => [8i32, 8, 9, 17, 17, 17, 12, 12, 12, 12],
    }
    .unwrap()
}

/// The three-row weather example: 2 x Rain, 1 x Clear
pub fn create_weather_dataframe() -> DataFrame {
    df! {
        "weather" => ["Rain", "Rain", "Clear"],
    }
    .unwrap()
}

/// Create a larger random categorical DataFrame for stress tests
pub fn create_large_categorical_dataframe(rows: usize, categories: usize) -> DataFrame {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let labels: Vec<String> = (0..rows)
        .map(|_| format!("cat_{}", rng.gen_range(0..categories)))
        .collect();
    let codes: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..categories as i64)).collect();
    let values: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>()).collect();

    DataFrame::new(vec![
        Column::new("label".into(), labels),
        Column::new("code".into(), codes),
        Column::new("value".into(), values),
    ])
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Read a Float64 column into a Vec, panicking on nulls
pub fn f64_values(df: &DataFrame, column: &str) -> Vec<f64> {
    df.column(column)
        .unwrap_or_else(|_| panic!("Missing column '{}'", column))
        .f64()
        .unwrap_or_else(|_| panic!("Column '{}' is not Float64", column))
        .into_iter()
        .map(|v| v.expect("encoded values must not be null"))
        .collect()
}

/// Column names of a DataFrame as owned strings
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols = column_names(df);
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols = column_names(df);
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Assert two floats are equal within [`TOLERANCE`]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "Expected {}, got {}",
        expected,
        actual
    );
}
