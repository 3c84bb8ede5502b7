//! Unit tests for frequency encoding

use polars::prelude::*;
use trafreq::pipeline::{
    canonical_keys, EncoderError, EncoderState, FrequencyEncoder, MissingColumns, NULL_KEY,
};

#[path = "common/mod.rs"]
mod common;

use common::{assert_close, assert_has_columns, assert_missing_columns, assert_shape, f64_values};

#[test]
fn test_fit_weather_example() {
    let df = common::create_weather_dataframe();
    let mut encoder = FrequencyEncoder::new("weather").unwrap();
    encoder.fit(&df).unwrap();

    let table = encoder.table("weather").expect("weather should be fit");
    assert_eq!(table.len(), 2);
    assert_close(table.get("Rain").unwrap(), 2.0 / 3.0);
    assert_close(table.get("Clear").unwrap(), 1.0 / 3.0);
}

#[test]
fn test_transform_unseen_category_is_zero() {
    let mut encoder = FrequencyEncoder::new("weather").unwrap();
    encoder.fit(&common::create_weather_dataframe()).unwrap();

    let request = df! { "weather" => ["Fog"] }.unwrap();
    let encoded = encoder.transform(&request).unwrap();

    assert_eq!(common::column_names(&encoded), vec!["weather_freq"]);
    assert_eq!(f64_values(&encoded, "weather_freq"), vec![0.0]);
}

#[test]
fn test_transform_seen_category() {
    let mut encoder = FrequencyEncoder::new("weather").unwrap();
    encoder.fit(&common::create_weather_dataframe()).unwrap();

    let request = df! { "weather" => ["Rain"] }.unwrap();
    let encoded = encoder.transform(&request).unwrap();

    assert_close(f64_values(&encoded, "weather_freq")[0], 2.0 / 3.0);
}

#[test]
fn test_frequencies_sum_to_one() {
    let df = common::create_training_dataframe();
    let mut encoder = FrequencyEncoder::new(["holiday", "weather_main", "hour"]).unwrap();
    encoder.fit(&df).unwrap();

    for column in encoder.columns() {
        let table = encoder.table(column).unwrap();
        assert_close(table.total(), 1.0);
        assert_eq!(table.observations(), 10);
    }
}

#[test]
fn test_frequencies_sum_to_one_large() {
    let df = common::create_large_categorical_dataframe(5_000, 37);
    let mut encoder = FrequencyEncoder::new(vec!["label", "code"]).unwrap();
    encoder.fit(&df).unwrap();

    assert_close(encoder.table("label").unwrap().total(), 1.0);
    assert_close(encoder.table("code").unwrap().total(), 1.0);
}

#[test]
fn test_transform_reproduces_fit_frequencies() {
    let df = common::create_training_dataframe();
    let mut encoder = FrequencyEncoder::new(["weather_main", "holiday"]).unwrap();
    let encoded = encoder.fit_transform(&df).unwrap();

    let weather = f64_values(&encoded, "weather_main_freq");
    let holiday = f64_values(&encoded, "holiday_freq");

    let weather_labels = df.column("weather_main").unwrap().str().unwrap();
    for (i, label) in weather_labels.into_iter().enumerate() {
        let expected = match label.unwrap() {
            "Clouds" => 0.5,
            "Clear" => 0.3,
            "Rain" => 0.2,
            other => panic!("unexpected label {}", other),
        };
        assert_close(weather[i], expected);
    }

    let holiday_labels = df.column("holiday").unwrap().str().unwrap();
    for (i, label) in holiday_labels.into_iter().enumerate() {
        let expected = if label == Some("None") { 0.8 } else { 0.2 };
        assert_close(holiday[i], expected);
    }
}

#[test]
fn test_transform_replaces_columns_in_place() {
    let df = common::create_training_dataframe();
    let mut encoder = FrequencyEncoder::new(["weather_main", "holiday"]).unwrap();
    let encoded = encoder.fit_transform(&df).unwrap();

    assert_shape(&encoded, 10, 4);
    assert_eq!(
        common::column_names(&encoded),
        vec!["holiday_freq", "temp", "weather_main_freq", "hour"]
    );
    assert_missing_columns(&encoded, &["holiday", "weather_main"]);
    assert_has_columns(&encoded, &["holiday_freq", "weather_main_freq"]);
}

#[test]
fn test_transform_keeps_other_columns_and_rows() {
    let df = common::create_training_dataframe();
    let mut encoder = FrequencyEncoder::new("weather_main").unwrap();
    let encoded = encoder.fit_transform(&df).unwrap();

    for name in ["temp", "hour"] {
        let before = df.column(name).unwrap().as_materialized_series();
        let after = encoded.column(name).unwrap().as_materialized_series();
        assert!(after.equals(before), "Column '{}' should be unchanged", name);
    }
    assert_eq!(encoded.height(), df.height());
}

#[test]
fn test_transform_does_not_mutate_input() {
    let df = common::create_training_dataframe();
    let before = df.clone();
    let mut encoder = FrequencyEncoder::new("holiday").unwrap();
    encoder.fit(&df).unwrap();
    let _ = encoder.transform(&df).unwrap();

    assert!(df.equals(&before), "Input DataFrame must be left untouched");
}

#[test]
fn test_encoded_column_is_float_without_nulls() {
    let mut encoder = FrequencyEncoder::new("weather").unwrap();
    encoder.fit(&common::create_weather_dataframe()).unwrap();

    let request = df! { "weather" => [Some("Rain"), None, Some("Snow")] }.unwrap();
    let encoded = encoder.transform(&request).unwrap();
    let column = encoded.column("weather_freq").unwrap();

    assert_eq!(column.dtype(), &DataType::Float64);
    assert_eq!(column.null_count(), 0);
    assert!(f64_values(&encoded, "weather_freq").iter().all(|v| v.is_finite()));
}

#[test]
fn test_transform_is_idempotent() {
    let df = common::create_training_dataframe();
    let mut encoder = FrequencyEncoder::new(["weather_main", "hour"]).unwrap();
    encoder.fit(&df).unwrap();

    let first = encoder.transform(&df).unwrap();
    let second = encoder.transform(&df).unwrap();

    assert!(first.equals(&second));
}

#[test]
fn test_unfit_transform_is_all_zero() {
    let encoder = FrequencyEncoder::new(["weather_main", "holiday"]).unwrap();
    assert_eq!(encoder.state(), EncoderState::Unfit);
    assert!(!encoder.is_fit());

    let encoded = encoder.transform(&common::create_training_dataframe()).unwrap();

    assert!(f64_values(&encoded, "weather_main_freq").iter().all(|v| *v == 0.0));
    assert!(f64_values(&encoded, "holiday_freq").iter().all(|v| *v == 0.0));
}

#[test]
fn test_fit_moves_state_to_fit() {
    let mut encoder = FrequencyEncoder::new("weather").unwrap();
    encoder.fit(&common::create_weather_dataframe()).unwrap();

    assert_eq!(encoder.state(), EncoderState::Fit);
    assert!(encoder.frequency_map().is_some());
}

#[test]
fn test_fit_returns_encoder_for_chaining() {
    let df = common::create_weather_dataframe();
    let mut encoder = FrequencyEncoder::new("weather").unwrap();

    let encoded = encoder.fit(&df).unwrap().transform(&df).unwrap();

    assert_eq!(encoded.height(), 3);
}

#[test]
fn test_refit_discards_previous_frequencies() {
    let mut encoder = FrequencyEncoder::new("weather").unwrap();
    encoder.fit(&common::create_weather_dataframe()).unwrap();

    let second = df! { "weather" => ["Snow", "Fog", "Snow", "Snow"] }.unwrap();
    encoder.fit(&second).unwrap();

    let table = encoder.table("weather").unwrap();
    assert_eq!(table.get("Rain"), None, "Stale category must not survive a refit");
    assert_eq!(table.get("Clear"), None);
    assert_close(table.get("Snow").unwrap(), 0.75);
    assert_close(table.get("Fog").unwrap(), 0.25);
    assert_eq!(encoder.frequency("weather", "Rain"), 0.0);
}

#[test]
fn test_fit_missing_column_names_it() {
    let mut encoder = FrequencyEncoder::new(["weather_main", "visibility"]).unwrap();
    let err = encoder.fit(&common::create_training_dataframe()).unwrap_err();

    assert!(
        err.to_string().contains("visibility"),
        "Error should name the missing column: {}",
        err
    );
    match err {
        EncoderError::MissingColumn { column } => assert_eq!(column, "visibility"),
        other => panic!("Expected MissingColumn, got {:?}", other),
    }
}

#[test]
fn test_failed_fit_keeps_previous_state() {
    let mut encoder = FrequencyEncoder::new("weather").unwrap();
    encoder.fit(&common::create_weather_dataframe()).unwrap();
    let before = encoder.clone();

    let wrong = df! { "other" => ["x"] }.unwrap();
    assert!(encoder.fit(&wrong).is_err());

    assert_eq!(encoder, before);
    assert_close(encoder.frequency("weather", "Rain"), 2.0 / 3.0);
}

#[test]
fn test_failed_first_fit_stays_unfit() {
    let mut encoder = FrequencyEncoder::new("weather").unwrap();
    let wrong = df! { "other" => ["x"] }.unwrap();

    assert!(encoder.fit(&wrong).is_err());
    assert_eq!(encoder.state(), EncoderState::Unfit);
}

#[test]
fn test_transform_missing_column_errors_by_default() {
    let mut encoder = FrequencyEncoder::new(["weather", "holiday"]).unwrap();
    encoder
        .fit(&df! { "weather" => ["Rain"], "holiday" => ["None"] }.unwrap())
        .unwrap();

    let request = df! { "weather" => ["Rain"] }.unwrap();
    let err = encoder.transform(&request).unwrap_err();

    assert!(matches!(err, EncoderError::MissingColumn { ref column } if column == "holiday"));
}

#[test]
fn test_transform_missing_column_skipped_with_policy() {
    let mut encoder = FrequencyEncoder::new(["weather", "holiday"])
        .unwrap()
        .with_missing_columns(MissingColumns::Skip);
    encoder
        .fit(&df! { "weather" => ["Rain"], "holiday" => ["None"] }.unwrap())
        .unwrap();

    let request = df! { "weather" => ["Rain"], "hour" => [8i32] }.unwrap();
    let encoded = encoder.transform(&request).unwrap();

    assert_eq!(common::column_names(&encoded), vec!["weather_freq", "hour"]);
    assert_missing_columns(&encoded, &["holiday", "holiday_freq"]);
    assert_eq!(f64_values(&encoded, "weather_freq"), vec![1.0]);
}

#[test]
fn test_no_target_columns_rejected() {
    let result = FrequencyEncoder::new(Vec::<String>::new());
    assert!(matches!(result, Err(EncoderError::NoTargetColumns)));
}

#[test]
fn test_single_name_and_list_construction_match() {
    let single = FrequencyEncoder::new("weather").unwrap();
    let list = FrequencyEncoder::new(vec!["weather".to_string()]).unwrap();

    assert_eq!(single.columns(), list.columns());
}

#[test]
fn test_column_order_preserved() {
    let encoder = FrequencyEncoder::new(["b", "a", "c"]).unwrap();
    assert_eq!(encoder.columns(), &["b", "a", "c"]);
}

#[test]
fn test_integer_and_float_categories_collapse() {
    let train = df! { "hour" => [8i64, 8, 17, 17] }.unwrap();
    let mut encoder = FrequencyEncoder::new("hour").unwrap();
    encoder.fit(&train).unwrap();

    let request = df! { "hour" => [8.0f64, 17.0, 9.0] }.unwrap();
    let encoded = encoder.transform(&request).unwrap();

    assert_eq!(f64_values(&encoded, "hour_freq"), vec![0.5, 0.5, 0.0]);
}

#[test]
fn test_string_and_integer_categories_match() {
    let train = df! { "hour" => ["8", "8", "9", "10"] }.unwrap();
    let mut encoder = FrequencyEncoder::new("hour").unwrap();
    encoder.fit(&train).unwrap();

    let request = df! { "hour" => [8i32, 10] }.unwrap();
    let encoded = encoder.transform(&request).unwrap();

    assert_eq!(f64_values(&encoded, "hour_freq"), vec![0.5, 0.25]);
}

#[test]
fn test_nulls_form_their_own_category() {
    let train = df! { "holiday" => [Some("None"), None, None, Some("Labor Day")] }.unwrap();
    let mut encoder = FrequencyEncoder::new("holiday").unwrap();
    encoder.fit(&train).unwrap();

    assert_eq!(encoder.frequency("holiday", NULL_KEY), 0.5);

    let request = df! { "holiday" => [None::<&str>] }.unwrap();
    let encoded = encoder.transform(&request).unwrap();
    assert_eq!(f64_values(&encoded, "holiday_freq"), vec![0.5]);
}

#[test]
fn test_boolean_categories() {
    let train = df! { "is_weekend" => [true, false, false, false] }.unwrap();
    let mut encoder = FrequencyEncoder::new("is_weekend").unwrap();
    encoder.fit(&train).unwrap();

    assert_eq!(encoder.frequency("is_weekend", "true"), 0.25);
    assert_eq!(encoder.frequency("is_weekend", "false"), 0.75);
}

#[test]
fn test_categorical_dtype_keys_by_label() {
    let weather = Column::new("weather".into(), ["Rain", "Rain", "Clear", "Snow"])
        .cast(&DataType::Categorical(None, Default::default()))
        .unwrap();
    let train = DataFrame::new(vec![weather]).unwrap();

    let mut encoder = FrequencyEncoder::new("weather").unwrap();
    encoder.fit(&train).unwrap();

    let request = df! { "weather" => ["Rain", "Snow"] }.unwrap();
    let encoded = encoder.transform(&request).unwrap();

    assert_eq!(f64_values(&encoded, "weather_freq"), vec![0.5, 0.25]);
}

#[test]
fn test_empty_fit_dataset() {
    let train = df! { "weather" => Vec::<&str>::new() }.unwrap();
    let mut encoder = FrequencyEncoder::new("weather").unwrap();
    encoder.fit(&train).unwrap();

    assert!(encoder.is_fit());
    assert!(encoder.table("weather").unwrap().is_empty());

    let request = df! { "weather" => ["Rain"] }.unwrap();
    let encoded = encoder.transform(&request).unwrap();
    assert_eq!(f64_values(&encoded, "weather_freq"), vec![0.0]);
}

#[test]
fn test_empty_transform_dataset() {
    let mut encoder = FrequencyEncoder::new("weather").unwrap();
    encoder.fit(&common::create_weather_dataframe()).unwrap();

    let request = df! { "weather" => Vec::<&str>::new(), "hour" => Vec::<i32>::new() }.unwrap();
    let encoded = encoder.transform(&request).unwrap();

    assert_shape(&encoded, 0, 2);
    assert_eq!(common::column_names(&encoded), vec!["weather_freq", "hour"]);
}

#[test]
fn test_list_values_fail_normalization() {
    let values = Series::new("tags".into(), [1i32, 2, 3]);
    let list = Series::new("tags".into(), [values.clone(), values]);
    let df = DataFrame::new(vec![list.into_column()]).unwrap();

    let mut encoder = FrequencyEncoder::new("tags").unwrap();
    let err = encoder.fit(&df).unwrap_err();

    match err {
        EncoderError::Normalization { column, .. } => assert_eq!(column, "tags"),
        other => panic!("Expected Normalization, got {:?}", other),
    }
}

#[test]
fn test_existing_freq_column_conflicts() {
    let df = df! {
        "weather" => ["Rain"],
        "weather_freq" => [0.3f64],
    }
    .unwrap();

    let encoder = FrequencyEncoder::new("weather").unwrap();
    assert!(matches!(encoder.transform(&df), Err(EncoderError::Polars(_))));
}

#[test]
fn test_canonical_keys_temporal_column() {
    // Days since the Unix epoch for 2024-05-01 and 2024-05-02
    let day = Column::new("day".into(), [19844i32, 19845])
        .cast(&DataType::Date)
        .unwrap();

    let keys = canonical_keys(&day).unwrap();
    assert_eq!(keys, vec!["2024-05-01", "2024-05-02"]);
}

#[test]
fn test_encoder_shared_across_threads() {
    let mut encoder = FrequencyEncoder::new("weather").unwrap();
    encoder.fit(&common::create_weather_dataframe()).unwrap();
    let encoder = std::sync::Arc::new(encoder);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let encoder = std::sync::Arc::clone(&encoder);
            std::thread::spawn(move || {
                let request = df! { "weather" => ["Rain", "Clear", "Fog"] }.unwrap();
                f64_values(&encoder.transform(&request).unwrap(), "weather_freq")
            })
        })
        .collect();

    for handle in handles {
        let values = handle.join().unwrap();
        assert_close(values[0], 2.0 / 3.0);
        assert_close(values[1], 1.0 / 3.0);
        assert_eq!(values[2], 0.0);
    }
}
