//! Frequency encoding of categorical columns
//!
//! A [`FrequencyEncoder`] learns, for each target column, the share of rows
//! holding each category. `transform` then swaps every target column for a
//! `<name>_freq` column carrying those shares. Categories that were never
//! seen during `fit` encode to `0.0`.
//!
//! Values are matched through [`canonical_key`], the single normalization
//! rule shared by `fit` and `transform`.

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category key used for null values
pub const NULL_KEY: &str = "null";

/// Suffix appended to a target column name to form its encoded column
pub const FREQ_SUFFIX: &str = "_freq";

/// Errors raised while fitting or applying a frequency encoder
#[derive(Debug, Error)]
pub enum EncoderError {
    /// The encoder was constructed without any target column.
    #[error("Frequency encoder needs at least one target column")]
    NoTargetColumns,

    /// A target column is absent from the input DataFrame.
    #[error("Column '{column}' not found in DataFrame")]
    MissingColumn { column: String },

    /// A value could not be turned into a category key.
    #[error("Column '{column}' holds a value with no category key: {value}")]
    Normalization { column: String, value: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Ordered list of columns to encode.
///
/// Built from a single name or from any ordered collection of names. Order
/// is preserved and duplicates are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetColumns(Vec<String>);

impl TargetColumns {
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for TargetColumns {
    fn from(column: &str) -> Self {
        Self(vec![column.to_string()])
    }
}

impl From<String> for TargetColumns {
    fn from(column: String) -> Self {
        Self(vec![column])
    }
}

impl From<Vec<String>> for TargetColumns {
    fn from(columns: Vec<String>) -> Self {
        Self(columns)
    }
}

impl From<Vec<&str>> for TargetColumns {
    fn from(columns: Vec<&str>) -> Self {
        Self(columns.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for TargetColumns {
    fn from(columns: &[&str]) -> Self {
        Self(columns.iter().map(|c| c.to_string()).collect())
    }
}

impl From<&[String]> for TargetColumns {
    fn from(columns: &[String]) -> Self {
        Self(columns.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for TargetColumns {
    fn from(columns: [&str; N]) -> Self {
        Self(columns.iter().map(|c| c.to_string()).collect())
    }
}

/// Relative frequencies learned for one column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    /// Number of rows the table was learned from
    observations: usize,
    /// Category key -> share of rows, in [0, 1]
    frequencies: BTreeMap<String, f64>,
}

impl FrequencyTable {
    /// Count category keys and normalize the counts by the number of keys seen.
    pub fn from_keys<'a, I>(keys: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut observations = 0usize;
        for key in keys {
            *counts.entry(key.to_string()).or_insert(0) += 1;
            observations += 1;
        }

        let frequencies = counts
            .into_iter()
            .map(|(key, count)| (key, count as f64 / observations as f64))
            .collect();

        Self {
            observations,
            frequencies,
        }
    }

    /// Learned frequency for a category key, `None` if the key was never seen
    pub fn get(&self, key: &str) -> Option<f64> {
        self.frequencies.get(key).copied()
    }

    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Number of distinct categories
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.frequencies.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of all frequencies (1.0 for any non-empty table, up to rounding)
    pub fn total(&self) -> f64 {
        self.frequencies.values().sum()
    }

    /// Most frequent category. Ties resolve to the lexically smallest key.
    pub fn most_common(&self) -> Option<(&str, f64)> {
        self.iter().fold(None, |best, (key, freq)| match best {
            Some((_, best_freq)) if best_freq >= freq => best,
            _ => Some((key, freq)),
        })
    }
}

/// Learned tables keyed by target column name
pub type FrequencyMap = BTreeMap<String, FrequencyTable>;

/// Lifecycle of an encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    /// No frequencies learned yet; `transform` encodes every value as 0.0
    Unfit,
    /// Frequencies learned by the last successful `fit`
    Fit,
}

/// What `transform` does when a target column is absent from its input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingColumns {
    /// Fail with [`EncoderError::MissingColumn`], same as `fit`
    #[default]
    Error,
    /// Leave the frame as is for that column; no `_freq` column is added
    Skip,
}

/// Stateful frequency encoder for a fixed, ordered set of columns.
///
/// # Example
/// ```
/// use polars::prelude::*;
/// use trafreq::pipeline::FrequencyEncoder;
///
/// let train = df! { "weather" => ["Rain", "Rain", "Clear"] }.unwrap();
/// let mut encoder = FrequencyEncoder::new("weather").unwrap();
/// encoder.fit(&train).unwrap();
///
/// let request = df! { "weather" => ["Fog"] }.unwrap();
/// let encoded = encoder.transform(&request).unwrap();
/// assert_eq!(encoded.column("weather_freq").unwrap().f64().unwrap().get(0), Some(0.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredEncoder")]
pub struct FrequencyEncoder {
    columns: TargetColumns,
    missing_columns: MissingColumns,
    frequencies: Option<FrequencyMap>,
}

/// Serialized shape of an encoder, validated on the way in
#[derive(Deserialize)]
struct StoredEncoder {
    columns: TargetColumns,
    #[serde(default)]
    missing_columns: MissingColumns,
    #[serde(default)]
    frequencies: Option<FrequencyMap>,
}

impl TryFrom<StoredEncoder> for FrequencyEncoder {
    type Error = EncoderError;

    fn try_from(stored: StoredEncoder) -> Result<Self, Self::Error> {
        let mut encoder = FrequencyEncoder::new(stored.columns)?;
        encoder.missing_columns = stored.missing_columns;
        encoder.frequencies = stored.frequencies;
        Ok(encoder)
    }
}

impl FrequencyEncoder {
    /// Create an unfit encoder for one column or an ordered list of columns.
    pub fn new(columns: impl Into<TargetColumns>) -> Result<Self, EncoderError> {
        let columns = columns.into();
        if columns.is_empty() {
            return Err(EncoderError::NoTargetColumns);
        }

        Ok(Self {
            columns,
            missing_columns: MissingColumns::default(),
            frequencies: None,
        })
    }

    /// Set how `transform` treats target columns absent from its input.
    pub fn with_missing_columns(mut self, policy: MissingColumns) -> Self {
        self.missing_columns = policy;
        self
    }

    pub fn columns(&self) -> &[String] {
        self.columns.as_slice()
    }

    pub fn missing_columns(&self) -> MissingColumns {
        self.missing_columns
    }

    pub fn state(&self) -> EncoderState {
        if self.frequencies.is_some() {
            EncoderState::Fit
        } else {
            EncoderState::Unfit
        }
    }

    pub fn is_fit(&self) -> bool {
        self.state() == EncoderState::Fit
    }

    /// All learned tables, `None` while unfit
    pub fn frequency_map(&self) -> Option<&FrequencyMap> {
        self.frequencies.as_ref()
    }

    /// Learned table for one column
    pub fn table(&self, column: &str) -> Option<&FrequencyTable> {
        self.frequencies.as_ref()?.get(column)
    }

    /// Learned frequency of a category key; misses resolve to 0.0
    pub fn frequency(&self, column: &str, key: &str) -> f64 {
        self.table(column)
            .and_then(|table| table.get(key))
            .unwrap_or(0.0)
    }

    /// Learn category frequencies for every target column.
    ///
    /// The new tables replace all previously learned ones. If any target
    /// column is missing or holds a value without a category key, the
    /// encoder keeps its previous state.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self, EncoderError> {
        let mut learned = FrequencyMap::new();

        for name in self.columns.iter() {
            let column = find_column(df, name).ok_or_else(|| EncoderError::MissingColumn {
                column: name.clone(),
            })?;
            let keys = canonical_keys(column)?;
            let table = FrequencyTable::from_keys(keys.iter().map(String::as_str));
            learned.insert(name.clone(), table);
        }

        self.frequencies = Some(learned);
        Ok(self)
    }

    /// Replace each target column with its `<name>_freq` encoding.
    ///
    /// The encoded column takes the position of the original. Other columns
    /// and the row order are untouched, and the input frame is not modified.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame, EncoderError> {
        let mut columns: Vec<Column> = df.get_columns().to_vec();

        for name in self.columns.iter() {
            let Some(index) = df.get_column_index(name) else {
                match self.missing_columns {
                    MissingColumns::Error => {
                        return Err(EncoderError::MissingColumn {
                            column: name.clone(),
                        })
                    }
                    MissingColumns::Skip => continue,
                }
            };

            let keys = canonical_keys(&df.get_columns()[index])?;
            let table = self.table(name);
            let encoded: Vec<f64> = keys
                .iter()
                .map(|key| table.and_then(|t| t.get(key)).unwrap_or(0.0))
                .collect();

            columns[index] = Column::new(freq_column_name(name).into(), encoded);
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Fit on `df`, then encode that same frame.
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame, EncoderError> {
        self.fit(df)?;
        self.transform(df)
    }
}

/// Name of the encoded column for a target column
pub fn freq_column_name(column: &str) -> String {
    format!("{}{}", column, FREQ_SUFFIX)
}

fn find_column<'a>(df: &'a DataFrame, name: &str) -> Option<&'a Column> {
    df.get_column_index(name).map(|index| &df.get_columns()[index])
}

/// Canonical category key of a single value.
///
/// Strings map to themselves, booleans to `true`/`false`, and numbers to
/// their shortest round-trip decimal form, so `1_i64` and `1.0_f64` share
/// the key `"1"`. Null maps to [`NULL_KEY`]. Returns `None` for values that
/// have no textual category form (lists, structs, binary, ...).
pub fn canonical_key(value: &AnyValue) -> Option<String> {
    let key = match value {
        AnyValue::Null => NULL_KEY.to_string(),
        AnyValue::Boolean(v) => v.to_string(),
        AnyValue::String(v) => (*v).to_string(),
        AnyValue::StringOwned(v) => v.to_string(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        // -0.0 shares the key of 0.0
        AnyValue::Float32(v) => (if *v == 0.0 { 0.0 } else { *v }).to_string(),
        AnyValue::Float64(v) => (if *v == 0.0 { 0.0 } else { *v }).to_string(),
        _ => return None,
    };
    Some(key)
}

/// Canonical category keys for every row of a column.
///
/// Categorical, enum and temporal columns are rendered through polars'
/// string cast first, so dates key as `YYYY-MM-DD` and categoricals by
/// their label.
pub fn canonical_keys(column: &Column) -> Result<Vec<String>, EncoderError> {
    let dtype = column.dtype();

    let prepared = if dtype.is_categorical() || dtype.is_enum() || dtype.is_temporal() {
        column.cast(&DataType::String)?
    } else if dtype.is_primitive_numeric()
        || dtype.is_bool()
        || dtype.is_string()
        || matches!(dtype, DataType::Null)
    {
        column.clone()
    } else {
        if column.len() == 0 {
            return Ok(Vec::new());
        }
        let value = column
            .get(0)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| dtype.to_string());
        return Err(EncoderError::Normalization {
            column: column.name().to_string(),
            value,
        });
    };

    let series = prepared.as_materialized_series().rechunk();
    series
        .iter()
        .map(|value| {
            canonical_key(&value).ok_or_else(|| EncoderError::Normalization {
                column: column.name().to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}
