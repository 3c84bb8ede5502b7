//! Command-line argument definitions using clap

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// trafreq - Frequency-encode categorical columns for hourly traffic volume prediction
#[derive(Parser, Debug)]
#[command(name = "trafreq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Learn category frequencies from a dataset and save the encoder as JSON
    Fit(FitArgs),

    /// Replace encoded columns of a dataset with their `<name>_freq` columns
    Transform(TransformArgs),

    /// Build the previous/selected/next hour rows for one request
    Context(ContextArgs),

    /// Show what a saved encoder has learned
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct FitArgs {
    /// Training dataset (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Columns to frequency-encode (comma-separated, order preserved)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub columns: Vec<String>,

    /// Encoder output path.
    /// Defaults to input directory with '_encoder.json' suffix (e.g., train.csv → train_encoder.json).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the encoder with a policy that skips absent target columns at transform time
    /// instead of failing
    #[arg(long, default_value = "false")]
    pub skip_missing: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Overwrite existing output without asking
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,
}

impl FitArgs {
    /// Get the encoder path, deriving it from the input if not explicitly provided.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| sibling_path(&self.input, "_encoder", "json"))
    }
}

#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Dataset to encode (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Encoder JSON written by `trafreq fit`
    #[arg(short, long)]
    pub encoder: PathBuf,

    /// Output file path (CSV or Parquet, determined by extension).
    /// Defaults to input directory with '_encoded' suffix (e.g., data.csv → data_encoded.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip target columns absent from the input, overriding the saved policy
    #[arg(long, default_value = "false")]
    pub skip_missing: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Overwrite existing output without asking
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,
}

impl TransformArgs {
    /// Get the output path, deriving it from the input if not explicitly provided.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let extension = self
                .input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("parquet")
                .to_string();
            sibling_path(&self.input, "_encoded", &extension)
        })
    }
}

#[derive(Args, Debug)]
pub struct ContextArgs {
    /// Date of the request (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Selected hour (0-23)
    #[arg(long, default_value = "12", value_parser = validate_hour)]
    pub hour: u32,

    /// Holiday name, or "None"
    #[arg(long, default_value = "None")]
    pub holiday: String,

    /// Main weather condition (e.g. Clear, Clouds, Rain, Snow, Mist)
    #[arg(long, default_value = "Clear")]
    pub weather: String,

    /// Temperature in °C (-40 to 50)
    #[arg(long, default_value = "15.0", allow_negative_numbers = true, value_parser = validate_temperature)]
    pub temp: f64,

    /// Rain over the hour in mm (0 to 100)
    #[arg(long, default_value = "0.0", value_parser = validate_rain)]
    pub rain: f64,

    /// Snow over the hour in mm (0 to 5)
    #[arg(long, default_value = "0.0", value_parser = validate_snow)]
    pub snow: f64,

    /// Cloud cover in percent (0-100)
    #[arg(long, default_value = "50", value_parser = validate_clouds)]
    pub clouds: u32,

    /// Encoder JSON to apply to the rows
    #[arg(short, long)]
    pub encoder: Option<PathBuf>,

    /// Write the rows to a CSV or Parquet file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite existing output without asking
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Encoder JSON written by `trafreq fit`
    #[arg(short, long)]
    pub encoder: PathBuf,

    /// Also list every learned category
    #[arg(long, default_value = "false")]
    pub all: bool,
}

/// Path next to `input` named `<stem><suffix>.<extension>`
fn sibling_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    parent.join(format!("{}{}.{}", stem, suffix, extension))
}

fn parse_in_range(s: &str, name: &str, min: f64, max: f64) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(min..=max).contains(&value) {
        Err(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        ))
    } else {
        Ok(value)
    }
}

/// Validator for hour parameter
fn validate_hour(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid hour", s))?;

    if value > 23 {
        Err(format!("hour must be between 0 and 23, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for clouds parameter
fn validate_clouds(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid percentage", s))?;

    if value > 100 {
        Err(format!("clouds must be between 0 and 100, got {}", value))
    } else {
        Ok(value)
    }
}

fn validate_temperature(s: &str) -> Result<f64, String> {
    parse_in_range(s, "temp", -40.0, 50.0)
}

fn validate_rain(s: &str) -> Result<f64, String> {
    parse_in_range(s, "rain", 0.0, 100.0)
}

fn validate_snow(s: &str) -> Result<f64, String> {
    parse_in_range(s, "snow", 0.0, 5.0)
}
