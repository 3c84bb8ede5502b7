//! Request context rows for hourly traffic volume scoring
//!
//! A single request (date, hour, holiday and weather inputs) is scored for
//! three consecutive hours: the hour before, the selected hour and the hour
//! after. This module derives the calendar features of each of those hours
//! and assembles them into the DataFrame the scoring pipeline consumes.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while building request context rows
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Raw inputs of one scoring request
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficConditions {
    pub date: NaiveDate,
    /// Hour of day, 0-23
    pub hour: u32,
    pub holiday: String,
    pub temp_celsius: f64,
    /// Rain over the hour, mm
    pub rain_mm: f64,
    /// Snow over the hour, mm
    pub snow_mm: f64,
    /// Cloud cover, percent
    pub clouds_pct: u32,
    /// Main weather label, e.g. "Clear", "Rain"
    pub weather: String,
}

impl TrafficConditions {
    /// Conditions for `date` at `hour` with a dry, mild, half-cloudy,
    /// non-holiday default.
    pub fn new(date: NaiveDate, hour: u32) -> Self {
        Self {
            date,
            hour,
            holiday: "None".to_string(),
            temp_celsius: 15.0,
            rain_mm: 0.0,
            snow_mm: 0.0,
            clouds_pct: 50,
            weather: "Clear".to_string(),
        }
    }

    /// Check ranges. A NaN temperature is accepted and categorized as unknown.
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.hour > 23 {
            return Err(ContextError::InvalidInput(format!(
                "hour must be between 0 and 23, got {}",
                self.hour
            )));
        }
        if self.clouds_pct > 100 {
            return Err(ContextError::InvalidInput(format!(
                "cloud cover must be between 0 and 100%, got {}",
                self.clouds_pct
            )));
        }
        if !self.rain_mm.is_finite() || self.rain_mm < 0.0 {
            return Err(ContextError::InvalidInput(format!(
                "rain must be a non-negative amount, got {}",
                self.rain_mm
            )));
        }
        if !self.snow_mm.is_finite() || self.snow_mm < 0.0 {
            return Err(ContextError::InvalidInput(format!(
                "snow must be a non-negative amount, got {}",
                self.snow_mm
            )));
        }
        Ok(())
    }

    /// Timestamp of the selected hour
    pub fn base_timestamp(&self) -> Result<NaiveDateTime, ContextError> {
        let time = NaiveTime::from_hms_opt(self.hour, 0, 0).ok_or_else(|| {
            ContextError::InvalidInput(format!("hour must be between 0 and 23, got {}", self.hour))
        })?;
        Ok(NaiveDateTime::new(self.date, time))
    }

    pub fn is_precipitating(&self) -> bool {
        self.rain_mm + self.snow_mm > 0.0
    }
}

/// Traffic period of an hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakPeriod {
    MorningPeak,
    EveningPeak,
    OffPeak,
}

impl PeakPeriod {
    /// 07:00-09:59 is the morning peak, 16:00-18:59 the evening peak.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            7..=9 => PeakPeriod::MorningPeak,
            16..=18 => PeakPeriod::EveningPeak,
            _ => PeakPeriod::OffPeak,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeakPeriod::MorningPeak => "morning_peak",
            PeakPeriod::EveningPeak => "evening_peak",
            PeakPeriod::OffPeak => "off_peak",
        }
    }
}

/// Meteorological season (northern hemisphere)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

/// Temperature band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TempCategory {
    Freezing,
    Cold,
    Mild,
    Hot,
    Unknown,
}

impl TempCategory {
    /// Below 0 freezing, [0, 15) cold, [15, 25) mild, 25 and above hot.
    pub fn from_celsius(temp: f64) -> Self {
        if temp.is_nan() {
            TempCategory::Unknown
        } else if temp < 0.0 {
            TempCategory::Freezing
        } else if temp < 15.0 {
            TempCategory::Cold
        } else if temp < 25.0 {
            TempCategory::Mild
        } else {
            TempCategory::Hot
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TempCategory::Freezing => "freezing",
            TempCategory::Cold => "cold",
            TempCategory::Mild => "mild",
            TempCategory::Hot => "hot",
            TempCategory::Unknown => "unknown",
        }
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display_as_str!(PeakPeriod, Season, TempCategory, HourContext);

/// Position of a row relative to the selected hour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourContext {
    Previous,
    Selected,
    Next,
}

impl HourContext {
    pub fn offset_hours(&self) -> i64 {
        match self {
            HourContext::Previous => -1,
            HourContext::Selected => 0,
            HourContext::Next => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HourContext::Previous => "previous",
            HourContext::Selected => "selected",
            HourContext::Next => "next",
        }
    }
}

/// Timestamps of the previous, selected and next hour, in that order
pub fn context_timestamps(
    conditions: &TrafficConditions,
) -> Result<[(HourContext, NaiveDateTime); 3], ContextError> {
    conditions.validate()?;
    let base = conditions.base_timestamp()?;

    let shift = |context: HourContext| -> Result<(HourContext, NaiveDateTime), ContextError> {
        base.checked_add_signed(Duration::hours(context.offset_hours()))
            .map(|ts| (context, ts))
            .ok_or_else(|| {
                ContextError::InvalidInput(format!("{} is out of the supported date range", base))
            })
    };

    Ok([
        shift(HourContext::Previous)?,
        shift(HourContext::Selected)?,
        shift(HourContext::Next)?,
    ])
}

/// Model features of one hour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub holiday: String,
    pub temp: f64,
    pub rain_1h: f64,
    pub snow_1h: f64,
    pub clouds_all: i32,
    pub weather_main: String,
    pub hour: i32,
    /// Monday = 0
    pub day_of_week: i32,
    pub month: i32,
    pub year: i32,
    pub is_weekend: i32,
    pub peak_hour: PeakPeriod,
    pub season: Season,
    pub is_precipitating: i32,
    pub temp_category: TempCategory,
}

impl FeatureRow {
    /// Derive the features of `timestamp` under `conditions`.
    ///
    /// The weather and holiday inputs are applied unchanged to every hour;
    /// only the calendar features follow the timestamp.
    pub fn derive(conditions: &TrafficConditions, timestamp: NaiveDateTime) -> Self {
        let weekday = timestamp.weekday();
        let month = timestamp.month();

        Self {
            holiday: conditions.holiday.clone(),
            temp: conditions.temp_celsius,
            rain_1h: conditions.rain_mm,
            snow_1h: conditions.snow_mm,
            clouds_all: conditions.clouds_pct as i32,
            weather_main: conditions.weather.clone(),
            hour: timestamp.hour() as i32,
            day_of_week: weekday.num_days_from_monday() as i32,
            month: month as i32,
            year: timestamp.year(),
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun) as i32,
            peak_hour: PeakPeriod::from_hour(timestamp.hour()),
            season: Season::from_month(month),
            is_precipitating: conditions.is_precipitating() as i32,
            temp_category: TempCategory::from_celsius(conditions.temp_celsius),
        }
    }
}

/// Column order of the context frame
pub const FEATURE_COLUMNS: [&str; 15] = [
    "holiday",
    "temp",
    "rain_1h",
    "snow_1h",
    "clouds_all",
    "weather_main",
    "hour",
    "day_of_week",
    "month",
    "year",
    "is_weekend",
    "peak_hour",
    "season",
    "is_precipitating",
    "temp_category",
];

/// Feature rows of the previous, selected and next hour
pub fn build_context_rows(conditions: &TrafficConditions) -> Result<Vec<FeatureRow>, ContextError> {
    Ok(context_timestamps(conditions)?
        .iter()
        .map(|(_, ts)| FeatureRow::derive(conditions, *ts))
        .collect())
}

/// Three-row DataFrame (previous, selected, next hour) with [`FEATURE_COLUMNS`]
pub fn build_context_frame(conditions: &TrafficConditions) -> Result<DataFrame, ContextError> {
    let rows = build_context_rows(conditions)?;
    rows_to_frame(&rows)
}

/// Assemble feature rows into a DataFrame, one row per entry.
pub fn rows_to_frame(rows: &[FeatureRow]) -> Result<DataFrame, ContextError> {
    let df = df! {
        "holiday" => rows.iter().map(|r| r.holiday.as_str()).collect::<Vec<_>>(),
        "temp" => rows.iter().map(|r| r.temp).collect::<Vec<_>>(),
        "rain_1h" => rows.iter().map(|r| r.rain_1h).collect::<Vec<_>>(),
        "snow_1h" => rows.iter().map(|r| r.snow_1h).collect::<Vec<_>>(),
        "clouds_all" => rows.iter().map(|r| r.clouds_all).collect::<Vec<_>>(),
        "weather_main" => rows.iter().map(|r| r.weather_main.as_str()).collect::<Vec<_>>(),
        "hour" => rows.iter().map(|r| r.hour).collect::<Vec<_>>(),
        "day_of_week" => rows.iter().map(|r| r.day_of_week).collect::<Vec<_>>(),
        "month" => rows.iter().map(|r| r.month).collect::<Vec<_>>(),
        "year" => rows.iter().map(|r| r.year).collect::<Vec<_>>(),
        "is_weekend" => rows.iter().map(|r| r.is_weekend).collect::<Vec<_>>(),
        "peak_hour" => rows.iter().map(|r| r.peak_hour.as_str()).collect::<Vec<_>>(),
        "season" => rows.iter().map(|r| r.season.as_str()).collect::<Vec<_>>(),
        "is_precipitating" => rows.iter().map(|r| r.is_precipitating).collect::<Vec<_>>(),
        "temp_category" => rows.iter().map(|r| r.temp_category.as_str()).collect::<Vec<_>>(),
    }?;
    Ok(df)
}
