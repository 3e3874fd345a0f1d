//! Normalized forecast model handed to display frontends

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{Condition, Coordinate, WeatherCode};
use crate::error::ForecastError;

/// Length of each output period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Hour,
    Day,
}

impl Granularity {
    #[must_use]
    pub fn period_length(self) -> TimeDelta {
        match self {
            Granularity::Hour => TimeDelta::hours(1),
            Granularity::Day => TimeDelta::days(1),
        }
    }
}

impl FromStr for Granularity {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" | "hourly" => Ok(Granularity::Hour),
            "day" | "daily" => Ok(Granularity::Day),
            other => Err(ForecastError::config(format!(
                "Invalid granularity '{other}'. Must be one of: hour, day"
            ))),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Hour => f.write_str("hour"),
            Granularity::Day => f.write_str("day"),
        }
    }
}

/// One aligned output period; `None` means no data, never zero
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Dewpoint in Celsius
    pub dewpoint: Option<f64>,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
    /// Apparent temperature in Celsius
    pub feels_like: Option<f64>,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: Option<f64>,
    /// Wind speed in m/s
    pub wind_speed: Option<f64>,
    /// Wind gust speed in m/s
    pub wind_gust: Option<f64>,
    /// Probability of precipitation in percent
    pub precip_probability: Option<f64>,
    /// Precipitation accumulated over the period in mm
    pub precip_amount: Option<f64>,
    /// Visibility in metres
    pub visibility: Option<f64>,
    pub condition: Option<Condition>,
    /// Display code of `condition`
    pub weather_code: Option<WeatherCode>,
    /// Text of `condition`, e.g. "Chance Light Rain Showers"
    pub description: Option<String>,
}

impl ForecastPeriod {
    /// An empty shell covering `[start, end)`
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            temperature: None,
            dewpoint: None,
            humidity: None,
            feels_like: None,
            wind_direction: None,
            wind_speed: None,
            wind_gust: None,
            precip_probability: None,
            precip_amount: None,
            visibility: None,
            condition: None,
            weather_code: None,
            description: None,
        }
    }

    /// Set the condition together with its display code and text
    pub fn set_condition(&mut self, condition: Option<Condition>) {
        self.weather_code = condition.map(|c| c.weather_code());
        self.description = condition.map(|c| c.description());
        self.condition = condition;
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// True when no field carries data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.dewpoint.is_none()
            && self.humidity.is_none()
            && self.feels_like.is_none()
            && self.wind_direction.is_none()
            && self.wind_speed.is_none()
            && self.wind_gust.is_none()
            && self.precip_probability.is_none()
            && self.precip_amount.is_none()
            && self.visibility.is_none()
            && self.condition.is_none()
    }
}

/// Sunrise and sunset for a forecast day, absent during polar day or night
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Astronomy {
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

/// Periods whose start falls on one UTC calendar date
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub astronomy: Astronomy,
    pub periods: Vec<ForecastPeriod>,
}

/// Final multi-day forecast
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Forecast {
    /// Location exactly as requested
    pub location: Coordinate,
    /// Days in chronological order
    pub days: Vec<ForecastDay>,
}

impl Forecast {
    /// Get the first forecast period
    #[must_use]
    pub fn current(&self) -> Option<&ForecastPeriod> {
        self.days.first().and_then(|day| day.periods.first())
    }

    /// Get the periods of a specific date
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> Option<&ForecastDay> {
        self.days.iter().find(|day| day.date == date)
    }

    #[must_use]
    pub fn period_count(&self) -> usize {
        self.days.iter().map(|day| day.periods.len()).sum()
    }
}
