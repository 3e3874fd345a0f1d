//! Raw forecast series as published for one grid cell

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{ConditionSample, GridCell};

/// Numeric fields published per grid cell
///
/// Serde names are the keys used in the gridpoint document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Temperature,
    Dewpoint,
    RelativeHumidity,
    ApparentTemperature,
    WindDirection,
    WindSpeed,
    WindGust,
    ProbabilityOfPrecipitation,
    QuantitativePrecipitation,
    Visibility,
}

impl FieldName {
    /// Every field the fetcher looks for, in output order
    pub const ALL: [FieldName; 10] = [
        FieldName::Temperature,
        FieldName::Dewpoint,
        FieldName::RelativeHumidity,
        FieldName::ApparentTemperature,
        FieldName::WindDirection,
        FieldName::WindSpeed,
        FieldName::WindGust,
        FieldName::ProbabilityOfPrecipitation,
        FieldName::QuantitativePrecipitation,
        FieldName::Visibility,
    ];

    /// Key of this field inside the gridpoint `properties` object
    #[must_use]
    pub fn api_key(self) -> &'static str {
        match self {
            FieldName::Temperature => "temperature",
            FieldName::Dewpoint => "dewpoint",
            FieldName::RelativeHumidity => "relativeHumidity",
            FieldName::ApparentTemperature => "apparentTemperature",
            FieldName::WindDirection => "windDirection",
            FieldName::WindSpeed => "windSpeed",
            FieldName::WindGust => "windGust",
            FieldName::ProbabilityOfPrecipitation => "probabilityOfPrecipitation",
            FieldName::QuantitativePrecipitation => "quantitativePrecipitation",
            FieldName::Visibility => "visibility",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_key())
    }
}

/// One value asserted to hold over `[valid_from, valid_from + valid_duration)`
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub valid_from: DateTime<Utc>,
    pub valid_duration: TimeDelta,
    pub value: f64,
}

impl Sample {
    #[must_use]
    pub fn new(valid_from: DateTime<Utc>, valid_duration: TimeDelta, value: f64) -> Self {
        Self {
            valid_from,
            valid_duration,
            value,
        }
    }

    /// Exclusive end of the validity interval
    #[must_use]
    pub fn valid_until(&self) -> DateTime<Utc> {
        self.valid_from + self.valid_duration
    }
}

/// A field's samples together with the series-wide unit tag
///
/// Samples are ordered by `valid_from` but may overlap or leave gaps. The unit
/// tag is kept verbatim; it is resolved when the series is normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSeries {
    pub field: FieldName,
    pub unit: String,
    pub samples: Vec<Sample>,
}

impl MeasurementSeries {
    #[must_use]
    pub fn new<U: Into<String>>(field: FieldName, unit: U, samples: Vec<Sample>) -> Self {
        Self {
            field,
            unit: unit.into(),
            samples,
        }
    }
}

/// Everything fetched for one grid cell, consumed by the normalizer
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecastBundle {
    pub cell: GridCell,
    pub series: BTreeMap<FieldName, MeasurementSeries>,
    pub conditions: Vec<ConditionSample>,
}

impl RawForecastBundle {
    #[must_use]
    pub fn new(cell: GridCell) -> Self {
        Self {
            cell,
            series: BTreeMap::new(),
            conditions: Vec::new(),
        }
    }

    /// Add or replace the series for its field
    pub fn insert_series(&mut self, series: MeasurementSeries) {
        self.series.insert(series.field, series);
    }

    /// Total number of numeric samples across all series
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.series.values().map(|s| s.samples.len()).sum()
    }
}
