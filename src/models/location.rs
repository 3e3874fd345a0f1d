//! Coordinate model for the forecast location

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Geographic point in decimal degrees
///
/// Always within -90..=90 latitude and -180..=180 longitude.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = ForecastError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Create a validated coordinate
    pub fn new(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ForecastError::invalid_coordinate(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ForecastError::invalid_coordinate(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Format as the `lat,lon` path segment of the point-lookup endpoint
    ///
    /// Four decimals is the precision the upstream matches cells with.
    #[must_use]
    pub fn format_point_query(&self) -> String {
        format!("{:.4},{:.4}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = ForecastError;

    /// Parse coordinates from a string like "40.748,-73.985"
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = input.trim().split(',').map(str::trim).collect();

        if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
            return Err(ForecastError::invalid_coordinate(format!(
                "'{input}' is not in format 'lat,lon'"
            )));
        }

        let lat = parts[0].parse::<f64>().map_err(|_| {
            ForecastError::invalid_coordinate(format!("Invalid latitude: {}", parts[0]))
        })?;
        let lon = parts[1].parse::<f64>().map_err(|_| {
            ForecastError::invalid_coordinate(format!("Invalid longitude: {}", parts[1]))
        })?;

        if !lat.is_finite() || !lon.is_finite() {
            return Err(ForecastError::invalid_coordinate(format!(
                "'{input}' is not a finite coordinate"
            )));
        }

        Self::new(lat, lon)
    }
}
