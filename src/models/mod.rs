//! Data models for the forecast pipeline
//!
//! - Location: validated coordinates
//! - Grid: the upstream grid cell identifier
//! - Series / Condition: raw upstream samples
//! - Forecast: normalized periods grouped by day

pub mod condition;
pub mod forecast;
pub mod grid;
pub mod location;
pub mod series;

// Re-export all public types for convenient access
pub use condition::{Condition, ConditionSample, Coverage, Intensity, Phenomenon, WeatherCode};
pub use forecast::{Astronomy, Forecast, ForecastDay, ForecastPeriod, Granularity};
pub use grid::GridCell;
pub use location::Coordinate;
pub use series::{FieldName, MeasurementSeries, RawForecastBundle, Sample};
