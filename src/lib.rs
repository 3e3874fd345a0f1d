//! `gridcast` - multi-day forecasts from the weather.gov gridpoint API
//!
//! This library resolves a coordinate to its forecast grid cell, fetches the raw
//! per-field time series for that cell and merges them onto one aligned
//! timeline of hourly or daily periods, grouped into calendar days.

pub mod assembler;
pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod timeline;
pub mod transport;
pub mod units;
pub mod weather;

// Re-export core types for public API
pub use assembler::assemble;
pub use backend::{BackendRegistry, ForecastBackend};
pub use config::GridcastConfig;
pub use error::{ForecastError, TransportError};
pub use models::{
    Condition, ConditionSample, Coordinate, FieldName, Forecast, ForecastDay, ForecastPeriod,
    Granularity, GridCell, MeasurementSeries, RawForecastBundle, Sample,
};
pub use timeline::{TimelineNormalizer, normalize};
pub use transport::{HttpResponse, HttpTransport, Transport};
pub use weather::{GridResolver, SeriesFetcher, WeatherGovBackend};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ForecastError>;
