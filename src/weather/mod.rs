//! weather.gov gridpoint backend
//!
//! A fetch is one sequential chain: point lookup, gridpoint document,
//! normalization, day grouping. Exactly two HTTP requests are made per
//! successful fetch and nothing is shared between fetches.

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::assembler::assemble;
use crate::backend::ForecastBackend;
use crate::config::GridcastConfig;
use crate::error::ForecastError;
use crate::models::{Coordinate, Forecast, Granularity};
use crate::timeline::normalize;
use crate::transport::{HttpTransport, Transport};

pub mod gridpoints;
pub mod interval;
pub mod points;

pub use gridpoints::SeriesFetcher;
pub use points::GridResolver;

/// Name the backend registers under
pub const BACKEND_NAME: &str = "weather.gov";

/// Issue one GET and return the document's `properties` object
///
/// `context` names the document in decode errors.
fn fetch_properties(transport: &dyn Transport, url: &str, context: &str) -> crate::Result<Value> {
    debug!("Requesting {}: {}", context, url);

    let response = transport.get(url)?;

    if !response.is_success() {
        return Err(ForecastError::UpstreamStatus {
            status: response.status,
            url: url.to_string(),
        });
    }

    let mut document: Value = serde_json::from_slice(&response.body)
        .map_err(|e| ForecastError::decode(context, e.to_string(), response.body_text()))?;

    match document.get_mut("properties").map(Value::take) {
        Some(properties) if properties.is_object() => Ok(properties),
        Some(_) => Err(ForecastError::decode(
            context,
            "'properties' is not an object",
            response.body_text(),
        )),
        None => Err(ForecastError::decode(
            context,
            "missing 'properties' key",
            response.body_text(),
        )),
    }
}

/// The complete weather.gov pipeline behind a [`Transport`]
pub struct WeatherGovBackend {
    transport: Box<dyn Transport>,
    base_url: String,
    granularity: Granularity,
}

impl WeatherGovBackend {
    /// Create a backend over any transport
    pub fn new<T: Transport + 'static>(transport: T, base_url: &str, granularity: Granularity) -> Self {
        Self {
            transport: Box::new(transport),
            base_url: base_url.trim_end_matches('/').to_string(),
            granularity,
        }
    }

    /// Create a backend using the HTTP transport described by `config`
    pub fn from_config(config: &GridcastConfig) -> crate::Result<Self> {
        let transport = HttpTransport::new(&config.api)?;
        Ok(Self::new(
            transport,
            &config.api.base_url,
            config.forecast.granularity,
        ))
    }

    #[must_use]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    #[must_use]
    pub fn resolver(&self) -> GridResolver<'_> {
        GridResolver::new(self.transport.as_ref(), &self.base_url)
    }

    #[must_use]
    pub fn fetcher(&self) -> SeriesFetcher<'_> {
        SeriesFetcher::new(self.transport.as_ref(), &self.base_url)
    }
}

impl ForecastBackend for WeatherGovBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    #[instrument(skip(self), fields(granularity = %self.granularity))]
    fn fetch(&self, location: Coordinate, num_days: usize) -> crate::Result<Forecast> {
        let start_time = Instant::now();

        let cell = self.resolver().resolve(&location)?;
        let bundle = self.fetcher().fetch(&cell)?;
        let periods = normalize(&bundle, self.granularity)?;
        let forecast = assemble(periods, location, num_days)?;

        info!(
            "Forecast for {} ready: {} day(s), {} period(s) in {:.3}s",
            location,
            forecast.days.len(),
            forecast.period_count(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(forecast)
    }
}
