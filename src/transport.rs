//! HTTP transport used by the pipeline stages
//!
//! The core only needs "GET this URL, give me status and body". Retries,
//! caching and rate limiting belong to the [`Transport`] implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use tracing::{debug, instrument, warn};

use crate::config::ApiConfig;
use crate::error::{ForecastError, TransportError};

/// Raw HTTP answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossy, for diagnostics
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Blocking GET collaborator
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url)
    }
}

/// `reqwest` backed transport with a request timeout and user agent
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport from the API settings
    pub fn new(config: &ApiConfig) -> crate::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ForecastError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self))]
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .header("Accept", "application/geo+json")
            .send()
            .map_err(|e| to_transport_error(url, &e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| to_transport_error(url, &e))?
            .to_vec();

        let elapsed = start.elapsed();
        debug!(
            "HTTP {} with {} bytes in {:.3}s",
            status,
            body.len(),
            elapsed.as_secs_f64()
        );

        if elapsed.as_secs() > 5 {
            warn!("Slow API response: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(HttpResponse::new(status, body))
    }
}

fn to_transport_error(url: &str, err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::timeout(url, err.to_string())
    } else {
        TransportError::new(url, err.to_string())
    }
}
