//! Error types for the forecast pipeline

use thiserror::Error;

/// Failure reported by the HTTP transport collaborator
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Request to {url} failed: {message}")]
pub struct TransportError {
    /// URL that was being fetched
    pub url: String,
    /// Underlying network or I/O failure description
    pub message: String,
    /// Whether the transport gave up because of its own deadline
    pub timed_out: bool,
}

impl TransportError {
    pub fn new<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
            timed_out: true,
        }
    }
}

/// Main error type for a forecast fetch
///
/// Every variant is terminal for the current fetch: the caller receives either
/// a complete forecast or one of these.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Network or I/O failure, never retried by the core
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Upstream answered with a non-success HTTP status
    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    /// Response body or one of its fragments did not have the expected shape
    #[error("Decode error in {context}: {message}")]
    Decode {
        context: String,
        message: String,
        /// Raw body or offending token, kept for diagnostics
        raw: String,
    },

    /// A series carried a unit tag that is unknown or does not fit its field
    #[error("Unrecognized unit '{unit}' for field {field}")]
    Unit { field: String, unit: String },

    /// Fewer days of data than requested
    #[error("Insufficient data: requested {requested} day(s), {available} available")]
    InsufficientData { requested: usize, available: usize },

    /// Coordinate input outside the valid range or not a `lat,lon` pair
    #[error("Invalid coordinate: {message}")]
    InvalidCoordinate { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// No backend registered under the requested name
    #[error("Unknown forecast backend '{name}'")]
    UnknownBackend { name: String },
}

impl ForecastError {
    /// Create a new decode error
    pub fn decode<C: Into<String>, M: Into<String>, R: Into<String>>(
        context: C,
        message: M,
        raw: R,
    ) -> Self {
        Self::Decode {
            context: context.into(),
            message: message.into(),
            raw: raw.into(),
        }
    }

    /// Create a new unit error
    pub fn unit<F: Into<String>, U: Into<String>>(field: F, unit: U) -> Self {
        Self::Unit {
            field: field.into(),
            unit: unit.into(),
        }
    }

    /// Create a new coordinate validation error
    pub fn invalid_coordinate<S: Into<String>>(message: S) -> Self {
        Self::InvalidCoordinate {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::Transport(err) if err.timed_out => {
                "The weather service did not answer in time. Please try again later.".to_string()
            }
            ForecastError::Transport(_) => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            ForecastError::UpstreamStatus { status, .. } => {
                format!("The weather service rejected the request (HTTP {status}).")
            }
            ForecastError::Decode { context, .. } => {
                format!("The weather service sent data that could not be read ({context}).")
            }
            ForecastError::Unit { field, unit } => {
                format!("The weather service reported {field} in an unsupported unit '{unit}'.")
            }
            ForecastError::InsufficientData { .. } => {
                "Not enough forecast data is available for this location.".to_string()
            }
            ForecastError::InvalidCoordinate { message } => format!(
                "{message}. Only latitude,longitude pairs are supported, try `40.748,-73.985` for New York."
            ),
            ForecastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            ForecastError::UnknownBackend { name } => {
                format!("No forecast backend named '{name}' is available.")
            }
        }
    }
}
