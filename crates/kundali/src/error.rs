use crate::vedic::graha::Graha;
use thiserror::Error;

/// Problems with the caller's request, detected before any computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl RequestError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        RequestError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by a zone lookup. Always recovered by falling back to UTC.
#[derive(Error, Debug)]
pub enum TimezoneError {
    #[error("Failed to run zone lookup '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Zone lookup '{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("No time zone found for ({latitude}, {longitude})")]
    NotFound { latitude: f64, longitude: f64 },
}

/// Errors that can occur while querying an ephemeris backend.
#[derive(Error, Debug)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("No position available for {graha:?}")]
    MissingBody { graha: Graha },
    #[error("Failed to calculate position for {graha:?} at {instant}: {message}")]
    CalculationFailed {
        graha: Graha,
        instant: chrono::DateTime<chrono::Utc>,
        message: String,
    },
    #[error("Ascendant calculation failed: {message}")]
    AscendantFailed { message: String },
    #[error("{what} is not supported by this ephemeris")]
    Unsupported { what: &'static str },
    #[error("Failed to parse ephemeris table: {message}")]
    Parse { message: String },
}

/// Errors produced while assembling a chart.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error("Invalid moment: {0}")]
    InvalidMoment(String),
    #[error("Derived value out of range: {0}")]
    Derivation(String),
    #[error("Failed to serialise chart: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ChartError {
    /// True when the caller is at fault and should see the details.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ChartError::Request(_))
    }
}
