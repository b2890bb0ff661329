use thiserror::Error;

/// Errors raised when a user-supplied name does not match a known value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown temperature scale '{0}'. Supported scales: Celsius, Fahrenheit, Kelvin.")]
    Scale(String),

    #[error("Unknown data source '{0}'. Supported sources: api, sensor.")]
    Source(String),
}

/// Failures of a persistence sink. These never reach the caller of
/// `set_measurements`; the recorder logs and drops them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write reading to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode reading: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to send reading to {endpoint}: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("reading endpoint {endpoint} rejected the request with status {status}")]
    Rejected { endpoint: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum StationError {
    /// Nothing has been written yet, so there is no condition to show.
    #[error("no weather data has been collected yet")]
    NoReading,

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
