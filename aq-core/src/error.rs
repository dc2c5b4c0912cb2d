/// Error types for observation ingestion and fetching
use thiserror::Error;

/// Errors raised while turning raw records into observations.
#[derive(Error, Debug)]
pub enum ObservationError {
    /// A timestamp string matched none of the accepted layouts
    #[error("Failed to parse timestamp: {0:?}")]
    Timestamp(String),

    /// Failed to read or write CSV data
    #[error("Failed to process CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the fetch collaborator. These all mean the upstream
/// source was unavailable or answered with something unusable.
#[cfg(feature = "api")]
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Upstream answered with a non-success status and no JSON body
    #[error("Bad response status from {url}: {status}")]
    Status { url: String, status: u16 },

    /// Response body was not valid JSON
    #[error("Failed to parse response body: {0}")]
    ResponseParse(#[from] serde_json::Error),

    /// Series lengths in the response disagree
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// A timestamp in the response could not be normalized
    #[error(transparent)]
    Observation(#[from] ObservationError),
}

/// Type alias for Results using ObservationError
pub type Result<T> = std::result::Result<T, ObservationError>;
