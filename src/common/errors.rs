//! Error types for the application

use thiserror::Error;

/// Result type alias using our ScanError
pub type Result<T> = std::result::Result<T, ScanError>;

/// Main error type for scan operations
#[derive(Error, Debug)]
pub enum ScanError {
    /// Network-level fetch failures (connect, TLS, timeout)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status code
    #[error("Upstream status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// No table matching the expected columns, or a broken page layout
    #[error("Table parse error: {0}")]
    Parse(String),

    /// Notification could not be delivered
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Seen-set storage could not be written
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

/// Why a single parsed row was skipped
///
/// Row-level rejections never abort a scan cycle; the row is dropped and
/// the rest of the batch continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    /// The selected table did not expose a column the record needs
    #[error("missing column: {0}")]
    MissingColumn(&'static str),

    /// Ticker failed the validity check (ad/footer artifact rows)
    #[error("invalid ticker: {0:?}")]
    InvalidTicker(String),

    /// A numeric field did not survive coercion
    #[error("unparseable number in {field}: {raw:?}")]
    BadNumber { field: &'static str, raw: String },

    /// A date field did not survive coercion
    #[error("unparseable date in {field}: {raw:?}")]
    BadDate { field: &'static str, raw: String },
}
