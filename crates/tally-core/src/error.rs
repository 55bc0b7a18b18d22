//! Error types for the tally-core library.

use thiserror::Error;

/// Main error type for the tally library.
#[derive(Error, Debug)]
pub enum TallyError {
    /// Field extraction failed for one receipt.
    #[error("extraction failed for {name}: {source}")]
    Extraction {
        name: String,
        #[source]
        source: ExtractionError,
    },

    /// Chart rendering error.
    #[error("chart error: {0}")]
    Chart(#[from] ChartError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while talking to the extraction service.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The environment variable holding the API key is unset or empty.
    #[error("missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    /// Transport-level failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response carried no message content.
    #[error("response contained no content")]
    EmptyResponse,

    /// The model's reply was not valid JSON.
    #[error("model reply is not valid JSON ({source}): {content}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        content: String,
    },

    /// The model's reply was JSON but not a single object.
    #[error("model reply is not a JSON object: {0}")]
    NotAnObject(String),
}

/// Errors related to chart rendering.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Failed to encode or write the image.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),

    /// Requested canvas is unusable.
    #[error("invalid chart size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Result type for the tally library.
pub type Result<T> = std::result::Result<T, TallyError>;
