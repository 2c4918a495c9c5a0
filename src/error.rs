//! Error types for the feed pipeline.
//!
//! One enum per pipeline concern. Only `LookupError` is ever recovered
//! (per-key, inside the resolver); every other kind aborts the run before
//! anything is published.

use thiserror::Error;

pub use crate::envelope::EnvelopeError;

/// Transport-level failure fetching an upstream resource.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error {status} for {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Check HTTP response status before processing the body.
pub fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Http {
            status,
            url: resp.url().to_string(),
        });
    }
    Ok(resp)
}

/// Failure decoding the match listing. Aborts the run; no partial list.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("invalid listing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("category '{category}' missing from listing data")]
    MissingCategory { category: String },
}

/// Per-key failure inside the stream resolver. Recovered as a zero-URL
/// slot; never aborts the batch.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("invalid detail JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structural failure composing an enriched match. Aborts the run.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("resolver returned {got} slots for {expected} room keys")]
    SlotMismatch { expected: usize, got: usize },
}

/// Failure sealing the enriched list. Aborts the run.
#[derive(Debug, Error)]
pub enum SealError {
    #[error("seal key must be exactly 32 bytes, got {len}")]
    KeyLength { len: usize },

    #[error("failed to serialize enriched matches: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("sealed blob is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid padding in sealed blob")]
    Padding,

    #[error("unsealed text is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Failure publishing the sealed blob. Aborts the run; retries are left
/// to the scheduler that re-invokes the pipeline.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error {status} for {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("invalid header value: {0}")]
    InvalidHeader(String),
}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for PublishError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

/// Startup configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {name}")]
    MissingSecret { name: &'static str },

    #[error("source '{src}' has no base URL configured")]
    MissingBaseUrl { src: String },

    #[error("source '{src}' has no category configured")]
    MissingCategory { src: String },

    #[error("source '{src}' has no destination gist id configured")]
    MissingDestination { src: String },

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Run-level error: any aborting failure in one pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to fetch match listing: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Enrich(#[from] EnrichError),

    #[error(transparent)]
    Seal(#[from] SealError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
