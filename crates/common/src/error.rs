//! Error types for Dangle
//!
//! `ProbeError` is the per-probe taxonomy. It never escapes a batch; its
//! `Display` text becomes the `error_message` of a `ProbeResult`.
//! `DangleError` covers everything around the engine (setup, I/O, config).

use std::io;
use thiserror::Error;

/// Failure points inside a single probe.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("DNS lookup failed: {0}")]
    DnsLookupFailed(String),

    #[error("HTTP request failed: {0}")]
    HttpRequestFailed(String),

    #[error("Failed to read response body: {0}")]
    BodyReadFailed(String),

    /// The probe task itself died (panicked) before producing a result.
    #[error("Probe task failed: {0}")]
    TaskFailed(String),
}

#[derive(Error, Debug)]
pub enum DangleError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Resolver error: {0}")]
    Resolver(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Dangle operations
pub type DangleResult<T> = Result<T, DangleError>;
