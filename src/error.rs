// src/error.rs

//! Unified error handling for the venue crawler.
//!
//! `AppError` covers everything that can end a run. Page and venue level
//! failures have their own types (`FetchError`, `VenueError`) because they are
//! always recovered inside a worker and only ever show up in its trace.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Results or the run log could not be written
    #[error("Failed to persist {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a persistence error for the given path.
    pub fn persistence(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error means collected results were lost.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

/// Failure of a single GET request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-success status code
    #[error("bad status {0}")]
    BadStatus(u16),

    /// DNS, connection, timeout or body read failure
    #[error("network failure: {0}")]
    Network(String),
}

impl FetchError {
    pub fn network(cause: impl fmt::Display) -> Self {
        Self::Network(cause.to_string())
    }
}

/// Recoverable failure while processing one venue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VenueError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// An expected landmark element is missing from the page
    #[error("structure mismatch at {url}: {landmark} not found")]
    StructureMismatch { url: String, landmark: String },

    #[error("unknown venue type '{0}'")]
    UnknownVenueType(String),
}

impl VenueError {
    pub fn structure(url: impl Into<String>, landmark: impl Into<String>) -> Self {
        Self::StructureMismatch {
            url: url.into(),
            landmark: landmark.into(),
        }
    }
}
