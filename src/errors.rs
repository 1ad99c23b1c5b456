//! Error types shared by the scrape and seed pipelines.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A network or HTTP failure for a single URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// The URL that could not be fetched.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. } | FetchError::Status { url, .. } => url,
        }
    }
}

/// Raised when a CSS selector cannot be compiled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to write image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("the file {0} was not found")]
    NotFound(PathBuf),
    #[error("the file {path} is not a valid JSON file: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {key} has an invalid value `{value}`")]
    Invalid { key: &'static str, value: String },
}

/// Failures that abort a seeding run.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("csv export error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to encode product fields: {0}")]
    Encode(#[from] serde_json::Error),
}
