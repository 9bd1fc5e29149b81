//! Error types for the collection tracker

use std::fmt;

use crate::oracle::ALLOWED_SET_TYPES;

/// Unified error type for catalogue, oracle and collection operations
#[derive(Debug)]
pub enum CollectionError {
    /// HTTP request failed (network error, timeout, etc.)
    Network(reqwest::Error),
    /// Failed to parse the bulk catalogue JSON
    Parse(serde_json::Error),
    /// HTTP error status code from the bulk download
    HttpStatus(reqwest::StatusCode),
    /// File I/O error
    Io(std::io::Error),
    /// Collection CSV could not be read or written
    Csv(csv::Error),
    /// A set type outside the allowed query values was supplied to lookup
    UnknownSetType(String),
    /// Diffed collections carry different labels
    LabelMismatch { left: String, right: String },
    /// Diffed collections carry different column layouts
    LayoutMismatch { left: usize, right: usize },
    /// A collection row could not be normalized
    InvalidRow { line: u64, reason: String },
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::Network(e) => write!(f, "Network error: {}", e),
            CollectionError::Parse(e) => write!(f, "Parse error: {}", e),
            CollectionError::HttpStatus(status) => write!(f, "HTTP error: {}", status),
            CollectionError::Io(e) => write!(f, "I/O error: {}", e),
            CollectionError::Csv(e) => write!(f, "CSV error: {}", e),
            CollectionError::UnknownSetType(given) => write!(
                f,
                "Set type '{}' not recognised, allowed values are: {}",
                given,
                ALLOWED_SET_TYPES.join(", ")
            ),
            CollectionError::LabelMismatch { left, right } => {
                write!(f, "Compared collections have different labels: '{}' vs '{}'", left, right)
            }
            CollectionError::LayoutMismatch { left, right } => {
                write!(f, "Compared collections have different column layouts: {} vs {} columns", left, right)
            }
            CollectionError::InvalidRow { line, reason } => {
                write!(f, "Invalid collection row at line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for CollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectionError::Network(e) => Some(e),
            CollectionError::Parse(e) => Some(e),
            CollectionError::Io(e) => Some(e),
            CollectionError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CollectionError {
    fn from(err: reqwest::Error) -> Self {
        CollectionError::Network(err)
    }
}

impl From<serde_json::Error> for CollectionError {
    fn from(err: serde_json::Error) -> Self {
        CollectionError::Parse(err)
    }
}

impl From<std::io::Error> for CollectionError {
    fn from(err: std::io::Error) -> Self {
        CollectionError::Io(err)
    }
}

impl From<csv::Error> for CollectionError {
    fn from(err: csv::Error) -> Self {
        CollectionError::Csv(err)
    }
}

/// Result alias for collection tracker operations
pub type Result<T> = std::result::Result<T, CollectionError>;
