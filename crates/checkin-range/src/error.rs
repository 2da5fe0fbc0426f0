//! Error types for checkin-range operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Unknown range: {0}")]
    UnknownRange(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RangeError>;
