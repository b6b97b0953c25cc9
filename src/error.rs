//! Error types for boundary operations.
//!
//! The availability computations themselves are total over well-formed
//! inputs and never fail. Errors only arise where raw text enters the
//! crate: parsing ISO dates and `HH:MM` times, building a booking request,
//! and loading configuration.

use std::path::PathBuf;

/// Result type for boundary operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Error type for parsing and configuration.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid time '{value}': expected HH:MM")]
    InvalidTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid duration: {0} minutes (must be greater than zero)")]
    InvalidDuration(u32),

    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Config(#[from] toml::de::Error),
}
