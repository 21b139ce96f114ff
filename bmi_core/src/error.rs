//! Error types for the bmi_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bmi_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Raw input could not be read as a number
    #[error("{field} must be a number, got {input:?}")]
    Parse { field: &'static str, input: String },

    /// Numeric input outside the realistic physiological range
    #[error("{field} {value} is out of range; use realistic values: height 0.5-3m, weight 10-500kg")]
    Validation { field: &'static str, value: f64 },

    /// A stored row has a BMI field that is not a number
    #[error("history line {line}: BMI field {value:?} is not a number")]
    MalformedRecord { line: usize, value: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Closed set of error categories the presentation layer picks text for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Validation,
    Io,
    MalformedRecord,
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Io(_) | Error::Csv(_) => ErrorKind::Io,
            Error::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            Error::Toml(_) | Error::Config(_) | Error::Other(_) => ErrorKind::Other,
        }
    }

    /// True for errors caused by what the user typed
    pub fn is_input_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse | ErrorKind::Validation)
    }
}
