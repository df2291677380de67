/// Error types for the countdown timer
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for countdown operations
pub type Result<T> = std::result::Result<T, CountdownError>;

/// Every failure here is fatal: the binary reports it and exits.
#[derive(Error, Debug)]
pub enum CountdownError {
    #[error("invalid duration '{input}'")]
    MalformedDuration {
        input: String,
        #[source]
        source: DurationError,
    },

    #[error("--unit cannot be used with time strings like '{input}'")]
    ConflictingUnitSpecification { input: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("clearing the screen is not supported on {0}")]
    #[cfg_attr(any(unix, windows), allow(dead_code))]
    UnsupportedPlatform(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

/// Why a duration expression was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("missing number before '{0}'")]
    MissingNumber(char),

    #[error("invalid character: '{0}'")]
    InvalidCharacter(char),

    #[error("time string must end with a unit (d/h/m/s)")]
    MissingUnit,

    #[error("time must be greater than zero")]
    Zero,

    #[error("duration is too large")]
    Overflow,
}

impl CountdownError {
    pub(crate) fn malformed(input: &str, source: DurationError) -> Self {
        CountdownError::MalformedDuration {
            input: input.to_string(),
            source,
        }
    }
}
