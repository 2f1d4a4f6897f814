//! Construction errors.
//!
//! Editing and navigation never fail: out-of-range moves clamp, edits that
//! cannot apply are no-ops, unknown input is ignored. The only failure the
//! core reports is being asked to build a view over nonsensical terminal
//! dimensions, or configured with an option it doesn't know.

use thiserror::Error;

/// Errors produced by the editor core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A viewport was requested with no rows to show.
    #[error("viewport height must be at least one row")]
    InvalidHeight,

    /// A buffer was requested with a zero-sized terminal.
    #[error("invalid initial dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// A `set` directive named an option that doesn't exist.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// A `set` directive gave an option a value it can't take.
    #[error("invalid value for {name}: {value}")]
    InvalidOptionValue { name: String, value: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_message() {
        let err = Error::InvalidDimensions { width: 80, height: 0 };
        assert_eq!(err.to_string(), "invalid initial dimensions: 80x0");
    }

    #[test]
    fn option_messages() {
        assert_eq!(
            Error::UnknownOption("wrap".into()).to_string(),
            "unknown option: wrap"
        );
        let err = Error::InvalidOptionValue {
            name: "scrollanchor".into(),
            value: "x".into(),
        };
        assert_eq!(err.to_string(), "invalid value for scrollanchor: x");
    }

    #[test]
    fn invalid_height_message() {
        assert_eq!(
            Error::InvalidHeight.to_string(),
            "viewport height must be at least one row"
        );
    }
}
