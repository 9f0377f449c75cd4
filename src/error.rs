//! Errors returned while configuring or launching a login load test.
//!
//! Failed checks are not errors: they are recorded by Goose as failed requests and
//! the load test keeps running. [`LoadTestError`] only covers problems that prevent
//! the load test from starting or completing.

use goose::GooseError;
use std::fmt;

/// An enumeration of all errors a login load test can return.
#[derive(Debug)]
pub enum LoadTestError {
    /// Wraps a [`GooseError`](https://docs.rs/goose/*/goose/enum.GooseError.html).
    Goose(GooseError),
    /// Wraps a [`serde_json::Error`](https://docs.rs/serde_json/*/serde_json/struct.Error.html).
    Json(serde_json::Error),
    /// Wraps a [`gumdrop::Error`](https://docs.rs/gumdrop/*/gumdrop/struct.Error.html).
    Options(gumdrop::Error),
    /// Invalid option or value specified, may only be invalid in context.
    InvalidOption {
        /// The invalid option that caused this error.
        option: String,
        /// The invalid value that caused this error.
        value: String,
        /// An optional explanation of the error.
        detail: String,
    },
    /// A ramp profile could not be parsed or rendered.
    InvalidProfile {
        /// The offending profile or stage.
        value: String,
        /// An optional explanation of the error.
        detail: String,
    },
}

impl LoadTestError {
    fn describe(&self) -> &str {
        match *self {
            LoadTestError::Goose(_) => "goose::GooseError",
            LoadTestError::Json(_) => "serde_json::Error",
            LoadTestError::Options(_) => "gumdrop::Error",
            LoadTestError::InvalidOption { .. } => "invalid option or value specified",
            LoadTestError::InvalidProfile { .. } => "invalid ramp profile",
        }
    }
}

impl fmt::Display for LoadTestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LoadTestError::Goose(ref source) => {
                write!(f, "LoadTestError: {} ({})", self.describe(), source)
            }
            LoadTestError::Json(ref source) => {
                write!(f, "LoadTestError: {} ({})", self.describe(), source)
            }
            LoadTestError::Options(ref source) => {
                write!(f, "LoadTestError: {} ({})", self.describe(), source)
            }
            LoadTestError::InvalidOption {
                ref option,
                ref value,
                ref detail,
            } => write!(
                f,
                "LoadTestError: {} ({} = '{}': {})",
                self.describe(),
                option,
                value,
                detail
            ),
            LoadTestError::InvalidProfile {
                ref value,
                ref detail,
            } => write!(
                f,
                "LoadTestError: {} ('{}': {})",
                self.describe(),
                value,
                detail
            ),
        }
    }
}

impl std::error::Error for LoadTestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            LoadTestError::Goose(ref source) => Some(source),
            LoadTestError::Json(ref source) => Some(source),
            LoadTestError::Options(ref source) => Some(source),
            _ => None,
        }
    }
}

/// Auto-convert Goose errors.
impl From<GooseError> for LoadTestError {
    fn from(err: GooseError) -> LoadTestError {
        LoadTestError::Goose(err)
    }
}

/// Auto-convert JSON errors.
impl From<serde_json::Error> for LoadTestError {
    fn from(err: serde_json::Error) -> LoadTestError {
        LoadTestError::Json(err)
    }
}

/// Auto-convert option parsing errors.
impl From<gumdrop::Error> for LoadTestError {
    fn from(err: gumdrop::Error) -> LoadTestError {
        LoadTestError::Options(err)
    }
}
