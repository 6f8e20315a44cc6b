//! Error types for safe serialization.
//!
//! The substitution policy itself never fails: every [`Value`](crate::Value)
//! maps to some output. The errors here come from the surroundings of the
//! policy:
//!
//! - **Unsupported types**: values the JSON encoder refuses (`BigInt`)
//! - **Transform errors**: failures raised by a caller-supplied transform,
//!   passed through unchanged
//! - **Encoding errors**: failures reported by `serde_json`
//! - **I/O errors**: writer failures in [`to_writer`](crate::to_writer)
//!
//! ## Examples
//!
//! ```rust
//! use num_bigint::BigInt;
//! use safe_stringify::{to_string, Error, Value};
//!
//! let result = to_string(&Value::BigInt(BigInt::from(7)));
//! assert!(matches!(result, Err(Error::UnsupportedType(_))));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur during safe serialization.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during writing
    #[error("IO error: {0}")]
    Io(String),

    /// A value the JSON encoder has no representation for
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Raised by a caller-supplied transform
    #[error("Transform failed: {0}")]
    Transform(String),

    /// Reported by the underlying JSON encoder
    #[error("Encoding error: {0}")]
    Encode(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an unsupported type error for values the encoder rejects.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a transform error. Intended for use inside caller transforms.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use safe_stringify::Error;
    ///
    /// let err = Error::transform("field `secret` is not allowed");
    /// assert!(err.to_string().contains("secret"));
    /// ```
    pub fn transform<T: fmt::Display>(msg: T) -> Self {
        Error::Transform(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else {
            Error::Encode(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
