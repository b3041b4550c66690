//! Error types for policy writing.
//!
//! Every write operation returns [`Result`]. Failures are reported
//! synchronously to the caller; nothing is retried and output already handed
//! to the sink is not rolled back.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: the sink refused data, or an output file could not be opened
//! - **Unsupported Names**: a hierarchical name was given to a flat-only backend
//! - **Invalid Names**: an empty name, or a path with an empty segment
//! - **Type Mismatches**: a value's kind disagrees with the expected element kind
//!
//! ## Examples
//!
//! ```rust
//! use policy_writer::{Error, PafWriter, PolicyWriter};
//!
//! let mut writer = PafWriter::new(Vec::new());
//! let err = writer.write_int("a.b", 1).unwrap_err();
//! assert!(matches!(err, Error::UnsupportedName { .. }));
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

use crate::value::Kind;

/// Represents all possible errors that can occur while writing a policy.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The output sink could not accept data
    #[error("IO error: {0}")]
    Io(String),

    /// Hierarchical name given to a backend that only writes flat names
    #[error("Unsupported name '{name}': this writer does not support hierarchical names")]
    UnsupportedName { name: String },

    /// Empty name, or a hierarchical name with an empty segment
    #[error("Invalid parameter name '{name}'")]
    InvalidName { name: String },

    /// Value kind disagrees with the kind expected for `name`
    #[error("Type mismatch for '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an I/O error from a message.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates an unsupported-name error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use policy_writer::Error;
    ///
    /// let err = Error::unsupported_name("a.b");
    /// assert!(err.to_string().contains("a.b"));
    /// ```
    pub fn unsupported_name(name: &str) -> Self {
        Error::UnsupportedName {
            name: name.to_string(),
        }
    }

    pub fn invalid_name(name: &str) -> Self {
        Error::InvalidName {
            name: name.to_string(),
        }
    }

    /// Creates a type mismatch error between two value kinds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use policy_writer::{Error, Kind};
    ///
    /// let err = Error::type_mismatch("ports", Kind::Int, Kind::String);
    /// assert!(err.to_string().contains("expected int, found string"));
    /// ```
    pub fn type_mismatch(name: &str, expected: Kind, found: Kind) -> Self {
        Error::TypeMismatch {
            name: name.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a type mismatch error with free-form descriptions.
    pub fn type_mismatch_desc(name: &str, expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            name: name.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
