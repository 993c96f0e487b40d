//! Error types for tabular encoding and decoding.
//!
//! ## Error Categories
//!
//! - **Shape Errors**: the value handed to the encoder/decoder is not a record
//! - **Collection Errors**: empty collections or nil elements on dump
//! - **Coercion Errors**: malformed numeric text, only raised in strict mode
//! - **Schema Errors**: duplicate field identifiers under [`DuplicatePolicy::Reject`]
//! - **Backend Errors**: missing header line, unknown or duplicate sheet, I/O
//!
//! ## Examples
//!
//! ```rust
//! use serde_tabular::{to_string, Error};
//! use serde_tabular::record;
//! use serde::{Deserialize, Serialize};
//!
//! record! {
//!     #[derive(Serialize, Deserialize, Default)]
//!     struct Row {
//!         id: u32 => "id",
//!     }
//! }
//!
//! let rows: Vec<Row> = Vec::new();
//! assert!(matches!(to_string(&rows), Err(Error::EmptyCollection)));
//! ```
//!
//! [`DuplicatePolicy::Reject`]: crate::DuplicatePolicy::Reject

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while dumping or loading rows.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The value is not a record (or a reference to one)
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// Dump was called with no records
    #[error("Empty collection: nothing to dump")]
    EmptyCollection,

    /// Dump found an absent element
    #[error("Collection contains a nil element at index {index}")]
    NilElement { index: usize },

    /// Raw cell text could not be coerced into the field's type (strict mode)
    #[error("Cannot coerce column '{column}' value {value:?} into {expected}")]
    Coercion {
        column: String,
        value: String,
        expected: &'static str,
    },

    /// Two flattened fields share an identifier
    #[error("Duplicate field identifier '{ident}' in flattened schema")]
    DuplicateField { ident: String },

    /// Type that has no tabular representation on decode
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Delimited text without a header line
    #[error("Missing header row")]
    MissingHeader,

    /// Sheet lookup failed
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    /// Sheet name already taken in the workbook
    #[error("Sheet '{0}' already exists")]
    DuplicateSheet(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an invalid shape error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tabular::Error;
    ///
    /// let err = Error::invalid_shape("only support struct or struct pointer");
    /// assert!(err.to_string().contains("struct pointer"));
    /// ```
    pub fn invalid_shape<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidShape(msg.to_string())
    }

    /// Creates a coercion error for a column whose raw text did not parse.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tabular::Error;
    ///
    /// let err = Error::coercion("age", "twenty", "i32");
    /// assert!(err.to_string().contains("'age'"));
    /// ```
    pub fn coercion(column: &str, value: &str, expected: &'static str) -> Self {
        Error::Coercion {
            column: column.to_string(),
            value: value.to_string(),
            expected,
        }
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_element_message() {
        let err = Error::NilElement { index: 3 };
        assert_eq!(
            err.to_string(),
            "Collection contains a nil element at index 3"
        );
    }

    #[test]
    fn test_serde_custom_maps_to_custom() {
        let err = <Error as serde::de::Error>::custom("boom");
        assert!(matches!(err, Error::Custom(ref m) if m == "boom"));
    }
}
