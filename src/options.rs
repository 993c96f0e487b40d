//! Configuration options for tabular dumping and loading.
//!
//! - [`TabularOptions`]: Main configuration struct
//! - [`Delimiter`]: Cell separator used by the delimited-text backend
//! - [`Coercion`]: What to do with numeric text that does not parse
//! - [`DuplicatePolicy`]: What to do when flattening produces a field identifier twice
//!
//! ## Examples
//!
//! ```rust
//! use serde_tabular::{Coercion, Delimiter, TabularOptions};
//!
//! let options = TabularOptions::new()
//!     .with_delimiter(Delimiter::Tab)
//!     .with_coercion(Coercion::Strict);
//! assert_eq!(options.delimiter.as_str(), "\t");
//! ```

/// Cell separator for delimited text.
///
/// Cells are joined verbatim, so pick a delimiter that does not occur in the data.
///
/// # Examples
///
/// ```rust
/// use serde_tabular::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_str(), ",");
/// assert_eq!(Delimiter::Tab.as_str(), "\t");
/// assert_eq!(Delimiter::Custom("::".to_string()).as_str(), "::");
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
    Custom(String),
}

impl Delimiter {
    /// Returns the string representation of this delimiter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
            Delimiter::Semicolon => ";",
            Delimiter::Custom(sep) => sep,
        }
    }
}

/// Handling of numeric cells whose text does not parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Coercion {
    /// Leave the field at its zero value and keep decoding.
    #[default]
    Lenient,
    /// Fail the row with [`Error::Coercion`](crate::Error::Coercion).
    Strict,
}

/// Handling of identifier collisions across inline sub-records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// The field visited last in depth-first declaration order wins.
    #[default]
    LastWins,
    /// Building the schema fails with [`Error::DuplicateField`](crate::Error::DuplicateField).
    Reject,
}

/// Configuration shared by the encoder, the decoder and both backends.
///
/// # Examples
///
/// ```rust
/// use serde_tabular::TabularOptions;
///
/// // Shortest round-trip float text, lenient decoding
/// let options = TabularOptions::new();
/// assert_eq!(options.default_precision, None);
///
/// // Spreadsheet preset renders floats with 6 fractional digits
/// let options = TabularOptions::sheet();
/// assert_eq!(options.default_precision, Some(6));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TabularOptions {
    pub delimiter: Delimiter,
    /// Fractional digits for floats whose field has no positive `precision`.
    /// `None` renders the shortest text that round-trips.
    pub default_precision: Option<usize>,
    pub coercion: Coercion,
    pub duplicates: DuplicatePolicy,
}

impl TabularOptions {
    /// Creates default options (comma, shortest float text, lenient, last wins).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options used by the sheet backend: floats default to 6 fractional digits.
    #[must_use]
    pub fn sheet() -> Self {
        TabularOptions {
            default_precision: Some(6),
            ..Default::default()
        }
    }

    /// Options that fail fast on malformed numbers and on identifier collisions.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tabular::{Coercion, DuplicatePolicy, TabularOptions};
    ///
    /// let options = TabularOptions::strict();
    /// assert_eq!(options.coercion, Coercion::Strict);
    /// assert_eq!(options.duplicates, DuplicatePolicy::Reject);
    /// ```
    #[must_use]
    pub fn strict() -> Self {
        TabularOptions {
            coercion: Coercion::Strict,
            duplicates: DuplicatePolicy::Reject,
            ..Default::default()
        }
    }

    /// Sets the delimiter for delimited text.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the fractional digits used for floats without a field precision.
    #[must_use]
    pub fn with_default_precision(mut self, precision: usize) -> Self {
        self.default_precision = Some(precision);
        self
    }

    /// Sets the coercion mode for decoding.
    #[must_use]
    pub fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = coercion;
        self
    }

    /// Sets the duplicate identifier policy for schema building.
    #[must_use]
    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }
}
