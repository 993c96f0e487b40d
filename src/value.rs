//! Cells and cell sinks.
//!
//! The encoder produces one [`Cell`] per column: the formatted text and the
//! [`ValueKind`] it was produced from. Backends receive cells through a
//! [`CellSink`] and decide how to store them, e.g. joined with a delimiter or as
//! typed spreadsheet cells.
//!
//! ```rust
//! use serde_tabular::{CellSink, ValueKind};
//!
//! let mut row: Vec<String> = Vec::new();
//! row.push_cell("n-0", ValueKind::Text);
//! row.push_cell("20", ValueKind::Int);
//! assert_eq!(row, ["n-0", "20"]);
//! ```

/// Placeholder text for values that have no single-cell representation.
pub const UNSUPPORTED: &str = "# unsupported by xlsx-util #";

/// The kind of value a cell was rendered from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Bool,
    Int,
    Uint,
    Float,
    /// An absent optional value.
    Null,
    /// A container or other value rendered as [`UNSUPPORTED`].
    Unsupported,
}

impl ValueKind {
    /// Returns `true` for integer and float kinds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tabular::ValueKind;
    ///
    /// assert!(ValueKind::Float.is_numeric());
    /// assert!(!ValueKind::Text.is_numeric());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::Uint | ValueKind::Float)
    }
}

/// One formatted cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub kind: ValueKind,
}

impl Cell {
    #[must_use]
    pub fn new(text: impl Into<String>, kind: ValueKind) -> Self {
        Cell {
            text: text.into(),
            kind,
        }
    }

    #[must_use]
    pub fn null() -> Self {
        Cell::new(String::new(), ValueKind::Null)
    }

    #[must_use]
    pub fn unsupported() -> Self {
        Cell::new(UNSUPPORTED, ValueKind::Unsupported)
    }
}

/// Receives the cells of a row, in column order.
///
/// `end_row` is called by whole-collection dumps after the header and after every
/// record; single-row encoding never calls it.
pub trait CellSink {
    fn push_cell(&mut self, text: &str, kind: ValueKind);

    fn end_row(&mut self) {}
}

impl CellSink for Vec<String> {
    fn push_cell(&mut self, text: &str, _kind: ValueKind) {
        self.push(text.to_string());
    }
}

impl CellSink for Vec<Cell> {
    fn push_cell(&mut self, text: &str, kind: ValueKind) {
        self.push(Cell::new(text, kind));
    }
}

/// Adapts a closure into a [`CellSink`].
///
/// ```rust
/// use serde_tabular::{CellSink, FnSink, ValueKind};
///
/// let mut seen = 0;
/// let mut sink = FnSink(|_text: &str, _kind: ValueKind| seen += 1);
/// sink.push_cell("a", ValueKind::Text);
/// sink.push_cell("b", ValueKind::Text);
/// drop(sink);
/// assert_eq!(seen, 2);
/// ```
pub struct FnSink<F>(pub F);

impl<F> CellSink for FnSink<F>
where
    F: FnMut(&str, ValueKind),
{
    fn push_cell(&mut self, text: &str, kind: ValueKind) {
        (self.0)(text, kind);
    }
}

/// Collects whole rows; used for dumps that need every row in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowBuffer {
    rows: Vec<Vec<Cell>>,
    pending: Vec<Cell>,
}

impl RowBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed rows, header first when filled by a dump.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }
}

impl CellSink for RowBuffer {
    fn push_cell(&mut self, text: &str, kind: ValueKind) {
        self.pending.push(Cell::new(text, kind));
    }

    fn end_row(&mut self) {
        self.rows.push(std::mem::take(&mut self.pending));
    }
}
