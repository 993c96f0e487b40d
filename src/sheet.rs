//! In-memory workbook backend.
//!
//! A [`Workbook`] holds named [`Sheet`]s of typed cells. Dumping a collection adds
//! a sheet whose first row holds the column names as string cells and whose
//! other rows hold one record each, typed from the value the cell was rendered
//! from. Floats default to 6 fractional digits ([`TabularOptions::sheet`]).
//!
//! Reading and writing `.xlsx` files is left to a spreadsheet crate: fill a
//! sheet with [`Sheet::push_row`] from a reader, or walk [`Sheet::rows`] to
//! write one out.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_tabular::{record, CellType, Workbook};
//!
//! record! {
//!     #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
//!     struct Score {
//!         player: String => "player",
//!         points: f64 => "points",
//!     }
//! }
//!
//! let mut book = Workbook::new();
//! book.dump("scores", &[Score { player: "ann".to_string(), points: 1.5 }]).unwrap();
//!
//! let sheet = book.sheet("scores").unwrap();
//! assert_eq!(sheet.rows()[1][1].text, "1.500000");
//! assert_eq!(sheet.cell_type(1, 1), Some(CellType::Numeric));
//!
//! let mut scores: Vec<Score> = Vec::new();
//! book.load("scores", &mut scores).unwrap();
//! assert_eq!(scores[0].points, 1.5);
//! ```

use crate::map::Header;
use crate::record::Element;
use crate::set::{self, RecordSetBuilder};
use crate::value::{Cell, CellSink, RowBuffer, ValueKind};
use crate::{Error, Result, TabularOptions};
use indexmap::IndexMap;

/// Storage type of a sheet cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellType {
    String,
    Numeric,
    Bool,
}

impl From<ValueKind> for CellType {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Int | ValueKind::Uint | ValueKind::Float => CellType::Numeric,
            ValueKind::Bool => CellType::Bool,
            ValueKind::Text | ValueKind::Null | ValueKind::Unsupported => CellType::String,
        }
    }
}

/// One sheet: rows of cells, the header row first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sheet {
    buffer: RowBuffer,
}

impl Sheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        self.buffer.rows()
    }

    /// Storage type of the cell at (`row`, `col`), zero-based.
    #[must_use]
    pub fn cell_type(&self, row: usize, col: usize) -> Option<CellType> {
        let cell = self.rows().get(row)?.get(col)?;
        Some(cell.kind.into())
    }

    /// Appends a row of string cells.
    pub fn push_row<I, T>(&mut self, cells: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for cell in cells {
            self.buffer.push_cell(cell.as_ref(), ValueKind::Text);
        }
        self.buffer.end_row();
    }
}

impl CellSink for Sheet {
    fn push_cell(&mut self, text: &str, kind: ValueKind) {
        self.buffer.push_cell(text, kind);
    }

    fn end_row(&mut self) {
        self.buffer.end_row();
    }
}

/// Named sheets in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Workbook {
    sheets: IndexMap<String, Sheet>,
}

impl Workbook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dumps `records` into a new sheet using [`TabularOptions::sheet`].
    ///
    /// # Errors
    ///
    /// See [`dump_with_options`](Self::dump_with_options).
    pub fn dump<E: Element>(&mut self, name: &str, records: &[E]) -> Result<()> {
        self.dump_with_options(name, records, &TabularOptions::sheet())
    }

    /// Dumps `records` into a new sheet called `name`.
    ///
    /// The sheet is added only if the whole dump succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateSheet`] if `name` is taken, and the errors of
    /// [`set::dump`].
    pub fn dump_with_options<E: Element>(
        &mut self,
        name: &str,
        records: &[E],
        options: &TabularOptions,
    ) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(Error::DuplicateSheet(name.to_string()));
        }
        let mut sheet = Sheet::new();
        set::dump(records, options, &mut sheet)?;
        tracing::debug!(sheet = name, rows = sheet.rows().len(), "sheet added");
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }

    /// Loads sheet `name` into `dest` using [`TabularOptions::sheet`].
    ///
    /// # Errors
    ///
    /// See [`load_with_options`](Self::load_with_options).
    pub fn load<E: Element>(&self, name: &str, dest: &mut Vec<E>) -> Result<usize> {
        self.load_with_options(name, dest, &TabularOptions::sheet())
    }

    /// Loads sheet `name` into `dest`, replacing its contents on success.
    ///
    /// Blank header cells and rows whose cells are all blank are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SheetNotFound`], [`Error::MissingHeader`] for a sheet
    /// without a header row, and decoding errors.
    pub fn load_with_options<E: Element>(
        &self,
        name: &str,
        dest: &mut Vec<E>,
        options: &TabularOptions,
    ) -> Result<usize> {
        let sheet = self
            .sheet(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))?;

        let mut rows = sheet.rows().iter();
        let header = match rows.next() {
            Some(row) => Header::parse(row.iter().map(|cell| cell.text.as_str())),
            None => return Err(Error::MissingHeader),
        };
        if header.is_empty() {
            return Err(Error::MissingHeader);
        }

        let mut builder = RecordSetBuilder::new(dest, options)?;
        for (index, row) in rows.enumerate() {
            if row.iter().all(|cell| cell.text.trim().is_empty()) {
                tracing::trace!(sheet = name, row = index + 1, "skipping blank row");
                continue;
            }
            let texts: Vec<&str> = row.iter().map(|cell| cell.text.as_str()).collect();
            builder.push_row(&header.values(texts.as_slice()))?;
        }
        Ok(builder.finish())
    }

    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    /// Adds a sheet filled elsewhere, e.g. by a file reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateSheet`] if `name` is taken.
    pub fn add_sheet(&mut self, name: &str, sheet: Sheet) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(Error::DuplicateSheet(name.to_string()));
        }
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }
}
