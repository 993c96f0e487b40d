//! Delimited-text backend.
//!
//! Dumps a record collection as a header line followed by one line per record,
//! cells joined with the configured [`Delimiter`](crate::Delimiter) and every line
//! terminated by `\n`. Cells are written verbatim: nothing is quoted or escaped,
//! so the delimiter must not occur in the data.
//!
//! Loading reads the first line as the header. Blank header positions are
//! ignored. Blank lines without a delimiter are skipped when the header has
//! more than one column; with a single column each line is a row.

use crate::map::Header;
use crate::record::Element;
use crate::set::{self, RecordSetBuilder};
use crate::value::{CellSink, ValueKind};
use crate::{Error, Result, TabularOptions};

/// Collects delimiter-joined lines.
#[derive(Debug)]
pub struct TextSink<'a> {
    out: String,
    delimiter: &'a str,
    line_start: bool,
}

impl<'a> TextSink<'a> {
    #[must_use]
    pub fn new(delimiter: &'a str) -> Self {
        TextSink {
            out: String::new(),
            delimiter,
            line_start: true,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.out
    }
}

impl CellSink for TextSink<'_> {
    fn push_cell(&mut self, text: &str, _kind: ValueKind) {
        if !self.line_start {
            self.out.push_str(self.delimiter);
        }
        self.out.push_str(text);
        self.line_start = false;
    }

    fn end_row(&mut self) {
        self.out.push('\n');
        self.line_start = true;
    }
}

/// Dumps `records` to delimited text.
///
/// # Errors
///
/// See [`set::dump`].
pub fn write_records<E: Element>(records: &[E], options: &TabularOptions) -> Result<String> {
    let mut sink = TextSink::new(options.delimiter.as_str());
    set::dump(records, options, &mut sink)?;
    Ok(sink.into_inner())
}

/// Loads delimited text into `dest`, replacing its contents on success.
///
/// # Errors
///
/// Returns [`Error::MissingHeader`] when the input has no header line, and
/// decoding errors from [`decode`](crate::decode).
pub fn read_records<E: Element>(
    input: &str,
    dest: &mut Vec<E>,
    options: &TabularOptions,
) -> Result<usize> {
    let delimiter = options.delimiter.as_str();
    if delimiter.is_empty() {
        return Err(Error::custom("delimiter must not be empty"));
    }

    let mut lines = input.lines();
    let (header, width) = match lines.next() {
        Some(line) => (
            Header::parse(line.split(delimiter)),
            line.split(delimiter).count(),
        ),
        None => return Err(Error::MissingHeader),
    };
    if header.is_empty() {
        return Err(Error::MissingHeader);
    }

    let mut builder = RecordSetBuilder::new(dest, options)?;
    for (index, line) in lines.enumerate() {
        // With a single column every line is a row, blank text included.
        if width > 1 && !line.contains(delimiter) && line.trim().is_empty() {
            tracing::trace!(line = index + 2, "skipping blank line");
            continue;
        }
        let cells: Vec<&str> = line.split(delimiter).collect();
        builder.push_row(&header.values(cells.as_slice()))?;
    }
    Ok(builder.finish())
}
