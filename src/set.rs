//! Record collections.
//!
//! [`dump`] validates a whole collection before the first cell is written and
//! then emits the header row followed by one row per record. [`RecordSetBuilder`]
//! goes the other way: it decodes rows into a fresh buffer and replaces the
//! destination collection only when [`RecordSetBuilder::finish`] is called.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_tabular::{record, set, RowBuffer, RowValues, TabularOptions};
//!
//! record! {
//!     #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
//!     struct Item {
//!         id: u32 => "id",
//!     }
//! }
//!
//! let mut sink = RowBuffer::new();
//! set::dump(&[Item { id: 1 }, Item { id: 2 }], &TabularOptions::default(), &mut sink).unwrap();
//! assert_eq!(sink.rows().len(), 3);
//!
//! let mut items: Vec<Box<Item>> = Vec::new();
//! let mut builder = set::RecordSetBuilder::new(&mut items, &TabularOptions::default()).unwrap();
//! assert!(builder.is_reference());
//! builder.push_row(&[("id", "9")].into_iter().collect::<RowValues>()).unwrap();
//! builder.finish();
//! assert_eq!(items, vec![Box::new(Item { id: 9 })]);
//! ```

use crate::de::decode;
use crate::map::FieldSource;
use crate::record::Element;
use crate::schema::Schema;
use crate::ser::{encode, encode_header};
use crate::value::CellSink;
use crate::{Error, Result, TabularOptions};

/// Writes the header row and one row per element into `sink`.
///
/// # Errors
///
/// Returns [`Error::EmptyCollection`] for an empty slice and
/// [`Error::NilElement`] for an absent element; in both cases nothing is written.
/// Encoding errors abort the dump after the rows already written.
pub fn dump<E, S>(records: &[E], options: &TabularOptions, sink: &mut S) -> Result<()>
where
    E: Element,
    S: ?Sized + CellSink,
{
    validate(records)?;
    let schema = Schema::with_options::<E::Record>(options)?;
    tracing::debug!(
        rows = records.len(),
        columns = schema.len(),
        "dumping record collection"
    );

    encode_header(&schema, &mut *sink);
    sink.end_row();
    for record in records.iter().filter_map(E::record) {
        encode(record, &schema, options, &mut *sink)?;
        sink.end_row();
    }
    Ok(())
}

fn validate<E: Element>(records: &[E]) -> Result<()> {
    if records.is_empty() {
        return Err(Error::EmptyCollection);
    }
    match records.iter().position(|record| record.record().is_none()) {
        Some(index) => Err(Error::NilElement { index }),
        None => Ok(()),
    }
}

/// Decodes rows into a collection of `E`.
///
/// Decoded elements are kept in a private buffer; the destination is replaced
/// by [`finish`](Self::finish) and is untouched if the builder is dropped early.
pub struct RecordSetBuilder<'a, E: Element> {
    dest: &'a mut Vec<E>,
    pending: Vec<E>,
    schema: Schema,
    options: TabularOptions,
}

impl<'a, E: Element> RecordSetBuilder<'a, E> {
    /// # Errors
    ///
    /// Fails if the element's record schema cannot be built.
    pub fn new(dest: &'a mut Vec<E>, options: &TabularOptions) -> Result<Self> {
        let schema = Schema::with_options::<E::Record>(options)?;
        Ok(RecordSetBuilder {
            dest,
            pending: Vec::new(),
            schema,
            options: options.clone(),
        })
    }

    /// Schema of the element's record type.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether elements hold their record through a reference.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        E::BY_REFERENCE
    }

    /// Decodes one row and appends it to the buffer.
    ///
    /// # Errors
    ///
    /// See [`decode`].
    pub fn push_row<S: FieldSource>(&mut self, values: &S) -> Result<()> {
        let record = decode::<E::Record, S>(&self.schema, &self.options, values)?;
        self.pending.push(E::from_record(record));
        Ok(())
    }

    /// Number of rows decoded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Replaces the destination with the decoded elements and returns their count.
    pub fn finish(self) -> usize {
        let count = self.pending.len();
        *self.dest = self.pending;
        count
    }
}

/// Decodes every row of `rows` into `dest`.
///
/// `dest` is replaced only if all rows decode.
///
/// # Errors
///
/// See [`decode`].
pub fn load<E, I, S>(dest: &mut Vec<E>, rows: I, options: &TabularOptions) -> Result<usize>
where
    E: Element,
    I: IntoIterator<Item = S>,
    S: FieldSource,
{
    let mut builder = RecordSetBuilder::new(dest, options)?;
    for (index, row) in rows.into_iter().enumerate() {
        builder.push_row(&row).map_err(|err| {
            tracing::debug!(row = index, error = %err, "row failed to decode");
            err
        })?;
    }
    Ok(builder.finish())
}
