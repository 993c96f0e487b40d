//! # serde_tabular
//!
//! Annotation-driven conversion between record collections and tabular rows,
//! built on serde.
//!
//! ## Overview
//!
//! A record is a struct declared with the [`record!`] macro. Each field may carry
//! an annotation `name[,modifier]*`:
//!
//! - the first segment is the column's display name in the header row
//! - `inline` splices a nested record's columns in place of the field
//! - `precision:N` fixes the number of fractional digits of a float field
//!
//! Fields without an annotation never appear in a row. A nested record without
//! `inline` contributes no columns.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_tabular::{from_str, record, to_string};
//!
//! record! {
//!     #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
//!     pub struct Person {
//!         pub name: String => "name",
//!         pub money: f64 => "money,precision:2",
//!         pub age: i32 => "age",
//!         pub edu: Edu => ",inline",
//!     }
//! }
//!
//! record! {
//!     #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
//!     pub struct Edu {
//!         pub school: String => "school",
//!         pub address: String => "address",
//!     }
//! }
//!
//! let people = vec![Person {
//!     name: "n-0".to_string(),
//!     money: 1.23456789,
//!     age: 20,
//!     edu: Edu { school: "school-0".to_string(), address: "hali-0".to_string() },
//! }];
//!
//! let text = to_string(&people).unwrap();
//! assert_eq!(text, "name,money,age,school,address\nn-0,1.23,20,school-0,hali-0\n");
//!
//! let back: Vec<Person> = from_str(&text).unwrap();
//! assert_eq!(back[0].money, 1.23);
//! assert_eq!(back[0].edu.school, "school-0");
//! ```
//!
//! ## Layers
//!
//! - [`Schema`] flattens a record type into columns and an identifier → option map
//! - [`encode`] writes one record into a [`CellSink`]; [`decode`] builds one
//!   record from a [`FieldSource`]
//! - [`dump`] and [`RecordSetBuilder`] handle whole collections of any
//!   [`Element`] type: records by value or behind `Box`, `Rc`, `Arc` or `Option`
//! - [`text`] and [`sheet`] are the delimited-text and workbook backends
//!
//! ## Decoding rules
//!
//! Missing and empty cells leave fields at their zero value. Numeric text that
//! does not parse is logged and skipped by default; [`Coercion::Strict`] turns it
//! into an error. Floats are rounded half away from zero to the field precision.

pub mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod record;
pub mod schema;
pub mod ser;
pub mod set;
pub mod sheet;
pub mod tag;
pub mod text;
pub mod value;

pub use de::decode;
pub use error::{Error, Result};
pub use map::{FieldSource, RowValues};
pub use options::{Coercion, Delimiter, DuplicatePolicy, TabularOptions};
pub use record::{Element, FieldDecl, FieldShape, FieldTable, Record, Shaped};
pub use schema::{Column, Schema};
pub use ser::{encode, encode_header};
pub use set::{dump, load, RecordSetBuilder};
pub use sheet::{CellType, Sheet, Workbook};
pub use tag::FieldOption;
pub use text::TextSink;
pub use value::{Cell, CellSink, FnSink, RowBuffer, ValueKind, UNSUPPORTED};

use std::io;

/// Dumps a record collection to comma-separated text.
///
/// # Examples
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use serde_tabular::{record, to_string};
///
/// record! {
///     #[derive(Serialize, Deserialize, Default)]
///     struct Point { x: i32 => "x", y: i32 => "y" }
/// }
///
/// let text = to_string(&[Point { x: 1, y: 2 }]).unwrap();
/// assert_eq!(text, "x,y\n1,2\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::EmptyCollection`] or [`Error::NilElement`] before writing
/// anything, or an encoding error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<E: Element>(records: &[E]) -> Result<String> {
    to_string_with_options(records, TabularOptions::default())
}

/// Dumps a record collection to delimited text with custom options.
///
/// # Examples
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use serde_tabular::{record, to_string_with_options, Delimiter, TabularOptions};
///
/// record! {
///     #[derive(Serialize, Deserialize, Default)]
///     struct Point { x: f64 => "x", y: f64 => "y" }
/// }
///
/// let options = TabularOptions::new()
///     .with_delimiter(Delimiter::Tab)
///     .with_default_precision(1);
/// let text = to_string_with_options(&[Point { x: 1.0, y: 2.26 }], options).unwrap();
/// assert_eq!(text, "x\ty\n1.0\t2.3\n");
/// ```
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<E: Element>(records: &[E], options: TabularOptions) -> Result<String> {
    text::write_records(records, &options)
}

/// Dumps a record collection to a writer as comma-separated text.
///
/// # Errors
///
/// Returns an error if dumping fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, E>(writer: W, records: &[E]) -> Result<()>
where
    W: io::Write,
    E: Element,
{
    to_writer_with_options(writer, records, TabularOptions::default())
}

/// Dumps a record collection to a writer with custom options.
///
/// Nothing is written if the collection fails to dump.
///
/// # Errors
///
/// Returns an error if dumping fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, E>(mut writer: W, records: &[E], options: TabularOptions) -> Result<()>
where
    W: io::Write,
    E: Element,
{
    let text = to_string_with_options(records, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Loads a record collection from comma-separated text.
///
/// # Examples
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use serde_tabular::{from_str, record};
///
/// record! {
///     #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
///     struct Point { x: i32 => "x", y: i32 => "y" }
/// }
///
/// let points: Vec<Point> = from_str("y,x\n2,1\n\n4,3\n").unwrap();
/// assert_eq!(points, vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }]);
/// ```
///
/// # Errors
///
/// Returns [`Error::MissingHeader`] for input without a header line, or a
/// decoding error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<E: Element>(s: &str) -> Result<Vec<E>> {
    from_str_with_options(s, TabularOptions::default())
}

/// Loads a record collection from delimited text with custom options.
///
/// # Errors
///
/// See [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<E: Element>(s: &str, options: TabularOptions) -> Result<Vec<E>> {
    let mut records = Vec::new();
    text::read_records(s, &mut records, &options)?;
    Ok(records)
}

/// Loads a record collection from an I/O stream of comma-separated text.
///
/// # Examples
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use serde_tabular::{from_reader, record};
/// use std::io::Cursor;
///
/// record! {
///     #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
///     struct Point { x: i32 => "x", y: i32 => "y" }
/// }
///
/// let points: Vec<Point> = from_reader(Cursor::new(b"x,y\n1,2\n")).unwrap();
/// assert_eq!(points, vec![Point { x: 1, y: 2 }]);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, or see [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, E>(mut reader: R) -> Result<Vec<E>>
where
    R: io::Read,
    E: Element,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Loads a record collection from bytes of comma-separated text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, or see [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<E: Element>(v: &[u8]) -> Result<Vec<E>> {
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;

    crate::record! {
        #[derive(Serialize, Deserialize, Default, Debug, PartialEq, Clone)]
        struct Edu {
            school: String => "school",
            address: String => "address",
        }
    }

    crate::record! {
        #[derive(Serialize, Deserialize, Default, Debug, PartialEq, Clone)]
        struct Person {
            name: String => "name",
            money: f64 => "money,precision:10",
            age: i32 => "age",
            edu: Edu => ",inline",
        }
    }

    fn people(count: usize) -> Vec<Person> {
        (0..count)
            .map(|i| Person {
                name: format!("n-{}", i),
                money: 1.23456789,
                age: 20 + i as i32,
                edu: Edu {
                    school: format!("school-{}", i),
                    address: format!("hali-{}", i),
                },
            })
            .collect()
    }

    #[test]
    fn test_dump_text() {
        let text = to_string(&people(2)).unwrap();
        assert_eq!(
            text,
            "name,money,age,school,address\n\
             n-0,1.2345678900,20,school-0,hali-0\n\
             n-1,1.2345678900,21,school-1,hali-1\n"
        );
    }

    #[test]
    fn test_text_round_trip() {
        let original = people(3);
        let text = to_string(&original).unwrap();
        let back: Vec<Person> = from_str(&text).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_reference_elements() {
        let shared: Vec<Arc<Person>> = people(1).into_iter().map(Arc::new).collect();
        let text = to_string(&shared).unwrap();
        let back: Vec<Arc<Person>> = from_slice(text.as_bytes()).unwrap();
        assert_eq!(*back[0], *shared[0]);
    }

    #[test]
    fn test_to_writer() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &people(1)).unwrap();
        assert!(buffer.starts_with(b"name,money,age,school,address\n"));

        let mut untouched = Vec::new();
        let empty: Vec<Person> = Vec::new();
        assert!(to_writer(&mut untouched, &empty).is_err());
        assert!(untouched.is_empty());
    }

    #[test]
    fn test_from_slice_invalid_utf8() {
        let err = from_slice::<Person>(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::Custom(_)));
    }
}
