//! Row encoding.
//!
//! This module provides the serde serializers that turn one record into one row
//! of cells:
//!
//! - [`RowSerializer`] walks the record's struct fields, splices inline records in
//!   place and skips fields without an annotation
//! - [`CellSerializer`] renders one scalar field into a [`Cell`]
//!
//! Most users should go through [`encode`] or the collection-level functions in
//! the crate root.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_tabular::{encode, record, Schema, TabularOptions};
//!
//! record! {
//!     #[derive(Serialize, Deserialize, Default)]
//!     struct Person {
//!         name: String => "name",
//!         money: f64 => "money,precision:2",
//!         age: i32 => "age",
//!     }
//! }
//!
//! let schema = Schema::of::<Person>().unwrap();
//! let person = Person { name: "n-0".to_string(), money: 1.23456789, age: 20 };
//!
//! let mut row: Vec<String> = Vec::new();
//! encode(&person, &schema, &TabularOptions::default(), &mut row).unwrap();
//! assert_eq!(row, ["n-0", "1.23", "20"]);
//! ```

use crate::record::{FieldDecl, FieldShape};
use crate::schema::{self, Schema};
use crate::tag::{self, FieldOption};
use crate::value::{Cell, CellSink, ValueKind};
use crate::{Error, Result, TabularOptions};
use serde::ser::{self, Impossible, Serialize};

/// Encodes one record into `sink`, one cell per schema column.
///
/// The row is built completely before the first cell reaches the sink, so a
/// failing record leaves the sink untouched.
///
/// # Errors
///
/// Returns [`Error::InvalidShape`] if `record` does not serialize as a struct.
pub fn encode<T, S>(record: &T, schema: &Schema, options: &TabularOptions, sink: &mut S) -> Result<()>
where
    T: ?Sized + Serialize,
    S: ?Sized + CellSink,
{
    let mut cells = Vec::with_capacity(schema.len());
    record.serialize(RowSerializer::new(schema, options, &mut cells))?;
    for cell in &cells {
        sink.push_cell(&cell.text, cell.kind);
    }
    Ok(())
}

/// Writes the header cells of `schema` into `sink`.
pub fn encode_header<S>(schema: &Schema, sink: &mut S)
where
    S: ?Sized + CellSink,
{
    for column in schema.columns() {
        sink.push_cell(&column.name, ValueKind::Text);
    }
}

/// Renders a float with a fixed number of fractional digits, or the shortest
/// text that parses back to the same value.
#[must_use]
pub fn format_float(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(digits) => format!("{:.*}", digits, value),
        None => value.to_string(),
    }
}

/// Serializer for one record level.
///
/// Accepts only structs (optionally behind `Some`, a newtype or a smart pointer).
pub struct RowSerializer<'a> {
    schema: &'a Schema,
    options: &'a TabularOptions,
    fields: &'static [FieldDecl],
    cells: &'a mut Vec<Cell>,
    depth: usize,
}

impl<'a> RowSerializer<'a> {
    pub fn new(schema: &'a Schema, options: &'a TabularOptions, cells: &'a mut Vec<Cell>) -> Self {
        RowSerializer {
            schema,
            options,
            fields: schema.root(),
            cells,
            depth: 0,
        }
    }

    fn not_a_record(&self, found: &str) -> Error {
        Error::invalid_shape(format!(
            "only support struct or struct pointer, found {}",
            found
        ))
    }
}

impl<'a> ser::Serializer for RowSerializer<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, _v: bool) -> Result<()> {
        Err(self.not_a_record("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<()> {
        Err(self.not_a_record("integer"))
    }

    fn serialize_i16(self, _v: i16) -> Result<()> {
        Err(self.not_a_record("integer"))
    }

    fn serialize_i32(self, _v: i32) -> Result<()> {
        Err(self.not_a_record("integer"))
    }

    fn serialize_i64(self, _v: i64) -> Result<()> {
        Err(self.not_a_record("integer"))
    }

    fn serialize_u8(self, _v: u8) -> Result<()> {
        Err(self.not_a_record("integer"))
    }

    fn serialize_u16(self, _v: u16) -> Result<()> {
        Err(self.not_a_record("integer"))
    }

    fn serialize_u32(self, _v: u32) -> Result<()> {
        Err(self.not_a_record("integer"))
    }

    fn serialize_u64(self, _v: u64) -> Result<()> {
        Err(self.not_a_record("integer"))
    }

    fn serialize_f32(self, _v: f32) -> Result<()> {
        Err(self.not_a_record("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(self.not_a_record("float"))
    }

    fn serialize_char(self, _v: char) -> Result<()> {
        Err(self.not_a_record("char"))
    }

    fn serialize_str(self, _v: &str) -> Result<()> {
        Err(self.not_a_record("string"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(self.not_a_record("bytes"))
    }

    fn serialize_none(self) -> Result<()> {
        if self.depth == 0 {
            return Err(self.not_a_record("nil"));
        }
        // Absent inline reference: keep the row aligned with the header.
        let width = schema::inline_width(self.fields, self.depth);
        self.cells.extend(std::iter::repeat_with(Cell::null).take(width));
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Err(self.not_a_record("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<()> {
        Err(self.not_a_record(name))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        Err(self.not_a_record(name))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(self.not_a_record(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.not_a_record("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.not_a_record("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.not_a_record(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.not_a_record(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.not_a_record("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(StructSerializer {
            schema: self.schema,
            options: self.options,
            fields: self.fields,
            cells: self.cells,
            depth: self.depth,
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.not_a_record(name))
    }
}

pub struct StructSerializer<'a> {
    schema: &'a Schema,
    options: &'a TabularOptions,
    fields: &'static [FieldDecl],
    cells: &'a mut Vec<Cell>,
    depth: usize,
}

impl<'a> StructSerializer<'a> {
    /// Declaration and resolved option of a serialized field, if it is annotated.
    fn resolve(&self, key: &str) -> Option<(&'static FieldDecl, &'static str, &'a FieldOption)> {
        let decl = self.fields.iter().find(|decl| decl.ident == key)?;
        let annotation = decl.annotation()?;
        let option = self.schema.option(key)?;
        Some((decl, annotation, option))
    }
}

impl<'a> ser::SerializeStruct for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let Some((decl, annotation, option)) = self.resolve(key) else {
            return Ok(());
        };

        match decl.shape {
            FieldShape::Record(nested) => {
                if tag::is_inline(annotation) {
                    value.serialize(RowSerializer {
                        schema: self.schema,
                        options: self.options,
                        fields: nested(),
                        cells: &mut *self.cells,
                        depth: self.depth + 1,
                    })?;
                }
            }
            FieldShape::Value => {
                let cell = value.serialize(CellSerializer::new(option, self.options))?;
                self.cells.push(cell);
            }
        }
        Ok(())
    }

    fn skip_field(&mut self, key: &'static str) -> Result<()> {
        let Some((decl, annotation, _)) = self.resolve(key) else {
            return Ok(());
        };

        let width = match decl.shape {
            FieldShape::Record(nested) if tag::is_inline(annotation) => {
                schema::inline_width(nested(), self.depth + 1)
            }
            FieldShape::Record(_) => 0,
            FieldShape::Value => 1,
        };
        self.cells
            .extend(std::iter::repeat_with(Cell::null).take(width));
        Ok(())
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Serializer for one scalar field.
///
/// Containers and other values without a single-cell form come out as
/// [`Cell::unsupported`].
pub struct CellSerializer<'a> {
    option: &'a FieldOption,
    options: &'a TabularOptions,
}

impl<'a> CellSerializer<'a> {
    pub fn new(option: &'a FieldOption, options: &'a TabularOptions) -> Self {
        CellSerializer { option, options }
    }

    fn precision(&self) -> Option<usize> {
        self.option
            .effective_precision()
            .or(self.options.default_precision)
    }
}

impl<'a> ser::Serializer for CellSerializer<'a> {
    type Ok = Cell;
    type Error = Error;

    type SerializeSeq = Unsupported;
    type SerializeTuple = Unsupported;
    type SerializeTupleStruct = Unsupported;
    type SerializeTupleVariant = Unsupported;
    type SerializeMap = Unsupported;
    type SerializeStruct = Unsupported;
    type SerializeStructVariant = Unsupported;

    fn serialize_bool(self, v: bool) -> Result<Cell> {
        Ok(Cell::new(v.to_string(), ValueKind::Bool))
    }

    fn serialize_i8(self, v: i8) -> Result<Cell> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Cell> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Cell> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Cell> {
        Ok(Cell::new(v.to_string(), ValueKind::Int))
    }

    fn serialize_i128(self, v: i128) -> Result<Cell> {
        Ok(Cell::new(v.to_string(), ValueKind::Int))
    }

    fn serialize_u8(self, v: u8) -> Result<Cell> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Cell> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Cell> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Cell> {
        Ok(Cell::new(v.to_string(), ValueKind::Uint))
    }

    fn serialize_u128(self, v: u128) -> Result<Cell> {
        Ok(Cell::new(v.to_string(), ValueKind::Uint))
    }

    fn serialize_f32(self, v: f32) -> Result<Cell> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<Cell> {
        Ok(Cell::new(
            format_float(v, self.precision()),
            ValueKind::Float,
        ))
    }

    fn serialize_char(self, v: char) -> Result<Cell> {
        Ok(Cell::new(v.to_string(), ValueKind::Text))
    }

    fn serialize_str(self, v: &str) -> Result<Cell> {
        Ok(Cell::new(v, ValueKind::Text))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Cell> {
        Ok(Cell::unsupported())
    }

    fn serialize_none(self) -> Result<Cell> {
        Ok(Cell::null())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Cell>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Cell> {
        Ok(Cell::unsupported())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Cell> {
        Ok(Cell::unsupported())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Cell> {
        Ok(Cell::new(variant, ValueKind::Text))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Cell>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Cell>
    where
        T: ?Sized + Serialize,
    {
        Ok(Cell::unsupported())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Unsupported> {
        Ok(Unsupported)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Unsupported> {
        Ok(Unsupported)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Unsupported> {
        Ok(Unsupported)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Unsupported> {
        Ok(Unsupported)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Unsupported> {
        Ok(Unsupported)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Unsupported> {
        Ok(Unsupported)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Unsupported> {
        Ok(Unsupported)
    }
}

/// Swallows the contents of a compound value and yields the unsupported sentinel.
pub struct Unsupported;

impl ser::SerializeSeq for Unsupported {
    type Ok = Cell;
    type Error = Error;

    fn serialize_element<T>(&mut self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<Cell> {
        Ok(Cell::unsupported())
    }
}

impl ser::SerializeTuple for Unsupported {
    type Ok = Cell;
    type Error = Error;

    fn serialize_element<T>(&mut self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<Cell> {
        Ok(Cell::unsupported())
    }
}

impl ser::SerializeTupleStruct for Unsupported {
    type Ok = Cell;
    type Error = Error;

    fn serialize_field<T>(&mut self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<Cell> {
        Ok(Cell::unsupported())
    }
}

impl ser::SerializeTupleVariant for Unsupported {
    type Ok = Cell;
    type Error = Error;

    fn serialize_field<T>(&mut self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<Cell> {
        Ok(Cell::unsupported())
    }
}

impl ser::SerializeMap for Unsupported {
    type Ok = Cell;
    type Error = Error;

    fn serialize_key<T>(&mut self, _key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn serialize_value<T>(&mut self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<Cell> {
        Ok(Cell::unsupported())
    }
}

impl ser::SerializeStruct for Unsupported {
    type Ok = Cell;
    type Error = Error;

    fn serialize_field<T>(&mut self, _key: &'static str, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<Cell> {
        Ok(Cell::unsupported())
    }
}

impl ser::SerializeStructVariant for Unsupported {
    type Ok = Cell;
    type Error = Error;

    fn serialize_field<T>(&mut self, _key: &'static str, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<Cell> {
        Ok(Cell::unsupported())
    }
}
