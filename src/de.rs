//! Row decoding.
//!
//! This module provides the serde deserializers that build a record from one
//! row's header-name → text map:
//!
//! - `RecordDeserializer` walks the record's struct fields and recurses into
//!   nested records
//! - `CellDeserializer` coerces one raw cell into the field's type
//!
//! Missing and empty cells leave the field at its zero value. Numeric text that
//! does not parse is handled per [`Coercion`]: skipped with a debug log, or
//! rejected with [`Error::Coercion`].
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_tabular::{decode, record, RowValues, Schema, TabularOptions};
//!
//! record! {
//!     #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
//!     struct Person {
//!         name: String => "name",
//!         money: f64 => "money,precision:2",
//!         age: i32 => "age",
//!     }
//! }
//!
//! let schema = Schema::of::<Person>().unwrap();
//! let values: RowValues = [("name", "n-0"), ("money", "1.23456789")].into_iter().collect();
//!
//! let person: Person = decode(&schema, &TabularOptions::default(), &values).unwrap();
//! assert_eq!(person, Person { name: "n-0".to_string(), money: 1.23, age: 0 });
//! ```

use crate::map::FieldSource;
use crate::options::Coercion;
use crate::record::{FieldDecl, FieldShape};
use crate::schema::{Schema, MAX_INLINE_DEPTH};
use crate::tag;
use crate::{Error, Result, TabularOptions};
use serde::de::{self, DeserializeOwned, IntoDeserializer};
use serde::forward_to_deserialize_any;
use std::str::FromStr;

const NO_FIELDS: &[&str] = &[];

/// Builds a fresh `T` from one row's values.
///
/// # Errors
///
/// Returns [`Error::InvalidShape`] if `T` does not deserialize as a struct,
/// [`Error::Coercion`] for malformed numbers under [`Coercion::Strict`], and
/// [`Error::UnsupportedType`] for an enum field without a value under
/// [`Coercion::Strict`]. Leniently such a field takes its first variant.
pub fn decode<T, S>(schema: &Schema, options: &TabularOptions, values: &S) -> Result<T>
where
    T: DeserializeOwned,
    S: FieldSource,
{
    let cx = Context {
        schema,
        options,
        values,
    };
    T::deserialize(RecordDeserializer {
        cx: &cx,
        fields: schema.root(),
        populate: true,
        depth: 0,
    })
}

/// Rounds half away from zero to `precision` fractional digits.
///
/// Values that would overflow when scaled are returned unchanged.
///
/// ```rust
/// use serde_tabular::de::round_to;
///
/// assert_eq!(round_to(1.23456789, Some(2)), 1.23);
/// assert_eq!(round_to(-2.5, Some(0)), -3.0);
/// assert_eq!(round_to(1.5, None), 1.5);
/// ```
#[must_use]
pub fn round_to(value: f64, precision: Option<usize>) -> f64 {
    let Some(digits) = precision else {
        return value;
    };
    let scale = 10f64.powi(i32::try_from(digits).unwrap_or(i32::MAX));
    let scaled = value * scale;
    if !scaled.is_finite() || !scale.is_finite() {
        return value;
    }
    scaled.round() / scale
}

struct Context<'a> {
    schema: &'a Schema,
    options: &'a TabularOptions,
    values: &'a dyn FieldSource,
}

impl<'a> Context<'a> {
    /// Non-empty raw text for a display name.
    fn raw(&self, name: &str) -> Option<&'a str> {
        self.values.field(name).filter(|text| !text.is_empty())
    }

    /// Whether any leaf column reachable from `fields` has a value.
    fn any_present(&self, fields: &'static [FieldDecl], depth: usize) -> bool {
        if depth > MAX_INLINE_DEPTH {
            return false;
        }
        fields.iter().any(|decl| {
            let Some(annotation) = decl.annotation() else {
                return false;
            };
            match decl.shape {
                FieldShape::Record(nested) => {
                    tag::is_inline(annotation) && self.any_present(nested(), depth + 1)
                }
                FieldShape::Value => self
                    .schema
                    .option(decl.ident)
                    .and_then(|option| self.raw(&option.name))
                    .is_some(),
            }
        })
    }
}

/// Deserializer for one record level.
///
/// With `populate` unset the record is built from zero values only.
struct RecordDeserializer<'a> {
    cx: &'a Context<'a>,
    fields: &'static [FieldDecl],
    populate: bool,
    depth: usize,
}

impl<'de, 'a> de::Deserializer<'de> for RecordDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::invalid_shape(
            "only support struct or struct pointer",
        ))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.populate && self.cx.any_present(self.fields, self.depth) {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.depth > MAX_INLINE_DEPTH {
            return Err(Error::invalid_shape(format!(
                "record nesting deeper than {} levels",
                MAX_INLINE_DEPTH
            )));
        }
        visitor.visit_map(RecordAccess {
            cx: self.cx,
            decls: self.fields,
            keys: fields.iter(),
            current: None,
            populate: self.populate,
            depth: self.depth,
        })
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}

struct RecordAccess<'a> {
    cx: &'a Context<'a>,
    decls: &'static [FieldDecl],
    keys: std::slice::Iter<'static, &'static str>,
    current: Option<&'static str>,
    populate: bool,
    depth: usize,
}

impl<'a> RecordAccess<'a> {
    fn zero_cell(&self, column: &'a str) -> CellDeserializer<'a> {
        CellDeserializer {
            column,
            raw: None,
            precision: None,
            coercion: self.cx.options.coercion,
        }
    }
}

impl<'de, 'a> de::MapAccess<'de> for RecordAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.keys.next() {
            Some(&key) => {
                self.current = Some(key);
                let key: de::value::StrDeserializer<'_, Error> = key.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let Some(key) = self.current.take() else {
            return Err(Error::custom("next_value_seed called before next_key_seed"));
        };
        let Some(decl) = self.decls.iter().find(|decl| decl.ident == key) else {
            return seed.deserialize(self.zero_cell(key));
        };
        let annotation = decl.annotation().filter(|_| self.populate);

        match (decl.shape, annotation) {
            (FieldShape::Record(nested), annotation) => seed.deserialize(RecordDeserializer {
                cx: self.cx,
                fields: nested(),
                populate: annotation.map_or(false, tag::is_inline),
                depth: self.depth + 1,
            }),
            (FieldShape::Value, Some(_)) => match self.cx.schema.option(key) {
                Some(option) => seed.deserialize(CellDeserializer {
                    column: &option.name,
                    raw: self.cx.raw(&option.name),
                    precision: option.effective_precision(),
                    coercion: self.cx.options.coercion,
                }),
                None => seed.deserialize(self.zero_cell(key)),
            },
            (FieldShape::Value, None) => seed.deserialize(self.zero_cell(key)),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.keys.len())
    }
}

/// Deserializer for one raw cell.
///
/// `raw` is `None` for a missing or empty cell; the visitor then receives the
/// zero value of the requested type.
struct CellDeserializer<'a> {
    column: &'a str,
    raw: Option<&'a str>,
    precision: Option<usize>,
    coercion: Coercion,
}

impl<'a> CellDeserializer<'a> {
    fn reject(&self, raw: &str, expected: &'static str) -> Result<()> {
        match self.coercion {
            Coercion::Strict => Err(Error::coercion(self.column, raw, expected)),
            Coercion::Lenient => {
                tracing::debug!(
                    column = self.column,
                    value = raw,
                    expected,
                    "cell text does not parse, keeping zero value"
                );
                Ok(())
            }
        }
    }

    /// Parses the trimmed text, `None` when absent or rejected leniently.
    fn parse<T: FromStr>(&self, expected: &'static str) -> Result<Option<T>> {
        let Some(raw) = self.raw else {
            return Ok(None);
        };
        match raw.trim().parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => self.reject(raw, expected).map(|()| None),
        }
    }

    fn parse_or_zero<T: FromStr + Default>(&self, expected: &'static str) -> Result<T> {
        Ok(self.parse(expected)?.unwrap_or_default())
    }

    fn parse_float(&self, expected: &'static str) -> Result<f64> {
        let value: f64 = self.parse_or_zero(expected)?;
        Ok(round_to(value, self.precision))
    }

    fn parse_bool(&self) -> Result<bool> {
        let Some(raw) = self.raw else {
            return Ok(false);
        };
        match raw.trim() {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            _ => self.reject(raw, "bool").map(|()| false),
        }
    }

    fn parse_char(&self) -> Result<char> {
        let Some(raw) = self.raw else {
            return Ok('\0');
        };
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => self.reject(raw, "char").map(|()| '\0'),
        }
    }

    fn zero(&self) -> ZeroAccess<'a> {
        ZeroAccess {
            column: self.column,
            coercion: self.coercion,
            remaining: 0,
            fields: NO_FIELDS.iter(),
        }
    }
}

macro_rules! deserialize_number {
    ($($method:ident => $visit:ident: $ty:ty,)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                let value: $ty = self.parse_or_zero(stringify!($ty))?;
                visitor.$visit(value)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for CellDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.raw {
            Some(raw) => visitor.visit_str(raw),
            None => visitor.visit_unit(),
        }
    }

    deserialize_number! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_f32(self.parse_float("f32")? as f32)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_f64(self.parse_float("f64")?)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_bool(self.parse_bool()?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_char(self.parse_char()?)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(self.raw.unwrap_or_default())
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_bytes(&[])
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_byte_buf(Vec::new())
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.raw {
            Some(_) => visitor.visit_some(self),
            None => visitor.visit_none(),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    // Containers are written as the unsupported sentinel, so they always come
    // back empty.
    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(self.zero())
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(ZeroAccess {
            remaining: len,
            ..self.zero()
        })
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(self.zero())
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(ZeroAccess {
            fields: fields.iter(),
            ..self.zero()
        })
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let variant = match (self.raw, self.coercion, variants.first()) {
            (Some(raw), _, _) => raw.trim(),
            (None, Coercion::Lenient, Some(&first)) => {
                tracing::debug!(
                    column = self.column,
                    variant = first,
                    "no value for enum {}, using its first variant",
                    name
                );
                first
            }
            (None, _, _) => {
                return Err(Error::unsupported_type(&format!(
                    "enum {} in column '{}' has no value to decode",
                    name, self.column
                )))
            }
        };
        let variant: de::value::StrDeserializer<'_, Error> = variant.into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Yields zero values: `remaining` sequence elements, or one entry per struct
/// field.
struct ZeroAccess<'a> {
    column: &'a str,
    coercion: Coercion,
    remaining: usize,
    fields: std::slice::Iter<'static, &'static str>,
}

impl<'a> ZeroAccess<'a> {
    fn cell(&self) -> CellDeserializer<'a> {
        CellDeserializer {
            column: self.column,
            raw: None,
            precision: None,
            coercion: self.coercion,
        }
    }
}

impl<'de, 'a> de::SeqAccess<'de> for ZeroAccess<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(self.cell()).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

impl<'de, 'a> de::MapAccess<'de> for ZeroAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some(&key) => {
                let key: de::value::StrDeserializer<'_, Error> = key.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.cell())
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}
