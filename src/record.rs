//! Compile-time record descriptors.
//!
//! A record type exposes its declared fields through [`Record::fields`]: an ordered
//! table of [`FieldDecl`]s holding each field's identifier, its annotation and its
//! [`FieldShape`]. The table is usually generated by the [`record!`](crate::record)
//! macro, which also implements [`Shaped`] and [`Element`] for the type.
//!
//! The shape of a field type is known statically through [`Shaped`]: scalars and
//! containers are [`FieldShape::Value`], records are [`FieldShape::Record`], and
//! `Option`, `Box`, `Rc` and `Arc` forward the shape of what they wrap.
//!
//! Collections are handled through [`Element`], which is implemented for a record
//! held by value and for `Box`, `Rc`, `Arc` and `Option` wrappers around elements.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// Function returning the field table of a nested record.
pub type FieldTable = fn() -> &'static [FieldDecl];

/// Structural role of a field type.
#[derive(Clone, Copy, Debug)]
pub enum FieldShape {
    /// A scalar or a container; occupies at most one cell.
    Value,
    /// A nested record, by value or through a reference.
    Record(FieldTable),
}

impl FieldShape {
    #[inline]
    #[must_use]
    pub const fn is_record(&self) -> bool {
        matches!(self, FieldShape::Record(_))
    }
}

/// One declared field of a record.
#[derive(Clone, Copy, Debug)]
pub struct FieldDecl {
    /// Field identifier, identical to the serde field name.
    pub ident: &'static str,
    /// Raw annotation; `None` excludes the field.
    pub tag: Option<&'static str>,
    pub shape: FieldShape,
}

impl FieldDecl {
    /// A raw identifier such as `r#type` is stored as `type`, the name serde uses.
    #[must_use]
    pub const fn new(ident: &'static str, tag: Option<&'static str>, shape: FieldShape) -> Self {
        FieldDecl {
            ident: strip_raw(ident),
            tag,
            shape,
        }
    }

    /// The annotation if the field takes part in serialization.
    #[inline]
    #[must_use]
    pub fn annotation(&self) -> Option<&'static str> {
        self.tag.filter(|tag| !tag.is_empty())
    }
}

const fn strip_raw(ident: &'static str) -> &'static str {
    match ident.as_bytes() {
        [b'r', b'#', rest @ ..] => match std::str::from_utf8(rest) {
            Ok(stripped) => stripped,
            Err(_) => ident,
        },
        _ => ident,
    }
}

/// A record type with a static field table.
///
/// Field identifiers must match the serde field names, so records should not use
/// `#[serde(rename)]`, `#[serde(flatten)]` or `#[serde(skip_serializing)]`.
///
/// # Examples
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use serde_tabular::{record, Record};
///
/// record! {
///     #[derive(Serialize, Deserialize, Default)]
///     struct Point {
///         x: i32 => "x",
///         y: i32 => "y",
///         scratch: i32,
///     }
/// }
///
/// let idents: Vec<_> = Point::fields().iter().map(|f| f.ident).collect();
/// assert_eq!(idents, ["x", "y", "scratch"]);
/// assert!(Point::fields()[2].annotation().is_none());
/// ```
pub trait Record: Serialize + DeserializeOwned {
    /// Declared fields in declaration order.
    fn fields() -> &'static [FieldDecl];
}

/// Static shape of a field type.
///
/// Types without a dedicated impl can opt in with an empty `impl Shaped for T {}`.
pub trait Shaped {
    const SHAPE: FieldShape = FieldShape::Value;
}

macro_rules! impl_value_shape {
    ($($ty:ty),* $(,)?) => {
        $(impl Shaped for $ty {})*
    };
}

impl_value_shape!(
    bool, char, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32,
    f64, (),
);

impl_value_shape!(
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
);

impl<Tz: chrono::TimeZone> Shaped for chrono::DateTime<Tz> {}

impl<T> Shaped for Vec<T> {}
impl<T> Shaped for VecDeque<T> {}
impl<T, const N: usize> Shaped for [T; N] {}
impl<T, S> Shaped for HashSet<T, S> {}
impl<T> Shaped for BTreeSet<T> {}
impl<K, V, S> Shaped for HashMap<K, V, S> {}
impl<K, V> Shaped for BTreeMap<K, V> {}
impl<K, V, S> Shaped for indexmap::IndexMap<K, V, S> {}
impl<A, B> Shaped for (A, B) {}
impl<A, B, C> Shaped for (A, B, C) {}

impl<T: Shaped> Shaped for Option<T> {
    const SHAPE: FieldShape = T::SHAPE;
}

impl<T: Shaped> Shaped for Box<T> {
    const SHAPE: FieldShape = T::SHAPE;
}

impl<T: Shaped> Shaped for Rc<T> {
    const SHAPE: FieldShape = T::SHAPE;
}

impl<T: Shaped> Shaped for Arc<T> {
    const SHAPE: FieldShape = T::SHAPE;
}

/// An element of a record collection: a record by value, or a reference to one.
///
/// A collection's element type fixes the representation for every element, so a
/// collection never mixes values and references.
pub trait Element: Sized {
    type Record: Record;

    /// Whether elements hold their record through a reference.
    const BY_REFERENCE: bool;

    /// The record, or `None` for an absent element.
    fn record(&self) -> Option<&Self::Record>;

    /// Wraps a freshly decoded record.
    fn from_record(record: Self::Record) -> Self;
}

impl<T: Record> Element for Box<T> {
    type Record = T;
    const BY_REFERENCE: bool = true;

    fn record(&self) -> Option<&T> {
        Some(&**self)
    }

    fn from_record(record: T) -> Self {
        Box::new(record)
    }
}

impl<T: Record> Element for Rc<T> {
    type Record = T;
    const BY_REFERENCE: bool = true;

    fn record(&self) -> Option<&T> {
        Some(&**self)
    }

    fn from_record(record: T) -> Self {
        Rc::new(record)
    }
}

impl<T: Record> Element for Arc<T> {
    type Record = T;
    const BY_REFERENCE: bool = true;

    fn record(&self) -> Option<&T> {
        Some(&**self)
    }

    fn from_record(record: T) -> Self {
        Arc::new(record)
    }
}

impl<E: Element> Element for Option<E> {
    type Record = E::Record;
    const BY_REFERENCE: bool = E::BY_REFERENCE;

    fn record(&self) -> Option<&E::Record> {
        self.as_ref().and_then(E::record)
    }

    fn from_record(record: E::Record) -> Self {
        Some(E::from_record(record))
    }
}
