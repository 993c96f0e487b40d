//! Schema resolution.
//!
//! [`Schema`] flattens a record's field table into the ordered list of columns a
//! row carries, plus a single-level map from field identifier to [`FieldOption`].
//!
//! - Fields are visited depth-first in declaration order.
//! - Fields without an annotation are skipped.
//! - A nested record marked `inline` is descended into; its columns are spliced in
//!   at the field's position and its options are merged into the map.
//! - A nested record without `inline` contributes no columns.
//! - When two fields share an identifier the later one overwrites the earlier in
//!   the map; every such collision is recorded in [`Schema::duplicates`].
//!
//! A schema is built once per dump or load call and only read afterwards.

use crate::options::DuplicatePolicy;
use crate::record::{FieldDecl, FieldShape, Record};
use crate::tag::{self, FieldOption};
use crate::{Error, Result, TabularOptions};
use indexmap::IndexMap;

/// Maximum number of nested inline levels.
pub const MAX_INLINE_DEPTH: usize = 32;

/// One flattened column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Identifier of the field the column comes from.
    pub ident: &'static str,
    /// Display name written to the header row.
    pub name: String,
}

/// Flattened columns and resolved options of a record type.
///
/// # Examples
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use serde_tabular::{record, Schema};
///
/// record! {
///     #[derive(Serialize, Deserialize, Default)]
///     struct Product {
///         sku: String => "sku",
///         price: f64 => "price,precision:2",
///         internal: u64,
///     }
/// }
///
/// let schema = Schema::of::<Product>().unwrap();
/// assert_eq!(schema.header(), ["sku", "price"]);
/// assert_eq!(schema.option("price").unwrap().precision, Some(2));
/// assert!(schema.option("internal").is_none());
/// ```
#[derive(Clone, Debug)]
pub struct Schema {
    root: &'static [FieldDecl],
    columns: Vec<Column>,
    options: IndexMap<&'static str, FieldOption>,
    duplicates: Vec<&'static str>,
}

impl Schema {
    /// Builds the schema of `T`, keeping the last field on identifier collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if inline nesting exceeds [`MAX_INLINE_DEPTH`].
    pub fn of<T: Record>() -> Result<Self> {
        Self::from_fields(T::fields(), DuplicatePolicy::LastWins)
    }

    /// Builds the schema of `T` honoring `options.duplicates`.
    ///
    /// # Errors
    ///
    /// Returns an error if inline nesting exceeds [`MAX_INLINE_DEPTH`], or on an
    /// identifier collision under [`DuplicatePolicy::Reject`].
    pub fn with_options<T: Record>(options: &TabularOptions) -> Result<Self> {
        Self::from_fields(T::fields(), options.duplicates)
    }

    /// Builds a schema from a raw field table.
    ///
    /// # Errors
    ///
    /// See [`Schema::with_options`].
    pub fn from_fields(fields: &'static [FieldDecl], policy: DuplicatePolicy) -> Result<Self> {
        let mut schema = Schema {
            root: fields,
            columns: Vec::with_capacity(fields.len()),
            options: IndexMap::with_capacity(fields.len()),
            duplicates: Vec::new(),
        };
        schema.walk(fields, 0)?;

        if let Some(ident) = schema.duplicates.first() {
            if policy == DuplicatePolicy::Reject {
                return Err(Error::DuplicateField {
                    ident: (*ident).to_string(),
                });
            }
            tracing::debug!(
                duplicates = ?schema.duplicates,
                "flattened schema has colliding field identifiers, last one wins"
            );
        }
        Ok(schema)
    }

    fn walk(&mut self, fields: &'static [FieldDecl], depth: usize) -> Result<()> {
        if depth > MAX_INLINE_DEPTH {
            return Err(Error::invalid_shape(format!(
                "inline nesting deeper than {} levels",
                MAX_INLINE_DEPTH
            )));
        }

        for decl in fields {
            let Some(annotation) = decl.annotation() else {
                continue;
            };
            let option = FieldOption::parse(annotation);
            let inline = option.inline;
            let name = option.name.clone();

            if self.options.insert(decl.ident, option).is_some() {
                self.duplicates.push(decl.ident);
            }

            match decl.shape {
                FieldShape::Record(nested) => {
                    if inline {
                        self.walk(nested(), depth + 1)?;
                    }
                }
                FieldShape::Value => self.columns.push(Column {
                    ident: decl.ident,
                    name,
                }),
            }
        }
        Ok(())
    }

    /// Field table of the record the schema was built from.
    #[must_use]
    pub fn root(&self) -> &'static [FieldDecl] {
        self.root
    }

    /// Flattened columns in row order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Display names in row order.
    #[must_use]
    pub fn header(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Resolved option for a field identifier.
    #[must_use]
    pub fn option(&self, ident: &str) -> Option<&FieldOption> {
        self.options.get(ident)
    }

    /// The identifier → option map, in first-insertion order.
    #[must_use]
    pub fn options(&self) -> &IndexMap<&'static str, FieldOption> {
        &self.options
    }

    /// Identifiers that were declared more than once across inline records, once
    /// per extra occurrence.
    #[must_use]
    pub fn duplicates(&self) -> &[&'static str] {
        &self.duplicates
    }
}

/// Number of columns a nested record contributes when inlined.
pub(crate) fn inline_width(fields: &'static [FieldDecl], depth: usize) -> usize {
    if depth > MAX_INLINE_DEPTH {
        return 0;
    }
    fields
        .iter()
        .filter_map(|decl| decl.annotation().map(|annotation| (decl, annotation)))
        .map(|(decl, annotation)| match decl.shape {
            FieldShape::Record(nested) if tag::is_inline(annotation) => {
                inline_width(nested(), depth + 1)
            }
            FieldShape::Record(_) => 0,
            FieldShape::Value => 1,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    crate::record! {
        #[derive(Serialize, Deserialize, Default)]
        struct Edu {
            school: String => "school",
            address: String => "address",
        }
    }

    crate::record! {
        #[derive(Serialize, Deserialize, Default)]
        struct Person {
            name: String => "name",
            edu: Edu => ",inline",
            age: i32 => "age",
            former: Edu => "former",
            skipped: i32 => "",
        }
    }

    crate::record! {
        #[derive(Serialize, Deserialize, Default)]
        struct Alias {
            name: String => "alias",
        }
    }

    crate::record! {
        #[derive(Serialize, Deserialize, Default)]
        struct Clash {
            name: String => "name",
            alias: Alias => ",inline",
        }
    }

    crate::record! {
        #[derive(Serialize, Deserialize, Default)]
        struct Node {
            value: i32 => "value",
            next: Option<Box<Node>> => ",inline",
        }
    }

    #[test]
    fn test_inline_spliced_in_place() {
        let schema = Schema::of::<Person>().unwrap();
        assert_eq!(schema.header(), ["name", "school", "address", "age"]);
        assert_eq!(schema.columns()[1].ident, "school");
    }

    #[test]
    fn test_non_inline_record_has_option_but_no_columns() {
        let schema = Schema::of::<Person>().unwrap();
        assert_eq!(schema.option("former").unwrap().name, "former");
        assert!(!schema.header().contains(&"former"));
        assert!(schema.option("skipped").is_none());
    }

    #[test]
    fn test_collision_last_wins() {
        let schema = Schema::of::<Clash>().unwrap();
        assert_eq!(schema.header(), ["name", "alias"]);
        assert_eq!(schema.option("name").unwrap().name, "alias");
        assert_eq!(schema.duplicates(), ["name"]);
    }

    #[test]
    fn test_collision_rejected() {
        let err = Schema::with_options::<Clash>(&TabularOptions::strict()).unwrap_err();
        assert!(matches!(err, Error::DuplicateField { ref ident } if ident == "name"));
    }

    #[test]
    fn test_recursive_inline_rejected() {
        let err = Schema::of::<Node>().unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)));
    }

    #[test]
    fn test_inline_width() {
        assert_eq!(inline_width(Edu::fields(), 0), 2);
        assert_eq!(inline_width(Person::fields(), 0), 4);
    }

    #[test]
    fn test_deterministic() {
        let a = Schema::of::<Person>().unwrap();
        let b = Schema::of::<Person>().unwrap();
        assert_eq!(a.columns(), b.columns());
        assert_eq!(a.options(), b.options());
    }
}
