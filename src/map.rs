//! Field-value maps for decoding.
//!
//! The decoder reads raw cell text by column display name through
//! [`FieldSource`]. [`RowValues`] is the map the backends build for each data
//! row: a wrapper around [`IndexMap`] that keeps the header's column order.
//!
//! ```rust
//! use serde_tabular::{FieldSource, RowValues};
//!
//! let mut row = RowValues::new();
//! row.insert("name".to_string(), "n-0".to_string());
//! row.insert("age".to_string(), "20".to_string());
//!
//! assert_eq!(row.field("age"), Some("20"));
//! assert_eq!(row.field("money"), None);
//! ```

use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Raw text lookup by column display name.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<&str>;
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn field(&self, name: &str) -> Option<&str> {
        (**self).field(name)
    }
}

impl<S: BuildHasher> FieldSource for HashMap<String, String, S> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldSource for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<S: BuildHasher> FieldSource for IndexMap<String, String, S> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// One row's header-name → text map, in header order.
///
/// A header repeated in the input keeps its first position and its last value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowValues(IndexMap<String, String>);

impl RowValues {
    #[must_use]
    pub fn new() -> Self {
        RowValues(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RowValues(IndexMap::with_capacity(capacity))
    }

    /// Inserts a value, returning the previous one for the same name.
    pub fn insert(&mut self, name: String, value: String) -> Option<String> {
        self.0.insert(name, value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when every value is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.values().all(String::is_empty)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl FieldSource for RowValues {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}

impl From<HashMap<String, String>> for RowValues {
    fn from(map: HashMap<String, String>) -> Self {
        RowValues(map.into_iter().collect())
    }
}

impl From<RowValues> for HashMap<String, String> {
    fn from(row: RowValues) -> Self {
        row.0.into_iter().collect()
    }
}

impl IntoIterator for RowValues {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, String)> for RowValues {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        RowValues(IndexMap::from_iter(iter))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for RowValues {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }
}

/// Column positions of a header row; blank header cells are ignored.
#[derive(Debug, Clone)]
pub(crate) struct Header {
    names: Vec<(usize, String)>,
}

impl Header {
    pub(crate) fn parse<I, T>(cells: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let names = cells
            .into_iter()
            .enumerate()
            .filter_map(|(index, cell)| {
                let name = cell.as_ref();
                (!name.is_empty()).then(|| (index, name.to_string()))
            })
            .collect();
        Header { names }
    }

    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Maps a data row's cells onto the header names. Missing trailing cells are
    /// left out.
    pub(crate) fn values<T: AsRef<str>>(&self, cells: &[T]) -> RowValues {
        let mut row = RowValues::with_capacity(self.names.len());
        for (index, name) in &self.names {
            if let Some(cell) = cells.get(*index) {
                row.insert(name.clone(), cell.as_ref().to_string());
            }
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_skips_blank_names() {
        let header = Header::parse(["name", "", "age"]);
        let row = header.values(&["n-0", "ignored", "20"]);
        assert_eq!(
            row.iter().collect::<Vec<_>>(),
            vec![
                (&"name".to_string(), &"n-0".to_string()),
                (&"age".to_string(), &"20".to_string()),
            ]
        );
    }

    #[test]
    fn test_short_row_leaves_columns_out() {
        let header = Header::parse(["name", "age"]);
        let row = header.values(&["n-0"]);
        assert_eq!(row.len(), 1);
        assert_eq!(row.field("age"), None);
    }

    #[test]
    fn test_blank_row() {
        let header = Header::parse(["name", "age"]);
        assert!(header.values(&["", ""]).is_blank());
        assert!(!header.values(&["", "1"]).is_blank());
        assert!(Header::parse(["", ""]).is_empty());
    }

    #[test]
    fn test_field_source_impls() {
        let mut tree = BTreeMap::new();
        tree.insert("a".to_string(), "1".to_string());
        assert_eq!(tree.field("a"), Some("1"));
        assert_eq!((&tree).field("b"), None);

        let row: RowValues = [("a", "x"), ("a", "y")].into_iter().collect();
        assert_eq!(row.len(), 1);
        assert_eq!(row.field("a"), Some("y"));
    }
}
