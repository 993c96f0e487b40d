//! Field annotation parsing.
//!
//! Every serializable field carries an annotation of the form
//!
//! ```text
//! name[,modifier]*
//! modifier := inline | key:value
//! ```
//!
//! The first segment is the column's display name. `inline` splices a nested
//! record's columns into the parent row. `precision:N` fixes the number of
//! fractional digits of a float field. Unknown modifiers are ignored and a
//! malformed `precision` value leaves precision unset: parsing never fails.
//!
//! ```rust
//! use serde_tabular::FieldOption;
//!
//! let option = FieldOption::parse("money,precision:2");
//! assert_eq!(option.name, "money");
//! assert_eq!(option.precision, Some(2));
//! assert!(!option.inline);
//!
//! let option = FieldOption::parse(",inline");
//! assert_eq!(option.name, "");
//! assert!(option.inline);
//! ```

const INLINE_KEY: &str = "inline";
const PRECISION_KEY: &str = "precision";

/// Options resolved from one field annotation.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FieldOption {
    /// Column display name (may be empty).
    pub name: String,
    /// Splice a nested record's columns in place of this field.
    pub inline: bool,
    /// Fractional digits for float fields.
    pub precision: Option<usize>,
}

impl FieldOption {
    /// Parses an annotation string. Never fails.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        let mut segments = tag.split(',');
        let mut option = FieldOption {
            name: segments.next().unwrap_or_default().to_string(),
            ..Default::default()
        };

        for segment in segments {
            let segment = segment.trim();
            if segment == INLINE_KEY {
                option.inline = true;
                continue;
            }
            if let Some((key, value)) = segment.split_once(':') {
                if key.trim() == PRECISION_KEY {
                    option.precision = value.trim().parse().ok();
                }
            }
        }
        option
    }

    /// Precision to apply, ignoring zero.
    #[inline]
    #[must_use]
    pub fn effective_precision(&self) -> Option<usize> {
        self.precision.filter(|p| *p > 0)
    }
}

/// Whether an annotation carries the `inline` modifier.
#[must_use]
pub fn is_inline(tag: &str) -> bool {
    tag.split(',').skip(1).any(|segment| segment.trim() == INLINE_KEY)
}

impl From<&str> for FieldOption {
    fn from(tag: &str) -> Self {
        FieldOption::parse(tag)
    }
}
