/// Declares a record struct together with its field table.
///
/// Each field may carry an annotation after `=>`; fields without one are left out
/// of every row. The struct's own attributes are passed through, so derive
/// `Serialize` and `Deserialize` there.
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use serde_tabular::{record, Schema};
///
/// record! {
///     #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
///     pub struct Person {
///         pub name: String => "name",
///         pub money: f64 => "money,precision:2",
///         pub age: i32 => "age",
///         pub edu: Edu => ",inline",
///     }
/// }
///
/// record! {
///     #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
///     pub struct Edu {
///         pub school: String => "school",
///         pub address: String => "address",
///     }
/// }
///
/// let schema = Schema::of::<Person>().unwrap();
/// assert_eq!(schema.header(), ["name", "money", "age", "school", "address"]);
/// ```
#[macro_export]
macro_rules! record {
    (@tag) => {
        ::core::option::Option::None
    };

    (@tag $tag:literal) => {
        ::core::option::Option::Some($tag)
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(=> $tag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            fn fields() -> &'static [$crate::FieldDecl] {
                const FIELDS: &[$crate::FieldDecl] = &[
                    $(
                        $crate::FieldDecl::new(
                            ::core::stringify!($field),
                            $crate::record!(@tag $($tag)?),
                            <$ty as $crate::Shaped>::SHAPE,
                        ),
                    )*
                ];
                FIELDS
            }
        }

        impl $crate::Shaped for $name {
            const SHAPE: $crate::FieldShape =
                $crate::FieldShape::Record(<$name as $crate::Record>::fields);
        }

        impl $crate::Element for $name {
            type Record = $name;
            const BY_REFERENCE: bool = false;

            fn record(&self) -> ::core::option::Option<&$name> {
                ::core::option::Option::Some(self)
            }

            fn from_record(record: $name) -> Self {
                record
            }
        }
    };
}
