//! Macros for reducing boilerplate when defining record schemas
//!
//! A schema declares each field once, together with its [`FieldKind`], and
//! the macro generates the struct plus the [`Record`] implementation.
//!
//! [`FieldKind`]: crate::core::field::FieldKind
//! [`Record`]: crate::core::record::Record

/// Complete macro to create a typed record with automatic trait implementations
///
/// The generated struct always carries an `id: Uuid` key, derives serde and
/// `validator::Validate`, and fills missing fields with their defaults when
/// deserialized. Declared fields are read leniently: `null` or unreadable
/// values fall back to the default and numeric strings are accepted for
/// numbers (see [`LenientField`]). Field types must implement `LenientField`.
/// Field attributes (e.g. `#[validate(email)]`) are forwarded.
///
/// [`LenientField`]: crate::core::field::LenientField
///
/// # Example
///
/// ```rust,ignore
/// use tabula::prelude::*;
///
/// impl_record!(
///     Employee,
///     "employee",
///     search: ["name", "email"],
///     {
///         name: String => Text,
///         #[validate(email)]
///         email: Option<String> => Text,
///         status: String => Enum,
///         joined_at: Option<String> => Date,
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_record {
    (
        $(#[$struct_meta:meta])*
        $type:ident,
        $type_name:expr,
        search: [ $( $search_field:expr ),* $(,)? ],
        {
            $( $(#[$field_meta:meta])* $field:ident : $field_type:ty => $kind:ident ),* $(,)?
        }
    ) => {
        $(#[$struct_meta])*
        #[derive(
            Debug,
            Clone,
            Default,
            PartialEq,
            ::serde::Serialize,
            ::serde::Deserialize,
            ::validator::Validate
        )]
        #[serde(default)]
        pub struct $type {
            /// Stable unique key of this record
            pub id: ::uuid::Uuid,
            $(
                $(#[$field_meta])*
                #[serde(deserialize_with = "tabula::core::field::deserialize_lenient")]
                pub $field : $field_type
            ),*
        }

        impl $crate::core::record::Record for $type {
            fn entity_type() -> &'static str {
                $type_name
            }

            fn key(&self) -> ::uuid::Uuid {
                self.id
            }

            fn schema() -> &'static [(&'static str, $crate::core::field::FieldKind)] {
                &[ $( (stringify!($field), $crate::core::field::FieldKind::$kind) ),* ]
            }

            fn search_fields() -> &'static [&'static str] {
                &[ $( $search_field ),* ]
            }

            fn raw_field(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                use $crate::core::field::ToFieldValue;
                match field {
                    "id" => Some(self.id.to_field_value()),
                    $( stringify!($field) => Some(self.$field.to_field_value()), )*
                    _ => None,
                }
            }
        }
    };
}
