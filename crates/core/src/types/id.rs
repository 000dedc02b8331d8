//! Newtype IDs for type-safe entity references.
//!
//! The catalog API is inconsistent about whether it sends ids as numbers or
//! strings, so every id is stored as a string and compared as a string.
//! Use the `define_id!` macro to create wrappers that accept either form.

use serde::Deserialize;
use serde_json::Value;

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` as a plain string
/// - `Deserialize` from either a JSON string or a JSON number
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `from_json()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use green_earth_core::define_id;
/// define_id!(TreeId);
/// define_id!(GroveId);
///
/// let tree = TreeId::new("7");
/// let from_number = TreeId::from_json(&serde_json::json!(7));
/// assert_eq!(from_number, Some(tree));
///
/// // These are different types, so this won't compile:
/// // let _: TreeId = GroveId::new("7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Extract an ID from a JSON string or number.
            ///
            /// Returns `None` for empty strings, `null`, and any other JSON type.
            #[must_use]
            pub fn from_json(value: &::serde_json::Value) -> Option<Self> {
                $crate::types::id::json_id_string(value).map(Self)
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the ID is the empty string.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::id::deserialize_string_or_number(deserializer).map(Self)
            }
        }
    };
}

// Define standard entity IDs
define_id!(CategoryId);
define_id!(PlantId);
define_id!(LineItemId);

impl From<PlantId> for LineItemId {
    fn from(id: PlantId) -> Self {
        Self(id.into_inner())
    }
}

/// Render a JSON id as a string, the way the storefront compares ids.
///
/// Strings are returned unchanged unless empty; numbers use their canonical
/// JSON representation (`1` stays `"1"`, `2.5` stays `"2.5"`).
#[must_use]
pub fn json_id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Deserialize an id that may be encoded as a JSON string or number.
///
/// Used by the `define_id!` macro. Empty strings are accepted as-is so that a
/// persisted record with a blank id still loads.
///
/// # Errors
///
/// Returns a deserialization error for any JSON type other than string or number.
pub fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Text(s) => Ok(s),
        RawId::Number(n) => Ok(n.to_string()),
    }
}
