//! Newtype IDs for type-safe entity references.
//!
//! The backend owns every record, so IDs are opaque to the client. Some
//! endpoints send them as JSON strings and older ones as integers; both
//! deserialize into the same newtype and always serialize back as strings.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` as a plain string
/// - `Deserialize` from either a string or an integer
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Display`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
///
/// # Example
///
/// ```rust
/// # use lumiere_core::define_id;
/// define_id!(UserId);
/// define_id!(OrderId);
///
/// let user_id = UserId::new("u-1");
/// let order_id = OrderId::new("u-1");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = order_id;
/// assert_eq!(user_id.as_str(), order_id.as_str());
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

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
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

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::id::deserialize_raw_id(deserializer).map(Self)
            }
        }
    };
}

/// Raw ID as it may appear on the wire.
#[doc(hidden)]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

/// Deserialize an ID sent as either a JSON string or integer.
///
/// Used by [`define_id!`]; not intended to be called directly.
///
/// # Errors
///
/// Returns an error if the value is neither a string nor an integer, or if
/// the string is empty.
#[doc(hidden)]
pub fn deserialize_raw_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let id = match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Signed(n) => n.to_string(),
        RawId::Unsigned(n) => n.to_string(),
    };

    if id.is_empty() {
        return Err(serde::de::Error::custom("id cannot be empty"));
    }
    Ok(id)
}

// Backend entity IDs
define_id!(UserId);
define_id!(ProductId);
define_id!(OrderId);
define_id!(PaymentId);
define_id!(PaymentOrderCode);
define_id!(CommissionId);
define_id!(DiscountTierId);
define_id!(PayOsConfigId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_string() {
        let id: OrderId = serde_json::from_str("\"ord_42\"").unwrap();
        assert_eq!(id.as_str(), "ord_42");
    }

    #[test]
    fn test_deserialize_from_integer() {
        let id: ProductId = serde_json::from_str("17").unwrap();
        assert_eq!(id.as_str(), "17");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<UserId>("\"\"").is_err());
    }

    #[test]
    fn test_deserialize_rejects_other_types() {
        assert!(serde_json::from_str::<UserId>("true").is_err());
        assert!(serde_json::from_str::<UserId>("{}").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let id = CommissionId::new("7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn test_display() {
        let id = PayOsConfigId::from("cfg-1");
        assert_eq!(id.to_string(), "cfg-1");
    }
}
