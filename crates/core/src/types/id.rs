//! Newtype IDs for recipe entities.
//!
//! Every table has a serial `INTEGER` primary key. Wrapping them keeps a
//! `RecipeId` from being passed where a `UserId` is expected.

/// Error returned when a path segment or form value is not a valid ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id: {0:?}")]
pub struct ParseIdError(String);

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - Ordering, hashing, and `Default` (zero, the "not yet stored" ID)
/// - `FromStr` so IDs can be parsed from URL segments
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use recipe_box_core::define_id;
/// define_id!(ShelfId);
///
/// let id: ShelfId = "42".parse().unwrap();
/// assert_eq!(id.as_i32(), 42);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::ParseIdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim()
                    .parse::<i32>()
                    .map(Self)
                    .map_err(|_| $crate::types::id::ParseIdError::new(s))
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

impl ParseIdError {
    /// Create a parse error carrying the rejected input.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(input.to_owned())
    }
}

define_id!(UserId);
define_id!(RecipeId);
define_id!(IngredientId);
define_id!(DirectionId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_path_segment() {
        let id: RecipeId = "17".parse().unwrap();
        assert_eq!(id, RecipeId::new(17));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = "abc".parse::<RecipeId>().unwrap_err();
        assert_eq!(err, ParseIdError::new("abc"));
        assert!("".parse::<UserId>().is_err());
        assert!("1.5".parse::<UserId>().is_err());
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(IngredientId::default().as_i32(), 0);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&DirectionId::new(3)).unwrap();
        assert_eq!(json, "3");
        let id: DirectionId = serde_json::from_str("9").unwrap();
        assert_eq!(id.as_i32(), 9);
    }
}
