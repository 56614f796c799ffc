//! Newtype IDs for type-safe entity references.
//!
//! Fixture data identifies entities with short strings (`"3"`, `"addr1"`,
//! `"ord2"`), so every ID wraps a `String`. Use the `define_id!` macro to
//! create wrappers that prevent accidentally mixing IDs from different
//! entity types.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use threadline_core::define_id;
/// define_id!(WishlistId);
/// define_id!(CouponId);
///
/// let wishlist = WishlistId::new("w1");
/// let coupon = CouponId::new("w1");
///
/// // These are different types, so this won't compile:
/// // let _: WishlistId = coupon;
/// assert_eq!(wishlist.as_str(), coupon.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
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

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(LineId);
define_id!(AddressId);
define_id!(OrderId);
define_id!(UserId);
define_id!(ReviewId);

impl LineId {
    /// Derive the cart line ID for a product variant.
    ///
    /// Two lines for the same product differ only by size or color, so the
    /// variant is part of the identity.
    #[must_use]
    pub fn for_variant(product: &ProductId, size: &str, color: &str) -> Self {
        Self(format!("{product}-{size}-{color}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_id_includes_variant() {
        let product = ProductId::new("3");
        assert_eq!(LineId::for_variant(&product, "L", "Đen").as_str(), "3-L-Đen");
        assert_ne!(
            LineId::for_variant(&product, "L", "Đen"),
            LineId::for_variant(&product, "M", "Đen")
        );
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = AddressId::new("addr2");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"addr2\""));
    }
}
