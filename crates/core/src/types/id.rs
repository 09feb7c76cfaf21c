//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Commerce API
//! identifiers are opaque strings, so every ID wraps a `String`.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use commerce_query_core::define_id;
/// define_id!(BasketId);
/// define_id!(ItemId);
///
/// let basket_id = BasketId::new("bcd123");
/// let item_id = ItemId::new("bcd123");
///
/// // These are different types, so this won't compile:
/// // let _: BasketId = item_id;
/// assert_eq!(basket_id.as_str(), item_id.as_str());
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

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Tenant identifiers
define_id!(OrganizationId);
define_id!(SiteId);

// Shopper identities
define_id!(CustomerId);

// Basket and its sub-resources
define_id!(BasketId);
define_id!(ItemId);
define_id!(ShipmentId);
define_id!(PaymentInstrumentId);
define_id!(CouponItemId);
define_id!(GiftCertificateItemId);

/// Unique shopper ID, the key of a shopper context.
///
/// Issued by the authentication service alongside the access token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Usid(String);

impl Usid {
    /// Create a usid from an existing value.
    #[must_use]
    pub fn new(usid: impl Into<String>) -> Self {
        Self(usid.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Usid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Usid {
    fn from(usid: &str) -> Self {
        Self(usid.to_owned())
    }
}

impl From<String> for Usid {
    fn from(usid: String) -> Self {
        Self(usid)
    }
}
