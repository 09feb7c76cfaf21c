//! Path and query parameters for Shopper Baskets operations.
//!
//! `organizationId` and `siteId` are supplied by the [`RestClient`] and are
//! not repeated here.
//!
//! [`RestClient`]: crate::RestClient

use commerce_query_core::{
    BasketId, CouponItemId, CustomerId, GiftCertificateItemId, ItemId, PaymentInstrumentId,
    ShipmentId,
};

/// Query pairs appended to an endpoint URL.
pub(crate) type QueryPairs = Vec<(&'static str, String)>;

fn push_flag(pairs: &mut QueryPairs, key: &'static str, value: Option<bool>) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

/// Whether taxes are calculated by the platform or supplied externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxMode {
    Internal,
    External,
}

impl TaxMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
        }
    }
}

/// How merged product items combine with items already in the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductItemMergeMode {
    SumQuantities,
    SeparateItem,
}

impl ProductItemMergeMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SumQuantities => "sum_quantities",
            Self::SeparateItem => "separate_item",
        }
    }
}

/// `createBasket` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateBasketParams {
    pub tax_mode: Option<TaxMode>,
}

impl CreateBasketParams {
    pub(crate) fn query(&self) -> QueryPairs {
        self.tax_mode
            .map(|mode| vec![("taxMode", mode.as_str().to_string())])
            .unwrap_or_default()
    }
}

/// `transferBasket` parameters.
///
/// `source_basket_id` is not sent: the server identifies the source basket
/// from the previous guest session. Supplying it lets the cache drop the
/// source basket's entries once the transfer succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferBasketParams {
    pub override_existing: Option<bool>,
    pub source_basket_id: Option<BasketId>,
}

impl TransferBasketParams {
    pub(crate) fn query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_flag(&mut pairs, "overrideExisting", self.override_existing);
        pairs
    }
}

/// `mergeBasket` parameters.
///
/// `source_basket_id` is client-side only, as for [`TransferBasketParams`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeBasketParams {
    pub create_destination_basket: Option<bool>,
    pub product_item_merge_mode: Option<ProductItemMergeMode>,
    pub source_basket_id: Option<BasketId>,
}

impl MergeBasketParams {
    pub(crate) fn query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_flag(
            &mut pairs,
            "createDestinationBasket",
            self.create_destination_basket,
        );
        if let Some(mode) = self.product_item_merge_mode {
            pairs.push(("productItemMergeMode", mode.as_str().to_string()));
        }
        pairs
    }
}

/// Parameters addressing one basket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketParams {
    pub basket_id: BasketId,
}

impl BasketParams {
    #[must_use]
    pub fn new(basket_id: impl Into<BasketId>) -> Self {
        Self {
            basket_id: basket_id.into(),
        }
    }
}

/// `updateBillingAddressForBasket` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingAddressParams {
    pub basket_id: BasketId,
    pub use_as_shipping: Option<bool>,
}

impl BillingAddressParams {
    pub(crate) fn query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_flag(&mut pairs, "useAsShipping", self.use_as_shipping);
        pairs
    }
}

/// Parameters addressing one product item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemParams {
    pub basket_id: BasketId,
    pub item_id: ItemId,
}

/// Parameters addressing one shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentParams {
    pub basket_id: BasketId,
    pub shipment_id: ShipmentId,
}

/// `updateShippingAddressForShipment` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingAddressParams {
    pub basket_id: BasketId,
    pub shipment_id: ShipmentId,
    pub use_as_billing: Option<bool>,
    pub remove_external_tax: Option<bool>,
}

impl ShippingAddressParams {
    pub(crate) fn query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_flag(&mut pairs, "useAsBilling", self.use_as_billing);
        push_flag(&mut pairs, "removeExternalTax", self.remove_external_tax);
        pairs
    }
}

/// Parameters addressing one payment instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInstrumentParams {
    pub basket_id: BasketId,
    pub payment_instrument_id: PaymentInstrumentId,
}

/// Parameters addressing one coupon item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponParams {
    pub basket_id: BasketId,
    pub coupon_item_id: CouponItemId,
}

/// Parameters addressing one gift certificate item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftCertificateItemParams {
    pub basket_id: BasketId,
    pub gift_certificate_item_id: GiftCertificateItemId,
}

/// Parameters addressing one customer (Shopper Customers API).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerParams {
    pub customer_id: CustomerId,
}

impl CustomerParams {
    #[must_use]
    pub fn new(customer_id: impl Into<CustomerId>) -> Self {
        Self {
            customer_id: customer_id.into(),
        }
    }
}
