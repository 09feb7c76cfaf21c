//! Shopper Baskets API client.
//!
//! One method per API operation. Writes that return the basket hand back the
//! server's recalculated document (totals, taxes and promotions included).

mod params;

pub use params::*;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::ApiError;
use crate::http::{ApiFamily, RestClient, json_body};
use crate::types::{
    Basket, CouponItem, CustomerInfo, GiftCertificateItem, OrderAddress, PaymentInstrument,
    PaymentMethodResult, ProductItem, Shipment, ShippingMethod, ShippingMethodResult, TaxItems,
    Taxes,
};

/// Operations of the Shopper Baskets API.
///
/// Implemented over HTTP by [`ShopperBasketsClient`]; tests substitute fakes.
#[async_trait]
pub trait ShopperBasketsApi: Send + Sync {
    // -------------------------------------------------------------------------
    // Basket lifecycle
    // -------------------------------------------------------------------------

    async fn create_basket(
        &self,
        params: &CreateBasketParams,
        body: &Basket,
    ) -> Result<Basket, ApiError>;

    async fn transfer_basket(&self, params: &TransferBasketParams) -> Result<Basket, ApiError>;

    async fn merge_basket(&self, params: &MergeBasketParams) -> Result<Basket, ApiError>;

    async fn delete_basket(&self, params: &BasketParams) -> Result<(), ApiError>;

    async fn update_basket(&self, params: &BasketParams, body: &Basket)
    -> Result<Basket, ApiError>;

    async fn update_billing_address_for_basket(
        &self,
        params: &BillingAddressParams,
        body: &OrderAddress,
    ) -> Result<Basket, ApiError>;

    async fn update_customer_for_basket(
        &self,
        params: &BasketParams,
        body: &CustomerInfo,
    ) -> Result<Basket, ApiError>;

    // -------------------------------------------------------------------------
    // Coupons and gift certificates
    // -------------------------------------------------------------------------

    async fn add_coupon_to_basket(
        &self,
        params: &BasketParams,
        body: &CouponItem,
    ) -> Result<Basket, ApiError>;

    async fn remove_coupon_from_basket(&self, params: &CouponParams) -> Result<Basket, ApiError>;

    async fn add_gift_certificate_item_to_basket(
        &self,
        params: &BasketParams,
        body: &GiftCertificateItem,
    ) -> Result<Basket, ApiError>;

    async fn remove_gift_certificate_item_from_basket(
        &self,
        params: &GiftCertificateItemParams,
    ) -> Result<Basket, ApiError>;

    async fn update_gift_certificate_item_in_basket(
        &self,
        params: &GiftCertificateItemParams,
        body: &GiftCertificateItem,
    ) -> Result<Basket, ApiError>;

    // -------------------------------------------------------------------------
    // Product items
    // -------------------------------------------------------------------------

    async fn add_item_to_basket(
        &self,
        params: &BasketParams,
        body: &[ProductItem],
    ) -> Result<Basket, ApiError>;

    async fn remove_item_from_basket(&self, params: &ItemParams) -> Result<Basket, ApiError>;

    async fn update_item_in_basket(
        &self,
        params: &ItemParams,
        body: &ProductItem,
    ) -> Result<Basket, ApiError>;

    async fn update_items_in_basket(
        &self,
        params: &BasketParams,
        body: &[ProductItem],
    ) -> Result<Basket, ApiError>;

    async fn add_taxes_for_basket_item(
        &self,
        params: &ItemParams,
        body: &TaxItems,
    ) -> Result<(), ApiError>;

    // -------------------------------------------------------------------------
    // Payment instruments
    // -------------------------------------------------------------------------

    async fn add_payment_instrument_to_basket(
        &self,
        params: &BasketParams,
        body: &PaymentInstrument,
    ) -> Result<Basket, ApiError>;

    async fn remove_payment_instrument_from_basket(
        &self,
        params: &PaymentInstrumentParams,
    ) -> Result<Basket, ApiError>;

    async fn update_payment_instrument_in_basket(
        &self,
        params: &PaymentInstrumentParams,
        body: &PaymentInstrument,
    ) -> Result<Basket, ApiError>;

    // -------------------------------------------------------------------------
    // Price books and taxes
    // -------------------------------------------------------------------------

    async fn add_price_books_to_basket(
        &self,
        params: &BasketParams,
        body: &[String],
    ) -> Result<(), ApiError>;

    async fn add_taxes_for_basket(&self, params: &BasketParams, body: &Taxes)
    -> Result<(), ApiError>;

    // -------------------------------------------------------------------------
    // Shipments
    // -------------------------------------------------------------------------

    async fn create_shipment_for_basket(
        &self,
        params: &BasketParams,
        body: &Shipment,
    ) -> Result<Basket, ApiError>;

    async fn remove_shipment_from_basket(
        &self,
        params: &ShipmentParams,
    ) -> Result<Basket, ApiError>;

    async fn update_shipment_for_basket(
        &self,
        params: &ShipmentParams,
        body: &Shipment,
    ) -> Result<Basket, ApiError>;

    async fn update_shipping_address_for_shipment(
        &self,
        params: &ShippingAddressParams,
        body: &OrderAddress,
    ) -> Result<Basket, ApiError>;

    async fn update_shipping_method_for_shipment(
        &self,
        params: &ShipmentParams,
        body: &ShippingMethod,
    ) -> Result<Basket, ApiError>;

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    async fn get_basket(&self, params: &BasketParams) -> Result<Basket, ApiError>;

    async fn get_payment_methods_for_basket(
        &self,
        params: &BasketParams,
    ) -> Result<PaymentMethodResult, ApiError>;

    async fn get_price_books_for_basket(
        &self,
        params: &BasketParams,
    ) -> Result<Vec<String>, ApiError>;

    async fn get_shipping_methods_for_shipment(
        &self,
        params: &ShipmentParams,
    ) -> Result<ShippingMethodResult, ApiError>;

    async fn get_taxes_from_basket(&self, params: &BasketParams) -> Result<Taxes, ApiError>;
}

// =============================================================================
// ShopperBasketsClient
// =============================================================================

/// HTTP implementation of [`ShopperBasketsApi`].
#[derive(Clone)]
pub struct ShopperBasketsClient {
    rest: RestClient,
}

impl ShopperBasketsClient {
    #[must_use]
    pub const fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let url = self.rest.endpoint(ApiFamily::ShopperBaskets, path, query)?;
        self.rest.fetch(method, url, body).await
    }

    async fn call_void(
        &self,
        method: Method,
        path: &[&str],
        body: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        let url = self.rest.endpoint(ApiFamily::ShopperBaskets, path, &[])?;
        self.rest.fetch_void(method, url, body).await
    }
}

#[async_trait]
impl ShopperBasketsApi for ShopperBasketsClient {
    #[instrument(skip(self, body))]
    async fn create_basket(
        &self,
        params: &CreateBasketParams,
        body: &Basket,
    ) -> Result<Basket, ApiError> {
        self.call(Method::POST, &["baskets"], &params.query(), json_body(body)?)
            .await
    }

    #[instrument(skip(self))]
    async fn transfer_basket(&self, params: &TransferBasketParams) -> Result<Basket, ApiError> {
        self.call(
            Method::POST,
            &["baskets", "actions", "transfer"],
            &params.query(),
            None,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn merge_basket(&self, params: &MergeBasketParams) -> Result<Basket, ApiError> {
        self.call(
            Method::POST,
            &["baskets", "actions", "merge"],
            &params.query(),
            None,
        )
        .await
    }

    #[instrument(skip(self), fields(basket_id = %params.basket_id))]
    async fn delete_basket(&self, params: &BasketParams) -> Result<(), ApiError> {
        self.call_void(Method::DELETE, &["baskets", params.basket_id.as_str()], None)
            .await
    }

    #[instrument(skip(self, body), fields(basket_id = %params.basket_id))]
    async fn update_basket(
        &self,
        params: &BasketParams,
        body: &Basket,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::PATCH,
            &["baskets", params.basket_id.as_str()],
            &[],
            json_body(body)?,
        )
        .await
    }

    #[instrument(skip(self, body), fields(basket_id = %params.basket_id))]
    async fn update_billing_address_for_basket(
        &self,
        params: &BillingAddressParams,
        body: &OrderAddress,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::PUT,
            &["baskets", params.basket_id.as_str(), "billing-address"],
            &params.query(),
            json_body(body)?,
        )
        .await
    }

    #[instrument(skip(self, body), fields(basket_id = %params.basket_id))]
    async fn update_customer_for_basket(
        &self,
        params: &BasketParams,
        body: &CustomerInfo,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::PUT,
            &["baskets", params.basket_id.as_str(), "customer"],
            &[],
            json_body(body)?,
        )
        .await
    }

    #[instrument(skip(self, body), fields(basket_id = %params.basket_id))]
    async fn add_coupon_to_basket(
        &self,
        params: &BasketParams,
        body: &CouponItem,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::POST,
            &["baskets", params.basket_id.as_str(), "coupons"],
            &[],
            json_body(body)?,
        )
        .await
    }

    #[instrument(skip(self), fields(basket_id = %params.basket_id))]
    async fn remove_coupon_from_basket(&self, params: &CouponParams) -> Result<Basket, ApiError> {
        self.call(
            Method::DELETE,
            &[
                "baskets",
                params.basket_id.as_str(),
                "coupons",
                params.coupon_item_id.as_str(),
            ],
            &[],
            None,
        )
        .await
    }

    #[instrument(skip(self, body), fields(basket_id = %params.basket_id))]
    async fn add_gift_certificate_item_to_basket(
        &self,
        params: &BasketParams,
        body: &GiftCertificateItem,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::POST,
            &["baskets", params.basket_id.as_str(), "gift-certificate-items"],
            &[],
            json_body(body)?,
        )
        .await
    }

    #[instrument(skip(self), fields(basket_id = %params.basket_id))]
    async fn remove_gift_certificate_item_from_basket(
        &self,
        params: &GiftCertificateItemParams,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::DELETE,
            &[
                "baskets",
                params.basket_id.as_str(),
                "gift-certificate-items",
                params.gift_certificate_item_id.as_str(),
            ],
            &[],
            None,
        )
        .await
    }

    #[instrument(skip(self, body), fields(basket_id = %params.basket_id))]
    async fn update_gift_certificate_item_in_basket(
        &self,
        params: &GiftCertificateItemParams,
        body: &GiftCertificateItem,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::PATCH,
            &[
                "baskets",
                params.basket_id.as_str(),
                "gift-certificate-items",
                params.gift_certificate_item_id.as_str(),
            ],
            &[],
            json_body(body)?,
        )
        .await
    }

    #[instrument(skip(self, body), fields(basket_id = %params.basket_id, items = body.len()))]
    async fn add_item_to_basket(
        &self,
        params: &BasketParams,
        body: &[ProductItem],
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::POST,
            &["baskets", params.basket_id.as_str(), "items"],
            &[],
            json_body(body)?,
        )
        .await
    }

    #[instrument(
        skip(self),
        fields(basket_id = %params.basket_id, item_id = %params.item_id)
    )]
    async fn remove_item_from_basket(&self, params: &ItemParams) -> Result<Basket, ApiError> {
        self.call(
            Method::DELETE,
            &[
                "baskets",
                params.basket_id.as_str(),
                "items",
                params.item_id.as_str(),
            ],
            &[],
            None,
        )
        .await
    }

    #[instrument(
        skip(self, body),
        fields(basket_id = %params.basket_id, item_id = %params.item_id)
    )]
    async fn update_item_in_basket(
        &self,
        params: &ItemParams,
        body: &ProductItem,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::PATCH,
            &[
                "baskets",
                params.basket_id.as_str(),
                "items",
                params.item_id.as_str(),
            ],
            &[],
            json_body(body)?,
        )
        .await
    }

    #[instrument(skip(self, body), fields(basket_id = %params.basket_id, items = body.len()))]
    async fn update_items_in_basket(
        &self,
        params: &BasketParams,
        body: &[ProductItem],
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::PATCH,
            &["baskets", params.basket_id.as_str(), "items"],
            &[],
            json_body(body)?,
        )
        .await
    }

    #[instrument(
        skip(self, body),
        fields(basket_id = %params.basket_id, item_id = %params.item_id)
    )]
    async fn add_taxes_for_basket_item(
        &self,
        params: &ItemParams,
        body: &TaxItems,
    ) -> Result<(), ApiError> {
        self.call_void(
            Method::PUT,
            &[
                "baskets",
                params.basket_id.as_str(),
                "items",
                params.item_id.as_str(),
                "taxes",
            ],
            json_body(body)?,
        )
        .await
    }

    #[instrument(skip(self, body), fields(basket_id = %params.basket_id))]
    async fn add_payment_instrument_to_basket(
        &self,
        params: &BasketParams,
        body: &PaymentInstrument,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::POST,
            &["baskets", params.basket_id.as_str(), "payment-instruments"],
            &[],
            json_body(body)?,
        )
        .await
    }

    #[instrument(skip(self), fields(basket_id = %params.basket_id))]
    async fn remove_payment_instrument_from_basket(
        &self,
        params: &PaymentInstrumentParams,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::DELETE,
            &[
                "baskets",
                params.basket_id.as_str(),
                "payment-instruments",
                params.payment_instrument_id.as_str(),
            ],
            &[],
            None,
        )
        .await
    }

    #[instrument(skip(self, body), fields(basket_id = %params.basket_id))]
    async fn update_payment_instrument_in_basket(
        &self,
        params: &PaymentInstrumentParams,
        body: &PaymentInstrument,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::PATCH,
            &[
                "baskets",
                params.basket_id.as_str(),
                "payment-instruments",
                params.payment_instrument_id.as_str(),
            ],
            &[],
            json_body(body)?,
        )
        .await
    }

    #[instrument(skip(self, body), fields(basket_id = %params.basket_id))]
    async fn add_price_books_to_basket(
        &self,
        params: &BasketParams,
        body: &[String],
    ) -> Result<(), ApiError> {
        self.call_void(
            Method::PUT,
            &["baskets", params.basket_id.as_str(), "price-books"],
            json_body(body)?,
        )
        .await
    }

    #[instrument(skip(self, body), fields(basket_id = %params.basket_id))]
    async fn add_taxes_for_basket(
        &self,
        params: &BasketParams,
        body: &Taxes,
    ) -> Result<(), ApiError> {
        self.call_void(
            Method::PUT,
            &["baskets", params.basket_id.as_str(), "taxes"],
            json_body(body)?,
        )
        .await
    }

    #[instrument(skip(self, body), fields(basket_id = %params.basket_id))]
    async fn create_shipment_for_basket(
        &self,
        params: &BasketParams,
        body: &Shipment,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::POST,
            &["baskets", params.basket_id.as_str(), "shipments"],
            &[],
            json_body(body)?,
        )
        .await
    }

    #[instrument(
        skip(self),
        fields(basket_id = %params.basket_id, shipment_id = %params.shipment_id)
    )]
    async fn remove_shipment_from_basket(
        &self,
        params: &ShipmentParams,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::DELETE,
            &[
                "baskets",
                params.basket_id.as_str(),
                "shipments",
                params.shipment_id.as_str(),
            ],
            &[],
            None,
        )
        .await
    }

    #[instrument(
        skip(self, body),
        fields(basket_id = %params.basket_id, shipment_id = %params.shipment_id)
    )]
    async fn update_shipment_for_basket(
        &self,
        params: &ShipmentParams,
        body: &Shipment,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::PATCH,
            &[
                "baskets",
                params.basket_id.as_str(),
                "shipments",
                params.shipment_id.as_str(),
            ],
            &[],
            json_body(body)?,
        )
        .await
    }

    #[instrument(
        skip(self, body),
        fields(basket_id = %params.basket_id, shipment_id = %params.shipment_id)
    )]
    async fn update_shipping_address_for_shipment(
        &self,
        params: &ShippingAddressParams,
        body: &OrderAddress,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::PUT,
            &[
                "baskets",
                params.basket_id.as_str(),
                "shipments",
                params.shipment_id.as_str(),
                "shipping-address",
            ],
            &params.query(),
            json_body(body)?,
        )
        .await
    }

    #[instrument(
        skip(self, body),
        fields(basket_id = %params.basket_id, shipment_id = %params.shipment_id)
    )]
    async fn update_shipping_method_for_shipment(
        &self,
        params: &ShipmentParams,
        body: &ShippingMethod,
    ) -> Result<Basket, ApiError> {
        self.call(
            Method::PUT,
            &[
                "baskets",
                params.basket_id.as_str(),
                "shipments",
                params.shipment_id.as_str(),
                "shipping-method",
            ],
            &[],
            json_body(body)?,
        )
        .await
    }

    #[instrument(skip(self), fields(basket_id = %params.basket_id))]
    async fn get_basket(&self, params: &BasketParams) -> Result<Basket, ApiError> {
        self.call(Method::GET, &["baskets", params.basket_id.as_str()], &[], None)
            .await
    }

    #[instrument(skip(self), fields(basket_id = %params.basket_id))]
    async fn get_payment_methods_for_basket(
        &self,
        params: &BasketParams,
    ) -> Result<PaymentMethodResult, ApiError> {
        self.call(
            Method::GET,
            &["baskets", params.basket_id.as_str(), "payment-methods"],
            &[],
            None,
        )
        .await
    }

    #[instrument(skip(self), fields(basket_id = %params.basket_id))]
    async fn get_price_books_for_basket(
        &self,
        params: &BasketParams,
    ) -> Result<Vec<String>, ApiError> {
        self.call(
            Method::GET,
            &["baskets", params.basket_id.as_str(), "price-books"],
            &[],
            None,
        )
        .await
    }

    #[instrument(
        skip(self),
        fields(basket_id = %params.basket_id, shipment_id = %params.shipment_id)
    )]
    async fn get_shipping_methods_for_shipment(
        &self,
        params: &ShipmentParams,
    ) -> Result<ShippingMethodResult, ApiError> {
        self.call(
            Method::GET,
            &[
                "baskets",
                params.basket_id.as_str(),
                "shipments",
                params.shipment_id.as_str(),
                "shipping-methods",
            ],
            &[],
            None,
        )
        .await
    }

    #[instrument(skip(self), fields(basket_id = %params.basket_id))]
    async fn get_taxes_from_basket(&self, params: &BasketParams) -> Result<Taxes, ApiError> {
        self.call(
            Method::GET,
            &["baskets", params.basket_id.as_str(), "taxes"],
            &[],
            None,
        )
        .await
    }
}
