//! Basket query hooks.

use std::sync::Arc;

use commerce_query_client::{
    Basket, BasketParams, BasketsResult, CustomerParams, PaymentMethodResult, ShipmentParams,
    ShippingMethodResult, ShopperBasketsApi, ShopperCustomersApi, Taxes,
};

use super::keys;
use crate::error::QueryError;
use crate::provider::{ApiSource, CommerceProvider};

impl CommerceProvider {
    fn baskets_api(&self) -> Arc<dyn ShopperBasketsApi> {
        <Self as ApiSource<dyn ShopperBasketsApi>>::api(self)
    }

    /// `getBasket`, served from cache while fresh.
    ///
    /// # Errors
    ///
    /// Returns the API error of a failed fetch.
    pub async fn use_basket(&self, params: &BasketParams) -> Result<Basket, QueryError> {
        let api = self.baskets_api();
        let key = keys::get_basket(&self.scope(), &params.basket_id);
        self.query_client()
            .fetch_query(key, || async move { api.get_basket(params).await })
            .await
    }

    /// `getPaymentMethodsForBasket`.
    ///
    /// # Errors
    ///
    /// Returns the API error of a failed fetch.
    pub async fn use_payment_methods_for_basket(
        &self,
        params: &BasketParams,
    ) -> Result<PaymentMethodResult, QueryError> {
        let api = self.baskets_api();
        let key = keys::get_payment_methods_for_basket(&self.scope(), &params.basket_id);
        self.query_client()
            .fetch_query(key, || async move {
                api.get_payment_methods_for_basket(params).await
            })
            .await
    }

    /// `getPriceBooksForBasket`: IDs of the price books assigned to the
    /// basket.
    ///
    /// # Errors
    ///
    /// Returns the API error of a failed fetch.
    pub async fn use_price_books_for_basket(
        &self,
        params: &BasketParams,
    ) -> Result<Vec<String>, QueryError> {
        let api = self.baskets_api();
        let key = keys::get_price_books_for_basket(&self.scope(), &params.basket_id);
        self.query_client()
            .fetch_query(key, || async move { api.get_price_books_for_basket(params).await })
            .await
    }

    /// `getShippingMethodsForShipment`.
    ///
    /// # Errors
    ///
    /// Returns the API error of a failed fetch.
    pub async fn use_shipping_methods_for_shipment(
        &self,
        params: &ShipmentParams,
    ) -> Result<ShippingMethodResult, QueryError> {
        let api = self.baskets_api();
        let key = keys::get_shipping_methods_for_shipment(
            &self.scope(),
            &params.basket_id,
            &params.shipment_id,
        );
        self.query_client()
            .fetch_query(key, || async move {
                api.get_shipping_methods_for_shipment(params).await
            })
            .await
    }

    /// `getTaxesFromBasket`.
    ///
    /// # Errors
    ///
    /// Returns the API error of a failed fetch.
    pub async fn use_taxes_from_basket(&self, params: &BasketParams) -> Result<Taxes, QueryError> {
        let api = self.baskets_api();
        let key = keys::get_taxes_from_basket(&self.scope(), &params.basket_id);
        self.query_client()
            .fetch_query(key, || async move { api.get_taxes_from_basket(params).await })
            .await
    }

    /// `getCustomerBaskets` (Shopper Customers API).
    ///
    /// # Errors
    ///
    /// Returns the API error of a failed fetch.
    pub async fn use_customer_baskets(
        &self,
        params: &CustomerParams,
    ) -> Result<BasketsResult, QueryError> {
        let api = <Self as ApiSource<dyn ShopperCustomersApi>>::api(self);
        let key = keys::get_customer_baskets(&self.scope(), &params.customer_id);
        self.query_client()
            .fetch_query(key, || async move { api.get_customer_baskets(params).await })
            .await
    }
}
