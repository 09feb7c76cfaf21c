//! In-memory API fakes that record every call.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use commerce_query_client::{
    ApiError, ApiFault, Basket, BasketParams, BasketsResult, BillingAddressParams,
    CommerceConfig, ContextParams, CouponItem, CouponParams, CreateBasketParams, CustomerInfo,
    CustomerParams, GiftCertificateItem, GiftCertificateItemParams, ItemParams, MergeBasketParams,
    OrderAddress, PaymentInstrument, PaymentInstrumentParams, PaymentMethodResult, ProductItem,
    Shipment, ShipmentParams, ShippingAddressParams, ShippingMethod, ShippingMethodResult,
    ShopperBasketsApi, ShopperContext, ShopperContextsApi, ShopperCustomersApi, StaticToken,
    TaxItems, Taxes, TransferBasketParams,
};
use commerce_query_core::{BasketId, CustomerId};

use crate::provider::{Apis, CommerceProvider};

/// Call log shared by the fakes.
#[derive(Default)]
pub struct Calls {
    log: Mutex<Vec<&'static str>>,
    fail_with: Mutex<Option<u16>>,
}

impl Calls {
    pub fn names(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    /// Make every following call fail with `status`.
    pub fn fail_with(&self, status: u16) {
        *self.fail_with.lock().unwrap() = Some(status);
    }

    fn record(&self, op: &'static str) -> Result<(), ApiError> {
        self.log.lock().unwrap().push(op);
        match *self.fail_with.lock().unwrap() {
            Some(status) => Err(ApiError::Status {
                status,
                fault: ApiFault {
                    type_: Some(
                        "https://api.commercecloud.salesforce.com/documentation/error/v1/errors/invalid-request"
                            .to_string(),
                    ),
                    title: Some("Bad Request".to_string()),
                    detail: Some(format!("{op} rejected")),
                },
            }),
            None => Ok(()),
        }
    }
}

pub fn sample_basket(id: &str) -> Basket {
    Basket {
        basket_id: Some(BasketId::new(id)),
        customer_info: Some(CustomerInfo {
            customer_id: Some(CustomerId::new("c1")),
            ..CustomerInfo::default()
        }),
        product_items: vec![ProductItem::new("25592770M", 1)],
        ..Basket::default()
    }
}

pub struct FakeBaskets {
    pub calls: Calls,
    pub basket: Basket,
}

impl FakeBaskets {
    pub fn new(basket: Basket) -> Self {
        Self {
            calls: Calls::default(),
            basket,
        }
    }

    fn respond(&self, op: &'static str) -> Result<Basket, ApiError> {
        self.calls.record(op)?;
        Ok(self.basket.clone())
    }
}

#[async_trait]
impl ShopperBasketsApi for FakeBaskets {
    async fn create_basket(&self, _: &CreateBasketParams, _: &Basket) -> Result<Basket, ApiError> {
        self.respond("createBasket")
    }

    async fn transfer_basket(&self, _: &TransferBasketParams) -> Result<Basket, ApiError> {
        self.respond("transferBasket")
    }

    async fn merge_basket(&self, _: &MergeBasketParams) -> Result<Basket, ApiError> {
        self.respond("mergeBasket")
    }

    async fn delete_basket(&self, _: &BasketParams) -> Result<(), ApiError> {
        self.calls.record("deleteBasket")
    }

    async fn update_basket(&self, _: &BasketParams, _: &Basket) -> Result<Basket, ApiError> {
        self.respond("updateBasket")
    }

    async fn update_billing_address_for_basket(
        &self,
        _: &BillingAddressParams,
        _: &OrderAddress,
    ) -> Result<Basket, ApiError> {
        self.respond("updateBillingAddressForBasket")
    }

    async fn update_customer_for_basket(
        &self,
        _: &BasketParams,
        _: &CustomerInfo,
    ) -> Result<Basket, ApiError> {
        self.respond("updateCustomerForBasket")
    }

    async fn add_coupon_to_basket(
        &self,
        _: &BasketParams,
        _: &CouponItem,
    ) -> Result<Basket, ApiError> {
        self.respond("addCouponToBasket")
    }

    async fn remove_coupon_from_basket(&self, _: &CouponParams) -> Result<Basket, ApiError> {
        self.respond("removeCouponFromBasket")
    }

    async fn add_gift_certificate_item_to_basket(
        &self,
        _: &BasketParams,
        _: &GiftCertificateItem,
    ) -> Result<Basket, ApiError> {
        self.respond("addGiftCertificateItemToBasket")
    }

    async fn remove_gift_certificate_item_from_basket(
        &self,
        _: &GiftCertificateItemParams,
    ) -> Result<Basket, ApiError> {
        self.respond("removeGiftCertificateItemFromBasket")
    }

    async fn update_gift_certificate_item_in_basket(
        &self,
        _: &GiftCertificateItemParams,
        _: &GiftCertificateItem,
    ) -> Result<Basket, ApiError> {
        self.respond("updateGiftCertificateItemInBasket")
    }

    async fn add_item_to_basket(
        &self,
        _: &BasketParams,
        _: &[ProductItem],
    ) -> Result<Basket, ApiError> {
        self.respond("addItemToBasket")
    }

    async fn remove_item_from_basket(&self, _: &ItemParams) -> Result<Basket, ApiError> {
        self.respond("removeItemFromBasket")
    }

    async fn update_item_in_basket(
        &self,
        _: &ItemParams,
        _: &ProductItem,
    ) -> Result<Basket, ApiError> {
        self.respond("updateItemInBasket")
    }

    async fn update_items_in_basket(
        &self,
        _: &BasketParams,
        _: &[ProductItem],
    ) -> Result<Basket, ApiError> {
        self.respond("updateItemsInBasket")
    }

    async fn add_taxes_for_basket_item(
        &self,
        _: &ItemParams,
        _: &TaxItems,
    ) -> Result<(), ApiError> {
        self.calls.record("addTaxesForBasketItem")
    }

    async fn add_payment_instrument_to_basket(
        &self,
        _: &BasketParams,
        _: &PaymentInstrument,
    ) -> Result<Basket, ApiError> {
        self.respond("addPaymentInstrumentToBasket")
    }

    async fn remove_payment_instrument_from_basket(
        &self,
        _: &PaymentInstrumentParams,
    ) -> Result<Basket, ApiError> {
        self.respond("removePaymentInstrumentFromBasket")
    }

    async fn update_payment_instrument_in_basket(
        &self,
        _: &PaymentInstrumentParams,
        _: &PaymentInstrument,
    ) -> Result<Basket, ApiError> {
        self.respond("updatePaymentInstrumentInBasket")
    }

    async fn add_price_books_to_basket(
        &self,
        _: &BasketParams,
        _: &[String],
    ) -> Result<(), ApiError> {
        self.calls.record("addPriceBooksToBasket")
    }

    async fn add_taxes_for_basket(&self, _: &BasketParams, _: &Taxes) -> Result<(), ApiError> {
        self.calls.record("addTaxesForBasket")
    }

    async fn create_shipment_for_basket(
        &self,
        _: &BasketParams,
        _: &Shipment,
    ) -> Result<Basket, ApiError> {
        self.respond("createShipmentForBasket")
    }

    async fn remove_shipment_from_basket(&self, _: &ShipmentParams) -> Result<Basket, ApiError> {
        self.respond("removeShipmentFromBasket")
    }

    async fn update_shipment_for_basket(
        &self,
        _: &ShipmentParams,
        _: &Shipment,
    ) -> Result<Basket, ApiError> {
        self.respond("updateShipmentForBasket")
    }

    async fn update_shipping_address_for_shipment(
        &self,
        _: &ShippingAddressParams,
        _: &OrderAddress,
    ) -> Result<Basket, ApiError> {
        self.respond("updateShippingAddressForShipment")
    }

    async fn update_shipping_method_for_shipment(
        &self,
        _: &ShipmentParams,
        _: &ShippingMethod,
    ) -> Result<Basket, ApiError> {
        self.respond("updateShippingMethodForShipment")
    }

    async fn get_basket(&self, _: &BasketParams) -> Result<Basket, ApiError> {
        self.respond("getBasket")
    }

    async fn get_payment_methods_for_basket(
        &self,
        _: &BasketParams,
    ) -> Result<PaymentMethodResult, ApiError> {
        self.calls.record("getPaymentMethodsForBasket")?;
        Ok(PaymentMethodResult::default())
    }

    async fn get_price_books_for_basket(&self, _: &BasketParams) -> Result<Vec<String>, ApiError> {
        self.calls.record("getPriceBooksForBasket")?;
        Ok(vec!["usd-list-prices".to_string()])
    }

    async fn get_shipping_methods_for_shipment(
        &self,
        _: &ShipmentParams,
    ) -> Result<ShippingMethodResult, ApiError> {
        self.calls.record("getShippingMethodsForShipment")?;
        Ok(ShippingMethodResult::default())
    }

    async fn get_taxes_from_basket(&self, _: &BasketParams) -> Result<Taxes, ApiError> {
        self.calls.record("getTaxesFromBasket")?;
        Ok(Taxes::default())
    }
}

pub struct FakeCustomers {
    pub calls: Calls,
    pub baskets: BasketsResult,
}

#[async_trait]
impl ShopperCustomersApi for FakeCustomers {
    async fn get_customer_baskets(&self, _: &CustomerParams) -> Result<BasketsResult, ApiError> {
        self.calls.record("getCustomerBaskets")?;
        Ok(self.baskets.clone())
    }
}

pub struct FakeContexts {
    pub calls: Calls,
    pub context: ShopperContext,
}

#[async_trait]
impl ShopperContextsApi for FakeContexts {
    async fn create_shopper_context(
        &self,
        _: &ContextParams,
        _: &ShopperContext,
    ) -> Result<(), ApiError> {
        self.calls.record("createShopperContext")
    }

    async fn update_shopper_context(
        &self,
        _: &ContextParams,
        _: &ShopperContext,
    ) -> Result<ShopperContext, ApiError> {
        self.calls.record("updateShopperContext")?;
        Ok(self.context.clone())
    }

    async fn delete_shopper_context(&self, _: &ContextParams) -> Result<(), ApiError> {
        self.calls.record("deleteShopperContext")
    }

    async fn get_shopper_context(&self, _: &ContextParams) -> Result<ShopperContext, ApiError> {
        self.calls.record("getShopperContext")?;
        Ok(self.context.clone())
    }
}

/// Provider wired to fakes, authenticated as customer `c1`.
pub struct Harness {
    pub provider: CommerceProvider,
    pub baskets: Arc<FakeBaskets>,
    pub customers: Arc<FakeCustomers>,
    pub contexts: Arc<FakeContexts>,
}

impl Harness {
    pub fn new() -> Self {
        let baskets = Arc::new(FakeBaskets::new(sample_basket("b1")));
        let customers = Arc::new(FakeCustomers {
            calls: Calls::default(),
            baskets: BasketsResult {
                baskets: vec![sample_basket("b0"), sample_basket("b1")],
                total: 2,
            },
        });
        let contexts = Arc::new(FakeContexts {
            calls: Calls::default(),
            context: ShopperContext {
                source_code: Some("instagram".to_string()),
                ..ShopperContext::default()
            },
        });

        let config = CommerceConfig::new("f_ecom_zzrf_001", "RefArch", "http://localhost:1");
        let auth = StaticToken::new("test-token").with_customer_id(CustomerId::new("c1"));
        let apis = Apis {
            shopper_baskets: baskets.clone(),
            shopper_customers: customers.clone(),
            shopper_contexts: contexts.clone(),
        };

        Self {
            provider: CommerceProvider::new(&config, apis, Arc::new(auth)),
            baskets,
            customers,
            contexts,
        }
    }
}
