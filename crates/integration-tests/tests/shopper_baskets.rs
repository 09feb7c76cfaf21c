//! Integration tests for basket mutations and reads.
//!
//! Every hook runs through the real HTTP clients against [`StubApi`], so
//! these cover request shape, error mapping and the cache plan together.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use commerce_query::shopper_baskets::{
    AddCouponToBasket, AddGiftCertificateItemToBasket, AddItemToBasket,
    AddPaymentInstrumentToBasket, AddPriceBooksToBasket, AddTaxesForBasket,
    AddTaxesForBasketItem, CreateBasket, CreateShipmentForBasket, DeleteBasket, MergeBasket,
    RemoveCouponFromBasket, RemoveGiftCertificateItemFromBasket, RemoveItemFromBasket,
    RemovePaymentInstrumentFromBasket, RemoveShipmentFromBasket, TransferBasket, UpdateBasket,
    UpdateBillingAddressForBasket, UpdateCustomerForBasket, UpdateGiftCertificateItemInBasket,
    UpdateItemInBasket, UpdateItemsInBasket, UpdatePaymentInstrumentInBasket,
    UpdateShipmentForBasket, UpdateShippingAddressForShipment, UpdateShippingMethodForShipment,
    keys,
};
use commerce_query::{CommerceProvider, MutationOptions};
use commerce_query_client::{
    ApiError, Basket, BasketParams, BasketsResult, BillingAddressParams, ContextParams, CouponItem,
    CouponParams, CreateBasketParams, CustomerInfo, CustomerParams, GiftCertificateItem,
    GiftCertificateItemParams, ItemParams, MergeBasketParams, OrderAddress, PaymentInstrument,
    PaymentInstrumentParams, ProductItem, Shipment, ShipmentParams, ShippingAddressParams,
    ShippingMethod, ShopperContext, TaxItems, Taxes, TransferBasketParams,
};
use commerce_query_core::{
    BasketId, CouponItemId, CustomerId, GiftCertificateItemId, ItemId, MutationStatus,
    PaymentInstrumentId, QueryStatus, ShipmentId,
};
use commerce_query::shopper_contexts::UpdateShopperContext;
use commerce_query_integration_tests::{
    BASKET_ID, CUSTOMER_ID, SITE_ID, StubApi, TOKEN, USID, basket_json,
};

// =============================================================================
// Fixtures
// =============================================================================

fn basket_params() -> BasketParams {
    BasketParams::new(BASKET_ID)
}

fn item_params() -> ItemParams {
    ItemParams {
        basket_id: BasketId::new(BASKET_ID),
        item_id: ItemId::new("b4f3c1"),
    }
}

fn shipment_params() -> ShipmentParams {
    ShipmentParams {
        basket_id: BasketId::new(BASKET_ID),
        shipment_id: ShipmentId::new("me"),
    }
}

fn payment_params() -> PaymentInstrumentParams {
    PaymentInstrumentParams {
        basket_id: BasketId::new(BASKET_ID),
        payment_instrument_id: PaymentInstrumentId::new("pi-1"),
    }
}

fn gift_params() -> GiftCertificateItemParams {
    GiftCertificateItemParams {
        basket_id: BasketId::new(BASKET_ID),
        gift_certificate_item_id: GiftCertificateItemId::new("gc-1"),
    }
}

fn address() -> OrderAddress {
    OrderAddress {
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        city: Some("Boston".to_string()),
        country_code: Some("US".to_string()),
        ..OrderAddress::default()
    }
}

/// What a successful call must hand back.
trait Payload {
    fn check(&self);
}

impl Payload for Basket {
    fn check(&self) {
        let expected: Self = serde_json::from_value(basket_json()).unwrap();
        assert_eq!(*self, expected);
    }
}

impl Payload for () {
    fn check(&self) {}
}

/// Expands `$each!(Marker, options)` for all 27 basket writes.
macro_rules! every_basket_mutation {
    ($each:ident, $stub:expr, $provider:expr) => {
        $each!($stub, $provider, CreateBasket, MutationOptions::with_body(
            CreateBasketParams::default(),
            Basket::default(),
        ));
        $each!($stub, $provider, TransferBasket, MutationOptions::new(
            TransferBasketParams::default(),
        ));
        $each!($stub, $provider, MergeBasket, MutationOptions::new(
            MergeBasketParams::default(),
        ));
        $each!($stub, $provider, DeleteBasket, MutationOptions::new(basket_params()));
        $each!($stub, $provider, UpdateBasket, MutationOptions::with_body(
            basket_params(),
            Basket::default(),
        ));
        $each!($stub, $provider, UpdateBillingAddressForBasket, MutationOptions::with_body(
            BillingAddressParams {
                basket_id: BasketId::new(BASKET_ID),
                use_as_shipping: Some(true),
            },
            address(),
        ));
        $each!($stub, $provider, AddCouponToBasket, MutationOptions::with_body(
            basket_params(),
            CouponItem::new("SPRING10"),
        ));
        $each!($stub, $provider, RemoveCouponFromBasket, MutationOptions::new(CouponParams {
            basket_id: BasketId::new(BASKET_ID),
            coupon_item_id: CouponItemId::new("cp-1"),
        }));
        $each!($stub, $provider, UpdateCustomerForBasket, MutationOptions::with_body(
            basket_params(),
            CustomerInfo {
                email: Some("jane@example.com".to_string()),
                ..CustomerInfo::default()
            },
        ));
        $each!($stub, $provider, AddGiftCertificateItemToBasket, MutationOptions::with_body(
            basket_params(),
            GiftCertificateItem::default(),
        ));
        $each!($stub, $provider, RemoveGiftCertificateItemFromBasket, MutationOptions::new(
            gift_params(),
        ));
        $each!($stub, $provider, UpdateGiftCertificateItemInBasket, MutationOptions::with_body(
            gift_params(),
            GiftCertificateItem::default(),
        ));
        $each!($stub, $provider, AddItemToBasket, MutationOptions::with_body(
            basket_params(),
            vec![ProductItem::new("25592770M", 2)],
        ));
        $each!($stub, $provider, RemoveItemFromBasket, MutationOptions::new(item_params()));
        $each!($stub, $provider, UpdateItemInBasket, MutationOptions::with_body(
            item_params(),
            ProductItem::new("25592770M", 3),
        ));
        $each!($stub, $provider, UpdateItemsInBasket, MutationOptions::with_body(
            basket_params(),
            vec![ProductItem::new("25592770M", 1)],
        ));
        $each!($stub, $provider, AddTaxesForBasketItem, MutationOptions::with_body(
            item_params(),
            TaxItems::default(),
        ));
        $each!($stub, $provider, AddPaymentInstrumentToBasket, MutationOptions::with_body(
            basket_params(),
            PaymentInstrument::default(),
        ));
        $each!($stub, $provider, RemovePaymentInstrumentFromBasket, MutationOptions::new(
            payment_params(),
        ));
        $each!($stub, $provider, UpdatePaymentInstrumentInBasket, MutationOptions::with_body(
            payment_params(),
            PaymentInstrument::default(),
        ));
        $each!($stub, $provider, AddPriceBooksToBasket, MutationOptions::with_body(
            basket_params(),
            vec!["usd-sale-prices".to_string()],
        ));
        $each!($stub, $provider, CreateShipmentForBasket, MutationOptions::with_body(
            basket_params(),
            Shipment::default(),
        ));
        $each!($stub, $provider, RemoveShipmentFromBasket, MutationOptions::new(
            shipment_params(),
        ));
        $each!($stub, $provider, UpdateShipmentForBasket, MutationOptions::with_body(
            shipment_params(),
            Shipment::default(),
        ));
        $each!($stub, $provider, UpdateShippingAddressForShipment, MutationOptions::with_body(
            ShippingAddressParams {
                basket_id: BasketId::new(BASKET_ID),
                shipment_id: ShipmentId::new("me"),
                use_as_billing: None,
                remove_external_tax: None,
            },
            address(),
        ));
        $each!($stub, $provider, UpdateShippingMethodForShipment, MutationOptions::with_body(
            shipment_params(),
            ShippingMethod {
                id: "001".to_string(),
                ..ShippingMethod::default()
            },
        ));
        $each!($stub, $provider, AddTaxesForBasket, MutationOptions::with_body(
            basket_params(),
            Taxes::default(),
        ));
    };
}

macro_rules! assert_succeeds {
    ($stub:expr, $provider:expr, $mutation:ident, $options:expr) => {{
        $stub.clear_requests();
        let hook = $provider.use_mutation::<$mutation>();

        let data = hook.mutate($options).await.unwrap();
        data.check();
        assert_eq!(hook.status(), MutationStatus::Success, "{}", hook.name());
        assert!(hook.error().is_none());

        let requests = $stub.requests();
        assert_eq!(requests.len(), 1, "{} must send one request", hook.name());
        let request = requests.first().unwrap();
        assert_eq!(
            request.authorization.as_deref(),
            Some(format!("Bearer {TOKEN}").as_str())
        );
        assert_eq!(request.query_param("siteId").as_deref(), Some(SITE_ID));
    }};
}

macro_rules! assert_fails_cleanly {
    ($stub:expr, $provider:expr, $mutation:ident, $options:expr) => {{
        let before = cache_snapshot(&$provider).await;
        let hook = $provider.use_mutation::<$mutation>();

        let err = hook.mutate($options).await.unwrap_err();
        assert!(
            matches!(*err, ApiError::Status { status: 400, .. }),
            "{}: {err}",
            hook.name()
        );
        assert_eq!(hook.status(), MutationStatus::Error);
        assert!(hook.data().is_none());
        assert!(hook.error().is_some());
        assert_eq!(
            cache_snapshot(&$provider).await,
            before,
            "{} touched the cache on failure",
            hook.name()
        );
    }};
}

/// Keys with their status, in key order.
async fn cache_snapshot(provider: &CommerceProvider) -> Vec<(String, QueryStatus)> {
    let client = provider.query_client();
    let mut snapshot = Vec::new();
    for key in client.cache().keys() {
        let status = client.query_status(&key).await;
        snapshot.push((key.to_string(), status));
    }
    snapshot
}

/// Read the basket, its list and one derived read so the cache is primed.
async fn prime(provider: &CommerceProvider) {
    provider.use_basket(&basket_params()).await.unwrap();
    provider
        .use_customer_baskets(&CustomerParams::new(CUSTOMER_ID))
        .await
        .unwrap();
    provider
        .use_price_books_for_basket(&basket_params())
        .await
        .unwrap();
}

// =============================================================================
// Every Mutation
// =============================================================================

#[tokio::test]
async fn test_every_basket_mutation_sends_one_authenticated_request() {
    let stub = StubApi::start().await.unwrap();
    let provider = stub.provider().unwrap();

    every_basket_mutation!(assert_succeeds, stub, provider);
}

#[tokio::test]
async fn test_every_basket_mutation_leaves_cache_alone_on_failure() {
    let stub = StubApi::start().await.unwrap();
    let provider = stub.provider().unwrap();
    prime(&provider).await;
    stub.fail_with(StatusCode::BAD_REQUEST);

    every_basket_mutation!(assert_fails_cleanly, stub, provider);
}

// =============================================================================
// Request Shape
// =============================================================================

#[tokio::test]
async fn test_add_item_posts_product_items() {
    let stub = StubApi::start().await.unwrap();
    let provider = stub.provider().unwrap();

    provider
        .use_mutation::<AddItemToBasket>()
        .mutate(MutationOptions::with_body(
            basket_params(),
            vec![ProductItem::new("25592770M", 2)],
        ))
        .await
        .unwrap();

    let request = stub.requests().pop().unwrap();
    assert_eq!(request.method.as_str(), "POST");
    assert!(
        request
            .path
            .ends_with(&format!("/baskets/{BASKET_ID}/items")),
        "{}",
        request.path
    );
    let body = request.body.unwrap();
    assert_eq!(body[0]["productId"], "25592770M");
    assert_eq!(body[0]["quantity"], 2);
}

#[tokio::test]
async fn test_merge_sends_flags_but_not_source_basket() {
    let stub = StubApi::start().await.unwrap();
    let provider = stub.provider().unwrap();

    provider
        .use_mutation::<MergeBasket>()
        .mutate(MutationOptions::new(MergeBasketParams {
            create_destination_basket: Some(true),
            product_item_merge_mode: None,
            source_basket_id: Some(BasketId::new("guest-basket")),
        }))
        .await
        .unwrap();

    let request = stub.requests().pop().unwrap();
    assert!(request.path.ends_with("/baskets/actions/merge"));
    assert_eq!(
        request.query_param("createDestinationBasket").as_deref(),
        Some("true")
    );
    assert!(request.query_param("sourceBasketId").is_none());
}

// =============================================================================
// Cache Plans
// =============================================================================

#[tokio::test]
async fn test_query_hooks_fetch_once_while_fresh() {
    let stub = StubApi::start().await.unwrap();
    let provider = stub.provider().unwrap();

    let first = provider.use_basket(&basket_params()).await.unwrap();
    let second = provider.use_basket(&basket_params()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(stub.request_count(), 1);

    let methods = provider
        .use_shipping_methods_for_shipment(&shipment_params())
        .await
        .unwrap();
    assert_eq!(methods.default_shipping_method_id.as_deref(), Some("001"));
    let taxes = provider.use_taxes_from_basket(&basket_params()).await.unwrap();
    assert!(taxes.taxes.contains_key("b4f3c1"));
    let payment = provider
        .use_payment_methods_for_basket(&basket_params())
        .await
        .unwrap();
    assert_eq!(payment.applicable_payment_methods.len(), 1);
    assert_eq!(stub.request_count(), 4);
}

#[tokio::test]
async fn test_failed_read_is_not_cached() {
    let stub = StubApi::start().await.unwrap();
    let provider = stub.provider().unwrap();
    let key = keys::get_basket(&provider.scope(), &BasketId::new(BASKET_ID));

    stub.fail_with(StatusCode::NOT_FOUND);
    assert!(provider.use_basket(&basket_params()).await.is_err());
    assert_eq!(
        provider.query_client().query_status(&key).await,
        QueryStatus::Missing
    );

    stub.recover();
    provider.use_basket(&basket_params()).await.unwrap();
    assert_eq!(
        provider.query_client().query_status(&key).await,
        QueryStatus::Fresh
    );
}

#[tokio::test]
async fn test_create_invalidates_customer_baskets() {
    let stub = StubApi::start().await.unwrap();
    let provider = stub.provider().unwrap();
    prime(&provider).await;
    let client = provider.query_client();
    let list = keys::get_customer_baskets(&provider.scope(), &CustomerId::new(CUSTOMER_ID));

    provider
        .use_mutation::<CreateBasket>()
        .mutate(MutationOptions::with_body(
            CreateBasketParams::default(),
            Basket::default(),
        ))
        .await
        .unwrap();

    assert!(client.is_stale(&list).await);

    // The next read refetches the list.
    stub.clear_requests();
    provider
        .use_customer_baskets(&CustomerParams::new(CUSTOMER_ID))
        .await
        .unwrap();
    assert_eq!(stub.request_count(), 1);
}

#[tokio::test]
async fn test_item_write_rewrites_basket_and_list() {
    let stub = StubApi::start().await.unwrap();
    let provider = stub.provider().unwrap();
    prime(&provider).await;
    let client = provider.query_client();
    let scope = provider.scope();
    let basket_id = BasketId::new(BASKET_ID);

    let returned = provider
        .use_mutation::<UpdateItemInBasket>()
        .mutate(MutationOptions::with_body(
            item_params(),
            ProductItem::new("25592770M", 3),
        ))
        .await
        .unwrap();

    let basket_key = keys::get_basket(&scope, &basket_id);
    let cached: Basket = client.get_query_data(&basket_key).await.unwrap().unwrap();
    assert_eq!(cached, returned);
    assert!(client.is_stale(&basket_key).await);
    assert!(
        client
            .is_stale(&keys::get_price_books_for_basket(&scope, &basket_id))
            .await
    );

    let list_key = keys::get_customer_baskets(&scope, &CustomerId::new(CUSTOMER_ID));
    let list: BasketsResult = client.get_query_data(&list_key).await.unwrap().unwrap();
    assert_eq!(list.baskets, vec![returned]);
    assert_eq!(client.query_status(&list_key).await, QueryStatus::Fresh);
}

#[tokio::test]
async fn test_item_write_keeps_stale_list_stale() {
    let stub = StubApi::start().await.unwrap();
    let provider = stub.provider().unwrap();
    prime(&provider).await;
    let client = provider.query_client();
    let list_key = keys::get_customer_baskets(&provider.scope(), &CustomerId::new(CUSTOMER_ID));

    provider
        .use_mutation::<UpdateShopperContext>()
        .mutate(MutationOptions::with_body(
            ContextParams::new(USID),
            ShopperContext::default(),
        ))
        .await
        .unwrap();
    assert_eq!(client.query_status(&list_key).await, QueryStatus::Stale);

    let returned = provider
        .use_mutation::<UpdateItemInBasket>()
        .mutate(MutationOptions::with_body(
            item_params(),
            ProductItem::new("25592770M", 3),
        ))
        .await
        .unwrap();

    let list: BasketsResult = client.get_query_data(&list_key).await.unwrap().unwrap();
    assert_eq!(list.baskets, vec![returned]);
    assert_eq!(client.query_status(&list_key).await, QueryStatus::Stale);

    stub.clear_requests();
    provider
        .use_customer_baskets(&CustomerParams::new(CUSTOMER_ID))
        .await
        .unwrap();
    assert_eq!(stub.request_count(), 1);
    let request = stub.requests().pop().unwrap();
    assert!(request.path.ends_with(&format!("/customers/{CUSTOMER_ID}/baskets")));
}

#[tokio::test]
async fn test_void_write_invalidates_parent_basket() {
    let stub = StubApi::start().await.unwrap();
    let provider = stub.provider().unwrap();
    prime(&provider).await;
    let client = provider.query_client();
    let scope = provider.scope();

    provider
        .use_mutation::<AddTaxesForBasketItem>()
        .mutate(MutationOptions::with_body(item_params(), TaxItems::default()))
        .await
        .unwrap();

    assert!(
        client
            .is_stale(&keys::get_basket(&scope, &BasketId::new(BASKET_ID)))
            .await
    );
    assert!(
        client
            .is_stale(&keys::get_customer_baskets(
                &scope,
                &CustomerId::new(CUSTOMER_ID)
            ))
            .await
    );
}

#[tokio::test]
async fn test_delete_removes_basket_reads() {
    let stub = StubApi::start().await.unwrap();
    let provider = stub.provider().unwrap();
    prime(&provider).await;
    let client = provider.query_client();
    let scope = provider.scope();
    let basket_id = BasketId::new(BASKET_ID);

    let delete = provider.use_mutation::<DeleteBasket>();
    delete
        .mutate(MutationOptions::new(basket_params()))
        .await
        .unwrap();

    assert_eq!(delete.data(), Some(()));
    for key in [
        keys::get_basket(&scope, &basket_id),
        keys::get_price_books_for_basket(&scope, &basket_id),
    ] {
        assert_eq!(client.query_status(&key).await, QueryStatus::Missing);
    }
    assert!(
        client
            .is_stale(&keys::get_customer_baskets(
                &scope,
                &CustomerId::new(CUSTOMER_ID)
            ))
            .await
    );
}

#[tokio::test]
async fn test_transfer_drops_guest_basket() {
    let stub = StubApi::start().await.unwrap();
    let provider = stub.provider().unwrap();
    let client = provider.query_client();
    let scope = provider.scope();
    let guest = BasketId::new("guest-basket");

    client
        .set_query_data(keys::get_basket(&scope, &guest), &Basket::default())
        .await
        .unwrap();

    provider
        .use_mutation::<TransferBasket>()
        .mutate(MutationOptions::new(TransferBasketParams {
            override_existing: Some(true),
            source_basket_id: Some(guest.clone()),
        }))
        .await
        .unwrap();

    assert_eq!(
        client
            .query_status(&keys::get_basket(&scope, &guest))
            .await,
        QueryStatus::Missing
    );
    let destination: Option<Basket> = client
        .get_query_data(&keys::get_basket(&scope, &BasketId::new(BASKET_ID)))
        .await
        .unwrap();
    assert!(destination.is_some());
}

#[tokio::test]
async fn test_hook_reset_returns_to_idle() {
    let stub = StubApi::start().await.unwrap();
    let provider = stub.provider().unwrap();
    stub.fail_with(StatusCode::CONFLICT);

    let hook = provider.use_mutation::<RemoveItemFromBasket>();
    let err = hook
        .mutate(MutationOptions::new(item_params()))
        .await
        .unwrap_err();
    assert!(matches!(*err, ApiError::Status { status: 409, .. }));

    hook.reset();
    assert_eq!(hook.status(), MutationStatus::Idle);
    assert!(hook.error().is_none());
}
