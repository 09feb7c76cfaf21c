//! Shopper Baskets mutations, their cache matrix and the basket query hooks.
//!
//! Each API write is a marker type implementing [`Mutation`]:
//!
//! ```rust,ignore
//! use commerce_query::shopper_baskets::AddItemToBasket;
//! use commerce_query::MutationOptions;
//!
//! let add_item = provider.use_mutation::<AddItemToBasket>();
//! let basket = add_item
//!     .mutate(MutationOptions::with_body(
//!         BasketParams::new(basket_id),
//!         vec![ProductItem::new("25592770M", 1)],
//!     ))
//!     .await?;
//! ```
//!
//! [`ShopperBasketsMutation`] enumerates the same operations at runtime and
//! maps each to its [`BasketRecipe`].

pub mod keys;
mod queries;
mod recipe;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use commerce_query_client::{
    ApiError, Basket, BasketParams, BillingAddressParams, CouponItem, CouponParams,
    CreateBasketParams, CustomerInfo, GiftCertificateItem, GiftCertificateItemParams, ItemParams,
    MergeBasketParams, OrderAddress, PaymentInstrument, PaymentInstrumentParams, ProductItem,
    Shipment, ShipmentParams, ShippingAddressParams, ShippingMethod, ShopperBasketsApi, TaxItems,
    Taxes, TransferBasketParams,
};

pub use recipe::{BasketRecipe, BasketRef, BasketResponse, BasketTarget};

use crate::cache_update::CacheUpdate;
use crate::error::UnknownMutation;
use crate::mutation::{Mutation, MutationOptions};
use crate::query::QueryScope;

macro_rules! basket_mutations {
    ($(
        $(#[$meta:meta])*
        $name:ident = $op:literal {
            params: $params:ty,
            body: $body:ty,
            data: $data:ty,
            recipe: $recipe:ident,
            call: |$api:ident, $options:ident| $call:expr,
        }
    )*) => {
        /// Every Shopper Baskets write.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ShopperBasketsMutation {
            $($name,)*
        }

        impl ShopperBasketsMutation {
            pub const ALL: &'static [Self] = &[$(Self::$name,)*];

            /// Operation name as published by the API.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$name => $op,)*
                }
            }

            #[must_use]
            pub const fn recipe(self) -> BasketRecipe {
                match self {
                    $(Self::$name => BasketRecipe::$recipe,)*
                }
            }
        }

        impl FromStr for ShopperBasketsMutation {
            type Err = UnknownMutation;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($op => Ok(Self::$name),)*
                    other => Err(UnknownMutation(other.to_string())),
                }
            }
        }

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $name;

            #[async_trait]
            impl Mutation for $name {
                type Api = dyn ShopperBasketsApi;
                type Options = MutationOptions<$params, $body>;
                type Data = $data;

                const NAME: &'static str = $op;

                async fn call(
                    $api: &Self::Api,
                    $options: &Self::Options,
                ) -> Result<Self::Data, ApiError> {
                    $call
                }

                fn cache_update(
                    scope: &QueryScope,
                    options: &Self::Options,
                    data: &Self::Data,
                ) -> CacheUpdate {
                    ShopperBasketsMutation::$name
                        .recipe()
                        .plan(scope, &options.parameters, data.basket())
                }
            }
        )*
    };
}

impl fmt::Display for ShopperBasketsMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

basket_mutations! {
    /// Create a basket for the current shopper.
    CreateBasket = "createBasket" {
        params: CreateBasketParams,
        body: Basket,
        data: Basket,
        recipe: CreateBasket,
        call: |api, o| api.create_basket(&o.parameters, &o.body).await,
    }

    /// Move the guest basket to the registered customer after login.
    TransferBasket = "transferBasket" {
        params: TransferBasketParams,
        body: (),
        data: Basket,
        recipe: ReplaceBasket,
        call: |api, o| api.transfer_basket(&o.parameters).await,
    }

    /// Merge the guest basket into the registered customer's basket.
    MergeBasket = "mergeBasket" {
        params: MergeBasketParams,
        body: (),
        data: Basket,
        recipe: ReplaceBasket,
        call: |api, o| api.merge_basket(&o.parameters).await,
    }

    DeleteBasket = "deleteBasket" {
        params: BasketParams,
        body: (),
        data: (),
        recipe: DeleteBasket,
        call: |api, o| api.delete_basket(&o.parameters).await,
    }

    UpdateBasket = "updateBasket" {
        params: BasketParams,
        body: Basket,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.update_basket(&o.parameters, &o.body).await,
    }

    UpdateBillingAddressForBasket = "updateBillingAddressForBasket" {
        params: BillingAddressParams,
        body: OrderAddress,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.update_billing_address_for_basket(&o.parameters, &o.body).await,
    }

    AddCouponToBasket = "addCouponToBasket" {
        params: BasketParams,
        body: CouponItem,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.add_coupon_to_basket(&o.parameters, &o.body).await,
    }

    RemoveCouponFromBasket = "removeCouponFromBasket" {
        params: CouponParams,
        body: (),
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.remove_coupon_from_basket(&o.parameters).await,
    }

    UpdateCustomerForBasket = "updateCustomerForBasket" {
        params: BasketParams,
        body: CustomerInfo,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.update_customer_for_basket(&o.parameters, &o.body).await,
    }

    AddGiftCertificateItemToBasket = "addGiftCertificateItemToBasket" {
        params: BasketParams,
        body: GiftCertificateItem,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.add_gift_certificate_item_to_basket(&o.parameters, &o.body).await,
    }

    RemoveGiftCertificateItemFromBasket = "removeGiftCertificateItemFromBasket" {
        params: GiftCertificateItemParams,
        body: (),
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.remove_gift_certificate_item_from_basket(&o.parameters).await,
    }

    UpdateGiftCertificateItemInBasket = "updateGiftCertificateItemInBasket" {
        params: GiftCertificateItemParams,
        body: GiftCertificateItem,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.update_gift_certificate_item_in_basket(&o.parameters, &o.body).await,
    }

    AddItemToBasket = "addItemToBasket" {
        params: BasketParams,
        body: Vec<ProductItem>,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.add_item_to_basket(&o.parameters, &o.body).await,
    }

    RemoveItemFromBasket = "removeItemFromBasket" {
        params: ItemParams,
        body: (),
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.remove_item_from_basket(&o.parameters).await,
    }

    UpdateItemInBasket = "updateItemInBasket" {
        params: ItemParams,
        body: ProductItem,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.update_item_in_basket(&o.parameters, &o.body).await,
    }

    UpdateItemsInBasket = "updateItemsInBasket" {
        params: BasketParams,
        body: Vec<ProductItem>,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.update_items_in_basket(&o.parameters, &o.body).await,
    }

    /// Supply externally calculated taxes for one item (`taxMode=external`).
    AddTaxesForBasketItem = "addTaxesForBasketItem" {
        params: ItemParams,
        body: TaxItems,
        data: (),
        recipe: InvalidateBasket,
        call: |api, o| api.add_taxes_for_basket_item(&o.parameters, &o.body).await,
    }

    AddPaymentInstrumentToBasket = "addPaymentInstrumentToBasket" {
        params: BasketParams,
        body: PaymentInstrument,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.add_payment_instrument_to_basket(&o.parameters, &o.body).await,
    }

    RemovePaymentInstrumentFromBasket = "removePaymentInstrumentFromBasket" {
        params: PaymentInstrumentParams,
        body: (),
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.remove_payment_instrument_from_basket(&o.parameters).await,
    }

    UpdatePaymentInstrumentInBasket = "updatePaymentInstrumentInBasket" {
        params: PaymentInstrumentParams,
        body: PaymentInstrument,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.update_payment_instrument_in_basket(&o.parameters, &o.body).await,
    }

    /// Assign price books by ID.
    AddPriceBooksToBasket = "addPriceBooksToBasket" {
        params: BasketParams,
        body: Vec<String>,
        data: (),
        recipe: InvalidateBasket,
        call: |api, o| api.add_price_books_to_basket(&o.parameters, &o.body).await,
    }

    CreateShipmentForBasket = "createShipmentForBasket" {
        params: BasketParams,
        body: Shipment,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.create_shipment_for_basket(&o.parameters, &o.body).await,
    }

    RemoveShipmentFromBasket = "removeShipmentFromBasket" {
        params: ShipmentParams,
        body: (),
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.remove_shipment_from_basket(&o.parameters).await,
    }

    UpdateShipmentForBasket = "updateShipmentForBasket" {
        params: ShipmentParams,
        body: Shipment,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.update_shipment_for_basket(&o.parameters, &o.body).await,
    }

    UpdateShippingAddressForShipment = "updateShippingAddressForShipment" {
        params: ShippingAddressParams,
        body: OrderAddress,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.update_shipping_address_for_shipment(&o.parameters, &o.body).await,
    }

    UpdateShippingMethodForShipment = "updateShippingMethodForShipment" {
        params: ShipmentParams,
        body: ShippingMethod,
        data: Basket,
        recipe: UpdateBasket,
        call: |api, o| api.update_shipping_method_for_shipment(&o.parameters, &o.body).await,
    }

    /// Supply externally calculated taxes for the whole basket.
    AddTaxesForBasket = "addTaxesForBasket" {
        params: BasketParams,
        body: Taxes,
        data: (),
        recipe: InvalidateBasket,
        call: |api, o| api.add_taxes_for_basket(&o.parameters, &o.body).await,
    }
}
