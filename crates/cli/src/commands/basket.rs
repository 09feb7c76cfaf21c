//! Basket commands.
//!
//! Writes go through mutation hooks, so each command logs the cache plan it
//! applied (visible with `RUST_LOG=commerce_query=debug`).

use commerce_query::shopper_baskets::{
    AddItemToBasket, CreateBasket, DeleteBasket, RemoveItemFromBasket,
};
use commerce_query::{CommerceProvider, MutationOptions};
use commerce_query_client::{
    Basket, BasketParams, CreateBasketParams, CustomerParams, ItemParams, ProductItem,
};
use tracing::info;

use super::{CliError, print_json};

/// Create a basket in the configured currency.
pub async fn create(provider: &CommerceProvider) -> Result<(), CliError> {
    let body = Basket {
        currency: provider.currency().cloned(),
        ..Basket::default()
    };

    let basket = provider
        .use_mutation::<CreateBasket>()
        .mutate(MutationOptions::with_body(CreateBasketParams::default(), body))
        .await?;

    if let Some(id) = &basket.basket_id {
        info!(basket_id = %id, "Created basket");
    }
    print_json(&basket)
}

pub async fn get(provider: &CommerceProvider, basket_id: String) -> Result<(), CliError> {
    let basket = provider.use_basket(&BasketParams::new(basket_id)).await?;
    print_json(&basket)
}

/// List the baskets of `COMMERCE_CUSTOMER_ID`.
pub async fn list(provider: &CommerceProvider) -> Result<(), CliError> {
    let customer_id = provider.auth().customer_id().ok_or_else(|| {
        CliError::InvalidArgument("COMMERCE_CUSTOMER_ID is required to list baskets".to_string())
    })?;

    let baskets = provider
        .use_customer_baskets(&CustomerParams::new(customer_id))
        .await?;
    print_json(&baskets)
}

pub async fn add_item(
    provider: &CommerceProvider,
    basket_id: String,
    product_id: String,
    quantity: u32,
) -> Result<(), CliError> {
    if quantity == 0 {
        return Err(CliError::InvalidArgument(
            "quantity must be at least 1".to_string(),
        ));
    }

    let basket = provider
        .use_mutation::<AddItemToBasket>()
        .mutate(MutationOptions::with_body(
            BasketParams::new(basket_id),
            vec![ProductItem::new(product_id, quantity)],
        ))
        .await?;

    info!(items = basket.item_count(), "Added item");
    print_json(&basket)
}

pub async fn remove_item(
    provider: &CommerceProvider,
    basket_id: String,
    item_id: String,
) -> Result<(), CliError> {
    let basket = provider
        .use_mutation::<RemoveItemFromBasket>()
        .mutate(MutationOptions::new(ItemParams {
            basket_id: basket_id.into(),
            item_id: item_id.into(),
        }))
        .await?;

    print_json(&basket)
}

pub async fn delete(provider: &CommerceProvider, basket_id: String) -> Result<(), CliError> {
    provider
        .use_mutation::<DeleteBasket>()
        .mutate(MutationOptions::new(BasketParams::new(basket_id.clone())))
        .await?;

    info!(%basket_id, "Deleted basket");
    Ok(())
}
