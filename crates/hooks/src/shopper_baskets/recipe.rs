//! Cache recipes of the basket mutations.

use commerce_query_client::{
    Basket, BasketParams, BillingAddressParams, CouponParams, CreateBasketParams,
    GiftCertificateItemParams, ItemParams, MergeBasketParams, PaymentInstrumentParams,
    ShipmentParams, ShippingAddressParams, TransferBasketParams,
};
use commerce_query_core::{BasketId, CustomerId};
use serde_json::Value;
use tracing::warn;

use super::keys;
use crate::cache_update::{CacheUpdate, Updater};
use crate::query::QueryScope;

/// Which basket a mutation's parameters address.
pub trait BasketTarget {
    fn basket_id(&self) -> Option<&BasketId>;

    /// Basket consumed by a merge or transfer.
    fn source_basket_id(&self) -> Option<&BasketId> {
        None
    }
}

macro_rules! impl_basket_target {
    ($($params:ty),* $(,)?) => {
        $(
            impl BasketTarget for $params {
                fn basket_id(&self) -> Option<&BasketId> {
                    Some(&self.basket_id)
                }
            }
        )*
    };
}

impl_basket_target!(
    BasketParams,
    BillingAddressParams,
    ItemParams,
    ShipmentParams,
    ShippingAddressParams,
    PaymentInstrumentParams,
    CouponParams,
    GiftCertificateItemParams,
);

impl BasketTarget for CreateBasketParams {
    fn basket_id(&self) -> Option<&BasketId> {
        None
    }
}

impl BasketTarget for TransferBasketParams {
    fn basket_id(&self) -> Option<&BasketId> {
        None
    }

    fn source_basket_id(&self) -> Option<&BasketId> {
        self.source_basket_id.as_ref()
    }
}

impl BasketTarget for MergeBasketParams {
    fn basket_id(&self) -> Option<&BasketId> {
        None
    }

    fn source_basket_id(&self) -> Option<&BasketId> {
        self.source_basket_id.as_ref()
    }
}

/// Free-standing target, for previewing plans without real parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasketRef {
    pub basket_id: Option<BasketId>,
    pub source_basket_id: Option<BasketId>,
}

impl BasketTarget for BasketRef {
    fn basket_id(&self) -> Option<&BasketId> {
        self.basket_id.as_ref()
    }

    fn source_basket_id(&self) -> Option<&BasketId> {
        self.source_basket_id.as_ref()
    }
}

/// Basket carried by a mutation response, if any.
pub trait BasketResponse {
    fn basket(&self) -> Option<&Basket>;
}

impl BasketResponse for Basket {
    fn basket(&self) -> Option<&Basket> {
        Some(self)
    }
}

impl BasketResponse for () {
    fn basket(&self) -> Option<&Basket> {
        None
    }
}

/// What a basket mutation does to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasketRecipe {
    /// Seed the new basket, invalidate the customer's basket list.
    CreateBasket,
    /// Write the returned basket into `getBasket` and the customer's basket
    /// list, then invalidate the basket and its derived reads.
    UpdateBasket,
    /// Void write: invalidate the basket, its derived reads and the list.
    InvalidateBasket,
    /// Merge or transfer: drop the source basket, seed the destination,
    /// invalidate the list.
    ReplaceBasket,
    /// Drop the basket and its derived reads, invalidate the list.
    DeleteBasket,
}

impl BasketRecipe {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::CreateBasket => "set new basket, invalidate customer baskets",
            Self::UpdateBasket => {
                "set basket, replace in customer baskets, invalidate basket reads"
            }
            Self::InvalidateBasket => "invalidate basket reads and customer baskets",
            Self::ReplaceBasket => {
                "remove source basket, set destination, invalidate customer baskets"
            }
            Self::DeleteBasket => "remove basket reads, invalidate customer baskets",
        }
    }

    /// Cache plan for a successful call.
    ///
    /// Missing identifiers shrink the plan rather than fail it: a create
    /// whose response lacks a `basketId` only invalidates the list.
    #[must_use]
    pub fn plan(
        self,
        scope: &QueryScope,
        target: &impl BasketTarget,
        response: Option<&Basket>,
    ) -> CacheUpdate {
        let response_id = response.and_then(|basket| basket.basket_id.as_ref());
        let mut update = CacheUpdate::new();

        match self {
            Self::CreateBasket => {
                if let Some(basket) = response
                    && let Some(id) = response_id
                {
                    update = set_basket(update, scope, id, basket);
                }
            }
            Self::UpdateBasket => {
                let Some(id) = target.basket_id().or(response_id) else {
                    return update;
                };
                if let Some(basket) = response {
                    update = set_basket(update, scope, id, basket);
                    update = replace_in_lists(update, scope, id, basket);
                }
                return update.invalidate(keys::basket(scope, id));
            }
            Self::InvalidateBasket => {
                if let Some(id) = target.basket_id() {
                    update = update.invalidate(keys::basket(scope, id));
                }
            }
            Self::ReplaceBasket => {
                if let Some(source) = target.source_basket_id()
                    && Some(source) != response_id
                {
                    update = update.remove(keys::basket(scope, source));
                }
                if let Some(basket) = response
                    && let Some(id) = response_id
                {
                    update = set_basket(update, scope, id, basket);
                    update = update.invalidate(keys::basket(scope, id));
                }
            }
            Self::DeleteBasket => {
                if let Some(id) = target.basket_id() {
                    update = update.remove(keys::basket(scope, id));
                }
            }
        }

        for customer_id in affected_customers(scope, response) {
            update = update.invalidate(keys::customer_baskets(scope, customer_id));
        }
        update
    }
}

/// The session's customer plus the basket's owner when they differ, as
/// after a guest basket transfer.
fn affected_customers<'a>(
    scope: &'a QueryScope,
    response: Option<&'a Basket>,
) -> Vec<&'a CustomerId> {
    let mut customers: Vec<&CustomerId> = scope.customer_id.iter().collect();
    if let Some(owner) = response.and_then(Basket::customer_id)
        && !customers.contains(&owner)
    {
        customers.push(owner);
    }
    customers
}

fn basket_value(basket: &Basket) -> Option<Value> {
    serde_json::to_value(basket)
        .inspect_err(|e| warn!(error = %e, "Basket not serializable, skipping cache write"))
        .ok()
}

fn set_basket(
    update: CacheUpdate,
    scope: &QueryScope,
    basket_id: &BasketId,
    basket: &Basket,
) -> CacheUpdate {
    match basket_value(basket) {
        Some(value) => update.update(keys::get_basket(scope, basket_id), Updater::Set(value)),
        None => update,
    }
}

fn replace_in_lists(
    mut update: CacheUpdate,
    scope: &QueryScope,
    basket_id: &BasketId,
    basket: &Basket,
) -> CacheUpdate {
    let Some(item) = basket_value(basket) else {
        return update;
    };
    for customer_id in affected_customers(scope, Some(basket)) {
        update = update.update(
            keys::get_customer_baskets(scope, customer_id),
            Updater::ReplaceInList {
                list_field: "baskets".to_string(),
                id_field: "basketId".to_string(),
                id: basket_id.to_string(),
                item: item.clone(),
            },
        );
    }
    update
}

#[cfg(test)]
mod tests {
    use commerce_query_client::CustomerInfo;

    use super::*;
    use crate::query::KeyFilter;

    fn scope() -> QueryScope {
        QueryScope::new("org", "RefArch").with_customer_id(CustomerId::new("c1"))
    }

    fn basket(id: &str) -> Basket {
        Basket {
            basket_id: Some(BasketId::new(id)),
            ..Basket::default()
        }
    }

    #[test]
    fn test_create_seeds_basket_and_invalidates_list() {
        let plan = BasketRecipe::CreateBasket.plan(
            &scope(),
            &CreateBasketParams::default(),
            Some(&basket("new")),
        );

        assert_eq!(plan.update.len(), 1);
        assert_eq!(plan.update[0].key, keys::get_basket(&scope(), &BasketId::new("new")));
        assert_eq!(
            plan.invalidate,
            vec![keys::customer_baskets(&scope(), &CustomerId::new("c1"))]
        );
        assert!(plan.remove.is_empty());
    }

    #[test]
    fn test_update_invalidates_basket_prefix() {
        let params = ItemParams {
            basket_id: BasketId::new("b1"),
            item_id: "i1".into(),
        };
        let plan = BasketRecipe::UpdateBasket.plan(&scope(), &params, Some(&basket("b1")));

        let labels: Vec<&str> = plan.update.iter().map(|e| e.updater.label()).collect();
        assert_eq!(labels, ["set", "replace in list"]);
        assert_eq!(plan.invalidate, vec![keys::basket(&scope(), &BasketId::new("b1"))]);
    }

    #[test]
    fn test_void_write_invalidates_basket_and_list() {
        let plan = BasketRecipe::InvalidateBasket.plan(&scope(), &BasketParams::new("b1"), None);

        assert!(plan.update.is_empty());
        assert_eq!(
            plan.invalidate,
            vec![
                keys::basket(&scope(), &BasketId::new("b1")),
                keys::customer_baskets(&scope(), &CustomerId::new("c1")),
            ]
        );
    }

    #[test]
    fn test_replace_removes_source_basket() {
        let params = MergeBasketParams {
            source_basket_id: Some(BasketId::new("guest")),
            ..MergeBasketParams::default()
        };
        let plan = BasketRecipe::ReplaceBasket.plan(&scope(), &params, Some(&basket("dest")));

        assert_eq!(plan.remove, vec![keys::basket(&scope(), &BasketId::new("guest"))]);
        assert_eq!(plan.update[0].key, keys::get_basket(&scope(), &BasketId::new("dest")));
    }

    #[test]
    fn test_replace_into_same_basket_keeps_it() {
        let params = TransferBasketParams {
            source_basket_id: Some(BasketId::new("b1")),
            ..TransferBasketParams::default()
        };
        let plan = BasketRecipe::ReplaceBasket.plan(&scope(), &params, Some(&basket("b1")));

        assert!(plan.remove.is_empty());
    }

    #[test]
    fn test_transfer_invalidates_new_owner_list() {
        let mut transferred = basket("b1");
        transferred.customer_info = Some(CustomerInfo {
            customer_id: Some(CustomerId::new("registered")),
            ..CustomerInfo::default()
        });
        let guest_scope = QueryScope::new("org", "RefArch");

        let plan = BasketRecipe::ReplaceBasket.plan(
            &guest_scope,
            &TransferBasketParams::default(),
            Some(&transferred),
        );

        assert!(plan.invalidate.contains(&keys::customer_baskets(
            &guest_scope,
            &CustomerId::new("registered")
        )));
    }

    #[test]
    fn test_delete_removes_and_never_sets() {
        let plan = BasketRecipe::DeleteBasket.plan(&scope(), &BasketParams::new("b1"), None);

        assert!(plan.update.is_empty());
        assert_eq!(plan.remove, vec![keys::basket(&scope(), &BasketId::new("b1"))]);
        assert!(matches!(plan.invalidate.as_slice(), [KeyFilter::Prefix(_)]));
    }
}
