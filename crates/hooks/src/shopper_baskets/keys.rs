//! Query keys of the basket reads.
//!
//! Every basket read lives under `organizations/{org}/baskets/{basketId}`,
//! so [`basket`] addresses a basket together with its derived reads. The
//! customer's basket list is a Shopper Customers read and lives under
//! `customers/{customerId}/baskets`.

use commerce_query_core::{BasketId, CustomerId, ShipmentId};

use crate::query::{KeyFilter, QueryKey, QueryScope};

/// A basket and every read below it.
#[must_use]
pub fn basket(scope: &QueryScope, basket_id: &BasketId) -> KeyFilter {
    scope.prefix(["baskets", basket_id.as_str()])
}

/// Every basket read of the organization.
#[must_use]
pub fn all_baskets(scope: &QueryScope) -> KeyFilter {
    scope.prefix(["baskets"])
}

/// A customer's basket list, whatever its parameters.
#[must_use]
pub fn customer_baskets(scope: &QueryScope, customer_id: &CustomerId) -> KeyFilter {
    scope.prefix(["customers", customer_id.as_str(), "baskets"])
}

#[must_use]
pub fn get_basket(scope: &QueryScope, basket_id: &BasketId) -> QueryKey {
    scope.key(["baskets", basket_id.as_str()])
}

#[must_use]
pub fn get_payment_methods_for_basket(scope: &QueryScope, basket_id: &BasketId) -> QueryKey {
    scope.key(["baskets", basket_id.as_str(), "payment-methods"])
}

#[must_use]
pub fn get_price_books_for_basket(scope: &QueryScope, basket_id: &BasketId) -> QueryKey {
    scope.key(["baskets", basket_id.as_str(), "price-books"])
}

#[must_use]
pub fn get_shipping_methods_for_shipment(
    scope: &QueryScope,
    basket_id: &BasketId,
    shipment_id: &ShipmentId,
) -> QueryKey {
    scope.key([
        "baskets",
        basket_id.as_str(),
        "shipments",
        shipment_id.as_str(),
        "shipping-methods",
    ])
}

#[must_use]
pub fn get_taxes_from_basket(scope: &QueryScope, basket_id: &BasketId) -> QueryKey {
    scope.key(["baskets", basket_id.as_str(), "taxes"])
}

#[must_use]
pub fn get_customer_baskets(scope: &QueryScope, customer_id: &CustomerId) -> QueryKey {
    scope.key(["customers", customer_id.as_str(), "baskets"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basket_filter_covers_derived_reads() {
        let scope = QueryScope::new("org", "RefArch");
        let id = BasketId::new("b1");
        let filter = basket(&scope, &id);

        for key in [
            get_basket(&scope, &id),
            get_payment_methods_for_basket(&scope, &id),
            get_price_books_for_basket(&scope, &id),
            get_shipping_methods_for_shipment(&scope, &id, &ShipmentId::new("me")),
            get_taxes_from_basket(&scope, &id),
        ] {
            assert!(filter.matches(&key), "{key} should match {filter}");
        }

        let list = get_customer_baskets(&scope, &CustomerId::new("c1"));
        assert!(!filter.matches(&list));
        assert!(!all_baskets(&scope).matches(&list));
        assert!(customer_baskets(&scope, &CustomerId::new("c1")).matches(&list));
    }
}
