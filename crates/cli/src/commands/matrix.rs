//! `matrix` command: show what each mutation does to the query cache.
//!
//! Plans are computed against placeholder identifiers, e.g. the plan of
//! `removeItemFromBasket` addresses `baskets/{basketId}`.

use std::fmt::Write as _;

use commerce_query::shopper_baskets::BasketRef;
use commerce_query::{
    BasketRecipe, CacheUpdate, QueryScope, ShopperBasketsMutation, ShopperContextsMutation,
    UnknownMutation,
};
use commerce_query_client::Basket;
use commerce_query_core::{BasketId, CustomerId, Usid};

use super::CliError;

fn scope() -> QueryScope {
    QueryScope::new("{organizationId}", "{siteId}")
        .with_customer_id(CustomerId::new("{customerId}"))
}

fn basket_plan(mutation: ShopperBasketsMutation) -> CacheUpdate {
    let recipe = mutation.recipe();
    let target = match recipe {
        BasketRecipe::CreateBasket => BasketRef::default(),
        BasketRecipe::ReplaceBasket => BasketRef {
            basket_id: None,
            source_basket_id: Some(BasketId::new("{sourceBasketId}")),
        },
        _ => BasketRef {
            basket_id: Some(BasketId::new("{basketId}")),
            source_basket_id: None,
        },
    };
    let response = Basket {
        basket_id: Some(BasketId::new("{basketId}")),
        ..Basket::default()
    };
    let returns_basket = !matches!(
        recipe,
        BasketRecipe::InvalidateBasket | BasketRecipe::DeleteBasket
    );

    recipe.plan(&scope(), &target, returns_basket.then_some(&response))
}

fn context_plan(mutation: ShopperContextsMutation) -> CacheUpdate {
    mutation
        .recipe()
        .plan(&scope(), &Usid::new("{usid}"), None)
}

fn section(out: &mut String, name: &str, summary: &str, plan: &CacheUpdate) {
    let _ = writeln!(out, "{name}: {summary}");
    for line in plan.to_string().lines() {
        let _ = writeln!(out, "    {line}");
    }
    out.push('\n');
}

/// Render the matrix, or one row of it.
pub fn render(only: Option<&str>) -> Result<String, CliError> {
    let (baskets, contexts): (Vec<_>, Vec<_>) = match only {
        None => (
            ShopperBasketsMutation::ALL.to_vec(),
            ShopperContextsMutation::ALL.to_vec(),
        ),
        Some(name) => {
            if let Ok(mutation) = name.parse::<ShopperBasketsMutation>() {
                (vec![mutation], Vec::new())
            } else if let Ok(mutation) = name.parse::<ShopperContextsMutation>() {
                (Vec::new(), vec![mutation])
            } else {
                return Err(UnknownMutation(name.to_string()).into());
            }
        }
    };

    let mut out = String::new();
    for mutation in baskets {
        section(
            &mut out,
            mutation.as_str(),
            mutation.recipe().describe(),
            &basket_plan(mutation),
        );
    }
    for mutation in contexts {
        section(
            &mut out,
            mutation.as_str(),
            mutation.recipe().describe(),
            &context_plan(mutation),
        );
    }
    Ok(out)
}

#[allow(clippy::print_stdout)]
pub fn print(only: Option<&str>) -> Result<(), CliError> {
    print!("{}", render(only)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_full_matrix_lists_every_mutation() {
        let out = render(None).unwrap();
        for mutation in ShopperBasketsMutation::ALL {
            assert!(out.contains(&format!("{mutation}: ")), "missing {mutation}");
        }
        for mutation in ShopperContextsMutation::ALL {
            assert!(out.contains(&format!("{mutation}: ")), "missing {mutation}");
        }
    }

    #[test]
    fn test_single_row_shows_plan() {
        let out = render(Some("mergeBasket")).unwrap();
        assert!(out.starts_with("mergeBasket: "));
        assert!(out.contains(
            "remove      /organizations/{organizationId}/baskets/{sourceBasketId}/**"
        ));
        assert!(out.contains(
            "invalidate  /organizations/{organizationId}/customers/{customerId}/baskets/**"
        ));
        assert!(!out.contains("addItemToBasket"));
    }

    #[test]
    fn test_unknown_mutation_is_an_error() {
        assert!(matches!(
            render(Some("getBasket")),
            Err(CliError::UnknownMutation(_))
        ));
    }
}
