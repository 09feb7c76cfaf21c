//! Query and mutation hooks over the commerce Shopper APIs.
//!
//! Reads go through a [`QueryClient`] that caches results under structured
//! [`QueryKey`]s. Writes are [`Mutation`]s: each API operation is a marker
//! type whose cache recipe says which cached reads to invalidate, rewrite or
//! drop once the write succeeds.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use commerce_query::{CommerceProvider, MutationOptions};
//! use commerce_query::shopper_baskets::{AddItemToBasket, keys};
//! use commerce_query_client::{BasketParams, CommerceConfig, ProductItem, StaticToken};
//!
//! let config = CommerceConfig::from_env()?;
//! let provider = CommerceProvider::from_config(
//!     &config,
//!     Arc::new(StaticToken::from_config(&config)?),
//! )?;
//!
//! let params = BasketParams::new("a10ff320829cb0eef93ad691e7");
//! let basket = provider.use_basket(&params).await?;
//!
//! let add_item = provider.use_mutation::<AddItemToBasket>();
//! add_item
//!     .mutate(MutationOptions::with_body(params.clone(), vec![ProductItem::new("25592770M", 1)]))
//!     .await?;
//!
//! // The cached basket was rewritten from the response and marked stale.
//! let key = keys::get_basket(&provider.scope(), &params.basket_id);
//! assert!(provider.query_client().is_stale(&key).await);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache_update;
pub mod error;
pub mod mutation;
pub mod provider;
pub mod query;
pub mod shopper_baskets;
pub mod shopper_contexts;

#[cfg(test)]
mod testing;

pub use cache_update::{CacheUpdate, CacheUpdateEntry, Updater};
pub use error::{QueryError, UnknownMutation};
pub use mutation::{Mutation, MutationHook, MutationOptions};
pub use provider::{ApiSource, Apis, CommerceProvider};
pub use query::{CachedQuery, KeyFilter, QueryCache, QueryClient, QueryKey, QueryScope};
pub use shopper_baskets::{BasketRecipe, ShopperBasketsMutation};
pub use shopper_contexts::{ContextRecipe, ShopperContextsMutation};
