//! Typed REST clients for the commerce Shopper APIs.
//!
//! # Architecture
//!
//! - One trait per API family ([`ShopperBasketsApi`], [`ShopperCustomersApi`],
//!   [`ShopperContextsApi`]) with an HTTP implementation on top of `reqwest`
//! - Shared [`RestClient`] handles endpoint layout, bearer auth, `siteId` and
//!   error mapping
//! - No caching here: the `commerce-query` crate owns the query cache
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use commerce_query_client::{
//!     BasketParams, CommerceConfig, RestClient, ShopperBasketsApi, ShopperBasketsClient,
//!     StaticToken,
//! };
//!
//! let config = CommerceConfig::from_env()?;
//! let rest = RestClient::new(&config, Arc::new(StaticToken::from_config(&config)?))?;
//! let baskets = ShopperBasketsClient::new(rest);
//!
//! let basket = baskets.get_basket(&BasketParams::new("a10ff320829cb0eef93ad691e7")).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod error;
mod http;
pub mod shopper_baskets;
pub mod shopper_contexts;
pub mod shopper_customers;
pub mod types;

pub use auth::{AuthProvider, StaticToken};
pub use config::{CacheSettings, CommerceConfig, ConfigError, LogFormat};
pub use error::{ApiError, ApiFault};
pub use http::RestClient;
pub use shopper_baskets::*;
pub use shopper_contexts::*;
pub use shopper_customers::*;
pub use types::*;
