//! Resource types for the Shopper APIs.
//!
//! These types mirror the API's JSON documents. They are used both as
//! request bodies and as response data stored in the query cache.

mod basket;
mod context;

pub use basket::*;
pub use context::*;
