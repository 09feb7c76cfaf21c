//! Query keys, the query cache and the client that reads through it.

mod cache;
mod client;
mod key;

pub use cache::{CachedQuery, QueryCache};
pub use client::QueryClient;
pub use key::{KeyFilter, QueryKey, QueryScope};
