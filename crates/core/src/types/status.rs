//! Status enums surfaced by query and mutation hooks.

use serde::{Deserialize, Serialize};

/// Lifecycle of a mutation hook.
///
/// A hook starts `Idle`, moves to `Loading` while its single network call is
/// in flight, then settles on `Success` or `Error` until the next call or a
/// reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MutationStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Freshness of a cached query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// Nothing cached for the key.
    Missing,
    /// Cached and usable without a refetch.
    Fresh,
    /// Cached but invalidated; the next fetch goes to the network.
    Stale,
}
