//! `moka`-backed storage for query results.

use std::future::ready;
use std::sync::Arc;
use std::time::{Duration, Instant};

use commerce_query_client::CacheSettings;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use moka::{Entry, Expiry};
use serde_json::Value;

use super::{KeyFilter, QueryKey};
use crate::cache_update::Updater;

/// A cached query result.
#[derive(Debug, Clone)]
pub struct CachedQuery {
    pub data: Value,
    /// Set by invalidation. Stale data is still returned by
    /// [`QueryCache::get`] but refetched by `fetch_query`.
    pub stale: bool,
    /// When `data` last came whole from the server. Patches keep it.
    pub fetched_at: Instant,
}

impl CachedQuery {
    fn fresh(data: Value) -> Self {
        Self {
            data,
            stale: false,
            fetched_at: Instant::now(),
        }
    }

    /// Same entry with patched data: staleness and fetch time carry over.
    fn patched(self, data: Value) -> Self {
        Self { data, ..self }
    }
}

/// Expires an entry one time to live after its data was fetched.
///
/// Invalidating an entry or patching a list inside it rewrites the moka
/// entry, which must not extend its life.
struct FetchedAtExpiry {
    time_to_live: Duration,
}

impl FetchedAtExpiry {
    fn remaining(&self, query: &CachedQuery) -> Duration {
        self.time_to_live.saturating_sub(query.fetched_at.elapsed())
    }
}

impl Expiry<QueryKey, CachedQuery> for FetchedAtExpiry {
    fn expire_after_create(
        &self,
        _key: &QueryKey,
        value: &CachedQuery,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(self.remaining(value))
    }

    fn expire_after_update(
        &self,
        _key: &QueryKey,
        value: &CachedQuery,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(self.remaining(value))
    }
}

/// Query results keyed by [`QueryKey`].
///
/// Entries expire one time to live after they were fetched, whether or not
/// they were invalidated since. Single-key changes go through
/// `and_compute_with`, so an invalidation never overwrites a concurrent
/// update with older data.
#[derive(Clone)]
pub struct QueryCache {
    entries: Cache<QueryKey, CachedQuery>,
}

impl QueryCache {
    #[must_use]
    pub fn new(settings: &CacheSettings) -> Self {
        let entries = Cache::builder()
            .max_capacity(settings.max_capacity)
            .expire_after(FetchedAtExpiry {
                time_to_live: settings.time_to_live,
            })
            .build();

        Self { entries }
    }

    pub async fn get(&self, key: &QueryKey) -> Option<CachedQuery> {
        self.entries.get(key).await
    }

    /// Store fresh data, replacing any previous entry.
    pub async fn insert(&self, key: QueryKey, data: Value) {
        self.entries.insert(key, CachedQuery::fresh(data)).await;
    }

    /// Rewrite one entry. Returns whether the entry changed.
    ///
    /// A full value ([`Updater::Set`]) makes the entry fresh. A patch keeps
    /// the entry's staleness: one replaced list element does not vouch for
    /// the rest of the list.
    pub async fn update(&self, key: QueryKey, updater: &Updater) -> bool {
        let result = self
            .entries
            .entry(key)
            .and_compute_with(|current| {
                let current = current.map(Entry::into_value);
                let next = updater
                    .apply(current.as_ref().map(|query| &query.data))
                    .map(|data| match current {
                        Some(query) if !updater.replaces_value() => query.patched(data),
                        _ => CachedQuery::fresh(data),
                    });
                ready(next.map_or(Op::Nop, Op::Put))
            })
            .await;

        matches!(
            result,
            CompResult::Inserted(_) | CompResult::ReplacedWith(_)
        )
    }

    /// Mark matching entries stale. Returns how many were marked.
    pub async fn invalidate(&self, filter: &KeyFilter) -> usize {
        let mut marked = 0;
        for key in self.matching(filter) {
            let result = self
                .entries
                .entry(key)
                .and_compute_with(|current| {
                    ready(current.map_or(Op::Nop, |entry| {
                        let mut query = entry.into_value();
                        query.stale = true;
                        Op::Put(query)
                    }))
                })
                .await;

            if matches!(result, CompResult::ReplacedWith(_)) {
                marked += 1;
            }
        }
        marked
    }

    /// Drop matching entries. Returns how many were dropped.
    pub async fn remove(&self, filter: &KeyFilter) -> usize {
        let mut removed = 0;
        for key in self.matching(filter) {
            if self.entries.remove(&key).await.is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Snapshot of the keys currently cached.
    #[must_use]
    pub fn keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self
            .entries
            .iter()
            .map(|(key, _)| QueryKey::clone(&key))
            .collect();
        keys.sort();
        keys
    }

    fn matching(&self, filter: &KeyFilter) -> Vec<QueryKey> {
        match filter {
            KeyFilter::Exact(key) => vec![key.clone()],
            KeyFilter::Prefix(_) => self
                .entries
                .iter()
                .filter(|(key, _)| filter.matches(key))
                .map(|(key, _)| Arc::unwrap_or_clone(key))
                .collect(),
        }
    }
}
