//! Read-through access to the query cache.

use std::future::Future;

use commerce_query_client::{ApiError, CacheSettings};
use commerce_query_core::QueryStatus;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{KeyFilter, QueryCache, QueryKey};
use crate::cache_update::CacheUpdate;
use crate::error::QueryError;

/// Shared handle to the query cache.
///
/// Cheap to clone; clones share the same cache.
#[derive(Clone)]
pub struct QueryClient {
    cache: QueryCache,
}

impl QueryClient {
    #[must_use]
    pub fn new(settings: &CacheSettings) -> Self {
        Self {
            cache: QueryCache::new(settings),
        }
    }

    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Return the cached value for `key` if it is fresh, otherwise call
    /// `fetcher` once and cache what it returns.
    ///
    /// Errors from `fetcher` are returned as is and never cached.
    #[instrument(skip(self, key, fetcher), fields(key = %key))]
    pub async fn fetch_query<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, QueryError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(entry) = self.cache.get(&key).await
            && !entry.stale
        {
            debug!("Cache hit");
            return decode(&key, entry.data);
        }

        debug!("Cache miss");
        let data = fetcher().await?;

        match serde_json::to_value(&data) {
            Ok(value) => self.cache.insert(key, value).await,
            Err(e) => warn!(error = %e, "Query result not cached"),
        }

        Ok(data)
    }

    /// Cached value for `key`, fresh or stale.
    pub async fn get_query_data<T: DeserializeOwned>(
        &self,
        key: &QueryKey,
    ) -> Result<Option<T>, QueryError> {
        match self.cache.get(key).await {
            Some(entry) => decode(key, entry.data).map(Some),
            None => Ok(None),
        }
    }

    /// Store `data` as the fresh value for `key`.
    pub async fn set_query_data<T: Serialize>(
        &self,
        key: QueryKey,
        data: &T,
    ) -> Result<(), QueryError> {
        let value = serde_json::to_value(data).map_err(QueryError::Encode)?;
        self.cache.insert(key, value).await;
        Ok(())
    }

    pub async fn query_status(&self, key: &QueryKey) -> QueryStatus {
        match self.cache.get(key).await {
            None => QueryStatus::Missing,
            Some(entry) if entry.stale => QueryStatus::Stale,
            Some(_) => QueryStatus::Fresh,
        }
    }

    /// Whether `key` is cached but invalidated.
    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        self.query_status(key).await == QueryStatus::Stale
    }

    pub async fn invalidate_queries(&self, filter: &KeyFilter) -> usize {
        self.cache.invalidate(filter).await
    }

    pub async fn remove_queries(&self, filter: &KeyFilter) -> usize {
        self.cache.remove(filter).await
    }

    /// Execute a cache-update plan: removals, then updates, then
    /// invalidations.
    #[instrument(skip_all, fields(actions = update.len()))]
    pub async fn apply(&self, update: &CacheUpdate) {
        for filter in &update.remove {
            let removed = self.cache.remove(filter).await;
            debug!(%filter, removed, "Removed queries");
        }

        for entry in &update.update {
            let changed = self.cache.update(entry.key.clone(), &entry.updater).await;
            debug!(key = %entry.key, updater = entry.updater.label(), changed, "Updated query");
        }

        for filter in &update.invalidate {
            let marked = self.cache.invalidate(filter).await;
            debug!(%filter, marked, "Invalidated queries");
        }
    }
}

fn decode<T: DeserializeOwned>(key: &QueryKey, data: Value) -> Result<T, QueryError> {
    serde_json::from_value(data).map_err(|source| QueryError::Decode {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use commerce_query_client::ApiFault;
    use serde_json::json;

    use super::*;
    use crate::cache_update::Updater;

    fn key() -> QueryKey {
        QueryKey::new(["organizations", "o", "baskets", "b1"])
    }

    fn client() -> QueryClient {
        QueryClient::new(&CacheSettings::default())
    }

    #[tokio::test]
    async fn test_fetch_query_uses_fresh_cache() {
        let client = client();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ApiError>(json!({"basketId": "b1"}))
        };

        let first: Value = client.fetch_query(key(), fetch).await.unwrap();
        let second: Value = client.fetch_query(key(), fetch).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.query_status(&key()).await, QueryStatus::Fresh);
    }

    #[tokio::test]
    async fn test_fetch_query_refetches_stale_entry() {
        let client = client();
        client.set_query_data(key(), &json!({"v": 1})).await.unwrap();
        client.invalidate_queries(&KeyFilter::Exact(key())).await;
        assert!(client.is_stale(&key()).await);

        let data: Value = client
            .fetch_query(key(), || async { Ok::<_, ApiError>(json!({"v": 2})) })
            .await
            .unwrap();

        assert_eq!(data, json!({"v": 2}));
        assert_eq!(client.query_status(&key()).await, QueryStatus::Fresh);
    }

    #[tokio::test]
    async fn test_fetch_errors_are_not_cached() {
        let client = client();
        let result: Result<Value, _> = client
            .fetch_query(key(), || async {
                Err(ApiError::Status {
                    status: 404,
                    fault: ApiFault::default(),
                })
            })
            .await;

        assert_eq!(result.unwrap_err().api().and_then(ApiError::status), Some(404));
        assert_eq!(client.query_status(&key()).await, QueryStatus::Missing);
    }

    #[tokio::test]
    async fn test_decode_mismatch_is_reported() {
        let client = client();
        client.set_query_data(key(), &json!("not a number")).await.unwrap();

        let result = client.get_query_data::<u32>(&key()).await;
        assert!(matches!(result, Err(QueryError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_apply_removes_before_updating() {
        let client = client();
        client.set_query_data(key(), &json!({"v": 1})).await.unwrap();

        let plan = CacheUpdate::new()
            .remove(KeyFilter::prefix(["organizations", "o", "baskets", "b1"]))
            .update(key(), Updater::Set(json!({"v": 2})))
            .invalidate(KeyFilter::prefix(["organizations", "o", "baskets", "b1"]));
        client.apply(&plan).await;

        let data: Option<Value> = client.get_query_data(&key()).await.unwrap();
        assert_eq!(data, Some(json!({"v": 2})));
        assert!(client.is_stale(&key()).await);
    }
}
