//! Mutation descriptors and the hook that runs them.

use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use commerce_query_client::ApiError;
use commerce_query_core::MutationStatus;
use tracing::{debug, instrument, warn};

use crate::cache_update::CacheUpdate;
use crate::query::{QueryClient, QueryScope};

/// Options of one mutation call: path/query parameters plus request body.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOptions<P, B = ()> {
    pub parameters: P,
    pub body: B,
}

impl<P> MutationOptions<P> {
    /// Options for a mutation without a request body.
    pub const fn new(parameters: P) -> Self {
        Self {
            parameters,
            body: (),
        }
    }
}

impl<P, B> MutationOptions<P, B> {
    pub const fn with_body(parameters: P, body: B) -> Self {
        Self { parameters, body }
    }
}

/// One write against the commerce API.
///
/// Implemented by zero-sized marker types, one per API operation. `call`
/// performs exactly one request; `cache_update` is a pure function of the
/// call's inputs and output.
#[async_trait]
pub trait Mutation: Send + Sync + 'static {
    /// API trait object the mutation is called on.
    type Api: ?Sized + Send + Sync + 'static;
    type Options: Send + Sync + 'static;
    type Data: Clone + Send + Sync + 'static;

    /// Operation name as published by the API, e.g. `addItemToBasket`.
    const NAME: &'static str;

    async fn call(api: &Self::Api, options: &Self::Options) -> Result<Self::Data, ApiError>;

    fn cache_update(scope: &QueryScope, options: &Self::Options, data: &Self::Data)
    -> CacheUpdate;
}

struct MutationState<D> {
    status: MutationStatus,
    data: Option<D>,
    error: Option<Arc<ApiError>>,
}

impl<D> Default for MutationState<D> {
    fn default() -> Self {
        Self {
            status: MutationStatus::Idle,
            data: None,
            error: None,
        }
    }
}

/// Callable handle for one mutation.
///
/// Clones share state: a clone observes the status of calls made through
/// any other clone.
pub struct MutationHook<M: Mutation> {
    api: Arc<M::Api>,
    client: QueryClient,
    scope: QueryScope,
    state: Arc<RwLock<MutationState<M::Data>>>,
    _mutation: PhantomData<fn() -> M>,
}

impl<M: Mutation> Clone for MutationHook<M> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            client: self.client.clone(),
            scope: self.scope.clone(),
            state: Arc::clone(&self.state),
            _mutation: PhantomData,
        }
    }
}

impl<M: Mutation> MutationHook<M> {
    #[must_use]
    pub fn new(api: Arc<M::Api>, client: QueryClient, scope: QueryScope) -> Self {
        Self {
            api,
            client,
            scope,
            state: Arc::new(RwLock::new(MutationState::default())),
            _mutation: PhantomData,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        M::NAME
    }

    #[must_use]
    pub const fn scope(&self) -> &QueryScope {
        &self.scope
    }

    #[must_use]
    pub fn status(&self) -> MutationStatus {
        self.read(|state| state.status)
    }

    /// Data of the last successful call, cleared when a new call starts.
    #[must_use]
    pub fn data(&self) -> Option<M::Data> {
        self.read(|state| state.data.clone())
    }

    /// Error of the last failed call, cleared when a new call starts.
    #[must_use]
    pub fn error(&self) -> Option<Arc<ApiError>> {
        self.read(|state| state.error.clone())
    }

    /// Return to idle, dropping data and error.
    pub fn reset(&self) {
        self.write(|state| *state = MutationState::default());
    }

    /// Call the API once. On success the mutation's cache update is applied
    /// before the data is returned; on failure the cache is left alone.
    #[instrument(skip_all, fields(mutation = M::NAME))]
    pub async fn mutate(&self, options: M::Options) -> Result<M::Data, Arc<ApiError>> {
        self.write(|state| {
            state.status = MutationStatus::Loading;
            state.data = None;
            state.error = None;
        });

        match M::call(&self.api, &options).await {
            Ok(data) => {
                let update = M::cache_update(&self.scope, &options, &data);
                debug!(actions = update.len(), "Mutation succeeded");
                self.client.apply(&update).await;

                self.write(|state| {
                    state.status = MutationStatus::Success;
                    state.data = Some(data.clone());
                });
                Ok(data)
            }
            Err(e) => {
                warn!(error = %e, "Mutation failed");
                let error = Arc::new(e);
                self.write(|state| {
                    state.status = MutationStatus::Error;
                    state.error = Some(Arc::clone(&error));
                });
                Err(error)
            }
        }
    }

    fn read<R>(&self, f: impl FnOnce(&MutationState<M::Data>) -> R) -> R {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write(&self, f: impl FnOnce(&mut MutationState<M::Data>)) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}
