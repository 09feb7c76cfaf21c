//! Shopper Context mutations and query hook.
//!
//! A context steers promotions and price books, so every context write also
//! invalidates the organization's basket reads: the server reprices baskets
//! on their next read.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use commerce_query_client::{ApiError, ContextParams, ShopperContext, ShopperContextsApi};
use commerce_query_core::Usid;
use tracing::warn;

use crate::cache_update::{CacheUpdate, Updater};
use crate::error::{QueryError, UnknownMutation};
use crate::mutation::{Mutation, MutationOptions};
use crate::provider::{ApiSource, CommerceProvider};
use crate::query::{QueryKey, QueryScope};
use crate::shopper_baskets::keys as basket_keys;

/// Query keys of the context reads.
pub mod keys {
    use commerce_query_core::Usid;

    use crate::query::{KeyFilter, QueryKey, QueryScope};

    #[must_use]
    pub fn shopper_context(scope: &QueryScope, usid: &Usid) -> KeyFilter {
        scope.prefix(["shopper-context", usid.as_str()])
    }

    #[must_use]
    pub fn get_shopper_context(scope: &QueryScope, usid: &Usid) -> QueryKey {
        scope.key(["shopper-context", usid.as_str()])
    }
}

/// Every Shopper Context write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShopperContextsMutation {
    CreateShopperContext,
    UpdateShopperContext,
    DeleteShopperContext,
}

impl ShopperContextsMutation {
    pub const ALL: &'static [Self] = &[
        Self::CreateShopperContext,
        Self::UpdateShopperContext,
        Self::DeleteShopperContext,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateShopperContext => "createShopperContext",
            Self::UpdateShopperContext => "updateShopperContext",
            Self::DeleteShopperContext => "deleteShopperContext",
        }
    }

    #[must_use]
    pub const fn recipe(self) -> ContextRecipe {
        match self {
            Self::CreateShopperContext => ContextRecipe::CreateContext,
            Self::UpdateShopperContext => ContextRecipe::UpdateContext,
            Self::DeleteShopperContext => ContextRecipe::DeleteContext,
        }
    }
}

impl fmt::Display for ShopperContextsMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShopperContextsMutation {
    type Err = UnknownMutation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|mutation| mutation.as_str() == s)
            .ok_or_else(|| UnknownMutation(s.to_string()))
    }
}

/// What a context mutation does to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextRecipe {
    /// The create response is empty: invalidate the context.
    CreateContext,
    /// Write the returned context.
    UpdateContext,
    /// Drop the context.
    DeleteContext,
}

impl ContextRecipe {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::CreateContext => "invalidate context, invalidate all baskets",
            Self::UpdateContext => "set context, invalidate all baskets",
            Self::DeleteContext => "remove context, invalidate all baskets",
        }
    }

    #[must_use]
    pub fn plan(
        self,
        scope: &QueryScope,
        usid: &Usid,
        response: Option<&ShopperContext>,
    ) -> CacheUpdate {
        let mut update = match self {
            Self::CreateContext => {
                CacheUpdate::new().invalidate(keys::shopper_context(scope, usid))
            }
            Self::UpdateContext => match response.and_then(context_value) {
                Some(value) => CacheUpdate::new()
                    .update(keys::get_shopper_context(scope, usid), Updater::Set(value)),
                None => CacheUpdate::new().invalidate(keys::shopper_context(scope, usid)),
            },
            Self::DeleteContext => CacheUpdate::new().remove(keys::shopper_context(scope, usid)),
        };

        update = update.invalidate(basket_keys::all_baskets(scope));
        if let Some(customer_id) = &scope.customer_id {
            update = update.invalidate(basket_keys::customer_baskets(scope, customer_id));
        }
        update
    }
}

fn context_value(context: &ShopperContext) -> Option<serde_json::Value> {
    serde_json::to_value(context)
        .inspect_err(|e| warn!(error = %e, "Context not serializable, skipping cache write"))
        .ok()
}

/// Context carried by a mutation response, if any.
pub trait ContextResponse {
    fn context(&self) -> Option<&ShopperContext>;
}

impl ContextResponse for ShopperContext {
    fn context(&self) -> Option<&ShopperContext> {
        Some(self)
    }
}

impl ContextResponse for () {
    fn context(&self) -> Option<&ShopperContext> {
        None
    }
}

// =============================================================================
// Mutations
// =============================================================================

/// Create the context for a usid.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateShopperContext;

#[async_trait]
impl Mutation for CreateShopperContext {
    type Api = dyn ShopperContextsApi;
    type Options = MutationOptions<ContextParams, ShopperContext>;
    type Data = ();

    const NAME: &'static str = "createShopperContext";

    async fn call(api: &Self::Api, options: &Self::Options) -> Result<(), ApiError> {
        api.create_shopper_context(&options.parameters, &options.body)
            .await
    }

    fn cache_update(scope: &QueryScope, options: &Self::Options, data: &()) -> CacheUpdate {
        ShopperContextsMutation::CreateShopperContext.recipe().plan(
            scope,
            &options.parameters.usid,
            data.context(),
        )
    }
}

/// Patch the context for a usid.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateShopperContext;

#[async_trait]
impl Mutation for UpdateShopperContext {
    type Api = dyn ShopperContextsApi;
    type Options = MutationOptions<ContextParams, ShopperContext>;
    type Data = ShopperContext;

    const NAME: &'static str = "updateShopperContext";

    async fn call(api: &Self::Api, options: &Self::Options) -> Result<ShopperContext, ApiError> {
        api.update_shopper_context(&options.parameters, &options.body)
            .await
    }

    fn cache_update(
        scope: &QueryScope,
        options: &Self::Options,
        data: &ShopperContext,
    ) -> CacheUpdate {
        ShopperContextsMutation::UpdateShopperContext.recipe().plan(
            scope,
            &options.parameters.usid,
            data.context(),
        )
    }
}

/// Delete the context for a usid.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteShopperContext;

#[async_trait]
impl Mutation for DeleteShopperContext {
    type Api = dyn ShopperContextsApi;
    type Options = MutationOptions<ContextParams>;
    type Data = ();

    const NAME: &'static str = "deleteShopperContext";

    async fn call(api: &Self::Api, options: &Self::Options) -> Result<(), ApiError> {
        api.delete_shopper_context(&options.parameters).await
    }

    fn cache_update(scope: &QueryScope, options: &Self::Options, data: &()) -> CacheUpdate {
        ShopperContextsMutation::DeleteShopperContext.recipe().plan(
            scope,
            &options.parameters.usid,
            data.context(),
        )
    }
}

// =============================================================================
// Query hook
// =============================================================================

impl CommerceProvider {
    /// `getShopperContext`, served from cache while fresh.
    ///
    /// # Errors
    ///
    /// Returns the API error of a failed fetch.
    pub async fn use_shopper_context(
        &self,
        params: &ContextParams,
    ) -> Result<ShopperContext, QueryError> {
        let api = <Self as ApiSource<dyn ShopperContextsApi>>::api(self);
        let key: QueryKey = keys::get_shopper_context(&self.scope(), &params.usid);
        self.query_client()
            .fetch_query(key, || async move { api.get_shopper_context(params).await })
            .await
    }
}
