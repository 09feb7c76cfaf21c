//! Bundle of configuration, API clients and the query cache.

use std::sync::Arc;

use commerce_query_client::{
    ApiError, AuthProvider, CommerceConfig, RestClient, ShopperBasketsApi, ShopperBasketsClient,
    ShopperContextsApi, ShopperContextsClient, ShopperCustomersApi, ShopperCustomersClient,
};
use commerce_query_core::{CurrencyCode, OrganizationId, SiteId, Usid};

use crate::mutation::{Mutation, MutationHook};
use crate::query::{QueryClient, QueryScope};

/// API implementations used by a provider.
#[derive(Clone)]
pub struct Apis {
    pub shopper_baskets: Arc<dyn ShopperBasketsApi>,
    pub shopper_customers: Arc<dyn ShopperCustomersApi>,
    pub shopper_contexts: Arc<dyn ShopperContextsApi>,
}

impl Apis {
    /// HTTP clients sharing one connection pool.
    #[must_use]
    pub fn http(rest: &RestClient) -> Self {
        Self {
            shopper_baskets: Arc::new(ShopperBasketsClient::new(rest.clone())),
            shopper_customers: Arc::new(ShopperCustomersClient::new(rest.clone())),
            shopper_contexts: Arc::new(ShopperContextsClient::new(rest.clone())),
        }
    }
}

/// Entry point for hooks.
///
/// Holds the shared parameters (`organizationId`, `siteId`, `locale`) every
/// query key is scoped by, and the [`QueryClient`] all hooks read and write.
/// Cheap to clone.
#[derive(Clone)]
pub struct CommerceProvider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    apis: Apis,
    auth: Arc<dyn AuthProvider>,
    query_client: QueryClient,
    organization_id: OrganizationId,
    site_id: SiteId,
    locale: Option<String>,
    currency: Option<CurrencyCode>,
}

impl CommerceProvider {
    #[must_use]
    pub fn new(config: &CommerceConfig, apis: Apis, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                apis,
                auth,
                query_client: QueryClient::new(&config.cache),
                organization_id: config.organization_id.clone(),
                site_id: config.site_id.clone(),
                locale: config.locale.clone(),
                currency: config.currency.clone(),
            }),
        }
    }

    /// Provider backed by the HTTP clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the API base URL is invalid.
    pub fn from_config(
        config: &CommerceConfig,
        auth: Arc<dyn AuthProvider>,
    ) -> Result<Self, ApiError> {
        let rest = RestClient::new(config, Arc::clone(&auth))?;
        Ok(Self::new(config, Apis::http(&rest), auth))
    }

    #[must_use]
    pub fn query_client(&self) -> &QueryClient {
        &self.inner.query_client
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AuthProvider> {
        &self.inner.auth
    }

    /// Currency for new baskets, if configured.
    #[must_use]
    pub fn currency(&self) -> Option<&CurrencyCode> {
        self.inner.currency.as_ref()
    }

    /// Usid of the current shopper, from the auth provider.
    #[must_use]
    pub fn usid(&self) -> Option<Usid> {
        self.inner.auth.usid()
    }

    /// Current key scope. The customer id is read from the auth provider on
    /// every call, so hooks created after a login address the new customer.
    #[must_use]
    pub fn scope(&self) -> QueryScope {
        let inner = &self.inner;
        let mut scope = QueryScope::new(inner.organization_id.clone(), inner.site_id.clone());
        if let Some(locale) = &inner.locale {
            scope = scope.with_locale(locale.as_str());
        }
        if let Some(customer_id) = inner.auth.customer_id() {
            scope = scope.with_customer_id(customer_id);
        }
        scope
    }

    /// Hook for mutation `M`, e.g. `provider.use_mutation::<AddItemToBasket>()`.
    #[must_use]
    pub fn use_mutation<M>(&self) -> MutationHook<M>
    where
        M: Mutation,
        Self: ApiSource<M::Api>,
    {
        let api = <Self as ApiSource<M::Api>>::api(self);
        MutationHook::new(api, self.query_client().clone(), self.scope())
    }
}

/// Resolves the API implementation a mutation runs against.
pub trait ApiSource<A: ?Sized> {
    fn api(&self) -> Arc<A>;
}

impl ApiSource<dyn ShopperBasketsApi> for CommerceProvider {
    fn api(&self) -> Arc<dyn ShopperBasketsApi> {
        Arc::clone(&self.inner.apis.shopper_baskets)
    }
}

impl ApiSource<dyn ShopperCustomersApi> for CommerceProvider {
    fn api(&self) -> Arc<dyn ShopperCustomersApi> {
        Arc::clone(&self.inner.apis.shopper_customers)
    }
}

impl ApiSource<dyn ShopperContextsApi> for CommerceProvider {
    fn api(&self) -> Arc<dyn ShopperContextsApi> {
        Arc::clone(&self.inner.apis.shopper_contexts)
    }
}
