//! Shopper Context API client.
//!
//! A shopper context is keyed by usid and steers personalization (promotions,
//! price books, customer groups) for that shopper.

use async_trait::async_trait;
use commerce_query_core::Usid;
use reqwest::Method;
use tracing::instrument;

use crate::error::ApiError;
use crate::http::{ApiFamily, RestClient, json_body};
use crate::types::ShopperContext;

/// Parameters addressing one shopper context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextParams {
    pub usid: Usid,
}

impl ContextParams {
    #[must_use]
    pub fn new(usid: impl Into<Usid>) -> Self {
        Self { usid: usid.into() }
    }
}

/// Operations of the Shopper Context API.
#[async_trait]
pub trait ShopperContextsApi: Send + Sync {
    async fn create_shopper_context(
        &self,
        params: &ContextParams,
        body: &ShopperContext,
    ) -> Result<(), ApiError>;

    async fn update_shopper_context(
        &self,
        params: &ContextParams,
        body: &ShopperContext,
    ) -> Result<ShopperContext, ApiError>;

    async fn delete_shopper_context(&self, params: &ContextParams) -> Result<(), ApiError>;

    async fn get_shopper_context(&self, params: &ContextParams)
    -> Result<ShopperContext, ApiError>;
}

/// HTTP implementation of [`ShopperContextsApi`].
#[derive(Clone)]
pub struct ShopperContextsClient {
    rest: RestClient,
}

impl ShopperContextsClient {
    #[must_use]
    pub const fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    fn url(&self, params: &ContextParams) -> Result<url::Url, ApiError> {
        self.rest.endpoint(
            ApiFamily::ShopperContexts,
            &["shopper-context", params.usid.as_str()],
            &[],
        )
    }
}

#[async_trait]
impl ShopperContextsApi for ShopperContextsClient {
    #[instrument(skip(self, body), fields(usid = %params.usid))]
    async fn create_shopper_context(
        &self,
        params: &ContextParams,
        body: &ShopperContext,
    ) -> Result<(), ApiError> {
        self.rest
            .fetch_void(Method::PUT, self.url(params)?, json_body(body)?)
            .await
    }

    #[instrument(skip(self, body), fields(usid = %params.usid))]
    async fn update_shopper_context(
        &self,
        params: &ContextParams,
        body: &ShopperContext,
    ) -> Result<ShopperContext, ApiError> {
        self.rest
            .fetch(Method::PATCH, self.url(params)?, json_body(body)?)
            .await
    }

    #[instrument(skip(self), fields(usid = %params.usid))]
    async fn delete_shopper_context(&self, params: &ContextParams) -> Result<(), ApiError> {
        self.rest
            .fetch_void(Method::DELETE, self.url(params)?, None)
            .await
    }

    #[instrument(skip(self), fields(usid = %params.usid))]
    async fn get_shopper_context(
        &self,
        params: &ContextParams,
    ) -> Result<ShopperContext, ApiError> {
        self.rest.fetch(Method::GET, self.url(params)?, None).await
    }
}
