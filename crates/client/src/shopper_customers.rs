//! Shopper Customers API client, limited to the customer's basket list.

use async_trait::async_trait;
use reqwest::Method;
use tracing::instrument;

use crate::error::ApiError;
use crate::http::{ApiFamily, RestClient};
use crate::shopper_baskets::CustomerParams;
use crate::types::BasketsResult;

/// Operations of the Shopper Customers API used by the basket hooks.
#[async_trait]
pub trait ShopperCustomersApi: Send + Sync {
    async fn get_customer_baskets(&self, params: &CustomerParams)
    -> Result<BasketsResult, ApiError>;
}

/// HTTP implementation of [`ShopperCustomersApi`].
#[derive(Clone)]
pub struct ShopperCustomersClient {
    rest: RestClient,
}

impl ShopperCustomersClient {
    #[must_use]
    pub const fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl ShopperCustomersApi for ShopperCustomersClient {
    #[instrument(skip(self), fields(customer_id = %params.customer_id))]
    async fn get_customer_baskets(
        &self,
        params: &CustomerParams,
    ) -> Result<BasketsResult, ApiError> {
        let url = self.rest.endpoint(
            ApiFamily::ShopperCustomers,
            &["customers", params.customer_id.as_str(), "baskets"],
            &[],
        )?;
        self.rest.fetch(Method::GET, url, None).await
    }
}
