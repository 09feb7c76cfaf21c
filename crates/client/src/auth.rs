//! Bearer token supply for API requests.
//!
//! Clients never talk to the authentication service themselves; they ask an
//! [`AuthProvider`] for the current token on every request. Token issuance and
//! refresh live behind that seam.

use async_trait::async_trait;
use commerce_query_core::{CustomerId, Usid};
use secrecy::SecretString;

use crate::config::CommerceConfig;
use crate::error::ApiError;

/// Supplies the shopper's bearer token and identity.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Token to send as `Authorization: Bearer <token>`.
    async fn access_token(&self) -> Result<SecretString, ApiError>;

    /// Registered customer the token belongs to. Guests may also have one.
    fn customer_id(&self) -> Option<CustomerId> {
        None
    }

    /// Unique shopper ID the token belongs to.
    fn usid(&self) -> Option<Usid> {
        None
    }
}

/// A fixed token obtained out of band.
#[derive(Clone)]
pub struct StaticToken {
    token: SecretString,
    customer_id: Option<CustomerId>,
    usid: Option<Usid>,
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &"[REDACTED]")
            .field("customer_id", &self.customer_id)
            .field("usid", &self.usid)
            .finish()
    }
}

impl StaticToken {
    /// Create a provider from a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            customer_id: None,
            usid: None,
        }
    }

    /// Attach the customer the token was issued to.
    #[must_use]
    pub fn with_customer_id(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Attach the usid the token was issued to.
    #[must_use]
    pub fn with_usid(mut self, usid: Usid) -> Self {
        self.usid = Some(usid);
        self
    }

    /// Build from `COMMERCE_ACCESS_TOKEN`, `COMMERCE_CUSTOMER_ID` and
    /// `COMMERCE_USID`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Auth` if no access token is configured.
    pub fn from_config(config: &CommerceConfig) -> Result<Self, ApiError> {
        let token = config
            .access_token
            .clone()
            .ok_or_else(|| ApiError::Auth("COMMERCE_ACCESS_TOKEN is not set".to_string()))?;

        Ok(Self {
            token,
            customer_id: config.customer_id.clone(),
            usid: config.usid.clone(),
        })
    }
}

#[async_trait]
impl AuthProvider for StaticToken {
    async fn access_token(&self) -> Result<SecretString, ApiError> {
        Ok(self.token.clone())
    }

    fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id.clone()
    }

    fn usid(&self) -> Option<Usid> {
        self.usid.clone()
    }
}
