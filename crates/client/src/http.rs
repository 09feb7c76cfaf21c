//! Shared REST transport for the Shopper API clients.
//!
//! Builds organization-scoped endpoint URLs, attaches the bearer token and
//! the `siteId`/`locale` query parameters, and maps responses to
//! [`ApiError`]s. No retries: every call is exactly one HTTP request.

use std::sync::Arc;

use commerce_query_core::{OrganizationId, SiteId};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};
use url::Url;

use crate::auth::AuthProvider;
use crate::config::CommerceConfig;
use crate::error::{ApiError, ApiFault};

/// Maximum number of body characters written to logs.
const LOG_BODY_LIMIT: usize = 500;

/// API family and version, the path prefix in front of `organizations/{org}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFamily {
    ShopperBaskets,
    ShopperCustomers,
    ShopperContexts,
}

impl ApiFamily {
    const fn segments(self) -> [&'static str; 3] {
        match self {
            Self::ShopperBaskets => ["checkout", "shopper-baskets", "v1"],
            Self::ShopperCustomers => ["customer", "shopper-customers", "v1"],
            Self::ShopperContexts => ["shopper", "shopper-context", "v1"],
        }
    }
}

/// Authenticated JSON client shared by every API family.
///
/// Cheap to clone; clones share the connection pool and auth provider.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    client: reqwest::Client,
    base_url: Url,
    organization_id: OrganizationId,
    site_id: SiteId,
    locale: Option<String>,
    auth: Arc<dyn AuthProvider>,
}

impl RestClient {
    /// Create a client for the configured organization and site.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the base URL is malformed.
    pub fn new(config: &CommerceConfig, auth: Arc<dyn AuthProvider>) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.api_base_url())?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        Ok(Self {
            inner: Arc::new(RestClientInner {
                client: reqwest::Client::new(),
                base_url,
                organization_id: config.organization_id.clone(),
                site_id: config.site_id.clone(),
                locale: config.locale.clone(),
                auth,
            }),
        })
    }

    /// Organization every endpoint is scoped to.
    #[must_use]
    pub fn organization_id(&self) -> &OrganizationId {
        &self.inner.organization_id
    }

    /// Site sent with every request.
    #[must_use]
    pub fn site_id(&self) -> &SiteId {
        &self.inner.site_id
    }

    /// Locale sent with every request.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.inner.locale.as_deref()
    }

    /// Provider of the bearer token and shopper identity.
    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AuthProvider> {
        &self.inner.auth
    }

    /// Build `{base}/{family}/organizations/{org}/{path..}?siteId=..&{query..}`.
    ///
    /// Path segments are percent-encoded individually.
    pub(crate) fn endpoint(
        &self,
        family: ApiFamily,
        path: &[&str],
        query: &[(&str, String)],
    ) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            segments.pop_if_empty();
            segments.extend(family.segments());
            segments.extend(["organizations", self.inner.organization_id.as_str()]);
            segments.extend(path);
        }

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("siteId", self.inner.site_id.as_str());
            if let Some(locale) = &self.inner.locale {
                pairs.append_pair("locale", locale);
            }
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Send a request and decode a JSON response body.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let text = self.send(method, url, body).await?;

        serde_json::from_str(&text).map_err(|e| {
            error!(
                error = %e,
                body = %truncate(&text),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request whose success response carries no meaningful body.
    pub(crate) async fn fetch_void(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        self.send(method, url, body).await.map(|_| ())
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<String, ApiError> {
        let token = self.inner.auth.access_token().await?;

        debug!(%method, path = %url.path(), "Sending API request");

        let mut request = self
            .inner
            .client
            .request(method, url)
            .bearer_auth(token.expose_secret());
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Body as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            if status.is_server_error() {
                error!(status = %status, body = %truncate(&text), "API returned server error");
            } else {
                warn!(status = %status, body = %truncate(&text), "API rejected request");
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                fault: ApiFault::from_body(&text),
            });
        }

        Ok(text)
    }
}

/// Serialize a request body for [`RestClient::fetch`].
pub(crate) fn json_body<B: Serialize + ?Sized>(
    body: &B,
) -> Result<Option<serde_json::Value>, ApiError> {
    Ok(Some(serde_json::to_value(body)?))
}

fn truncate(text: &str) -> String {
    text.chars().take(LOG_BODY_LIMIT).collect()
}
