//! Integration tests for commerce-query.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p commerce-query-integration-tests
//! ```
//!
//! Every test starts its own [`StubApi`]: an in-process `axum` server on an
//! ephemeral port that answers like the Shopper APIs, records each request
//! and can be switched to fail every call.
//!
//! # Test Categories
//!
//! - `shopper_baskets` - basket mutations and reads through the real HTTP
//!   clients
//! - `shopper_contexts` - shopper context mutations and reads

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use commerce_query::CommerceProvider;
use commerce_query_client::{ApiError, CommerceConfig, StaticToken};
use commerce_query_core::{CustomerId, Usid};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const ORGANIZATION_ID: &str = "f_ecom_zzrf_001";
pub const SITE_ID: &str = "RefArch";
pub const CUSTOMER_ID: &str = "abXqKO1Vbz";
pub const USID: &str = "0c5b4a37-83a6-4f67-9d5e-2f0f2a0e8b11";
pub const BASKET_ID: &str = "a10ff320829cb0eef93ad691e7";
pub const TOKEN: &str = "stub-shopper-token";

/// One request as the stub saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Value of a query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }
}

#[derive(Default)]
struct StubState {
    requests: Mutex<Vec<RecordedRequest>>,
    fail_with: Mutex<Option<StatusCode>>,
}

/// In-process stub of the Shopper Baskets, Customers and Context APIs.
///
/// The server task is aborted on drop.
pub struct StubApi {
    base_url: String,
    state: Arc<StubState>,
    server: JoinHandle<()>,
}

impl StubApi {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(StubState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            state,
            server,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Configuration pointing at this stub.
    #[must_use]
    pub fn config(&self) -> CommerceConfig {
        CommerceConfig::new(ORGANIZATION_ID, SITE_ID, self.base_url.clone())
    }

    /// Provider over the HTTP clients, signed in as [`CUSTOMER_ID`].
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is rejected.
    pub fn provider(&self) -> Result<CommerceProvider, ApiError> {
        let auth = StaticToken::new(TOKEN)
            .with_customer_id(CustomerId::new(CUSTOMER_ID))
            .with_usid(Usid::new(USID));
        CommerceProvider::from_config(&self.config(), Arc::new(auth))
    }

    /// Answer every following request with `status` and a problem body.
    pub fn fail_with(&self, status: StatusCode) {
        *self
            .state
            .fail_with
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(status);
    }

    /// Answer normally again.
    pub fn recover(&self) {
        *self
            .state
            .fail_with
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn clear_requests(&self) {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// Canned payloads
// =============================================================================

/// The basket every basket write answers with.
#[must_use]
pub fn basket_json() -> Value {
    json!({
        "basketId": BASKET_ID,
        "currency": "USD",
        "customerInfo": {"customerId": CUSTOMER_ID, "email": "jane@example.com"},
        "productItems": [
            {"itemId": "b4f3c1", "productId": "25592770M", "quantity": 2, "price": 59.98}
        ],
        "shipments": [{"shipmentId": "me"}],
        "productSubTotal": 59.98,
        "orderTotal": 64.78,
        "taxation": "net"
    })
}

#[must_use]
pub fn customer_baskets_json() -> Value {
    json!({"baskets": [basket_json()], "total": 1})
}

#[must_use]
pub fn context_json() -> Value {
    json!({
        "sourceCode": "instagram",
        "customQualifiers": {"deviceType": "mobile"},
        "customerGroupIds": ["BigSpenders"]
    })
}

#[must_use]
pub fn fault_json(status: StatusCode) -> Value {
    json!({
        "type": "https://api.commercecloud.salesforce.com/documentation/error/v1/errors/invalid-request",
        "title": status.canonical_reason().unwrap_or("Error"),
        "detail": "The request was rejected by the stub."
    })
}

// =============================================================================
// Handler
// =============================================================================

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(recorded);

    let failure = *state
        .fail_with
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(status) = failure {
        return (status, Json(fault_json(status))).into_response();
    }

    respond(&method, uri.path())
}

/// Route on the path below `organizations/{org}`.
fn respond(method: &Method, path: &str) -> Response {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let resource: &[&str] = segments
        .iter()
        .position(|s| *s == "organizations")
        .and_then(|i| segments.get(i + 2..))
        .unwrap_or_default();

    match (method.as_str(), resource) {
        ("DELETE", ["baskets", _] | ["shopper-context", _]) => {
            StatusCode::NO_CONTENT.into_response()
        }
        ("PUT", ["shopper-context", _]) => StatusCode::CREATED.into_response(),
        (_, ["shopper-context", _]) => Json(context_json()).into_response(),
        ("GET", ["customers", _, "baskets"]) => Json(customer_baskets_json()).into_response(),
        (
            "PUT",
            ["baskets", _, "price-books" | "taxes"] | ["baskets", _, "items", _, "taxes"],
        ) => StatusCode::NO_CONTENT.into_response(),
        ("GET", ["baskets", _, "price-books"]) => {
            Json(json!(["usd-list-prices", "usd-sale-prices"])).into_response()
        }
        ("GET", ["baskets", _, "taxes"]) => Json(json!({
            "taxes": {"b4f3c1": {"taxItems": [{"id": "state", "rate": 0.08, "value": 4.80}]}}
        }))
        .into_response(),
        ("GET", ["baskets", _, "payment-methods"]) => Json(json!({
            "applicablePaymentMethods": [{"id": "CREDIT_CARD", "name": "Credit Card"}]
        }))
        .into_response(),
        ("GET", ["baskets", _, "shipments", _, "shipping-methods"]) => Json(json!({
            "applicableShippingMethods": [{"id": "001", "name": "Ground", "price": 5.99}],
            "defaultShippingMethodId": "001"
        }))
        .into_response(),
        (_, ["baskets", ..]) => Json(basket_json()).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
