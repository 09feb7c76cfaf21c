//! Errors returned by the Shopper API clients.
//!
//! Errors pass through to hook callers unmodified: the taxonomy of business
//! failures (basket transfer conflict, merge conflict, invalid coupon, ...)
//! belongs to the remote API and arrives as an [`ApiFault`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when calling the commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {fault}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Problem details from the response body.
        fault: ApiFault,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// No usable credentials.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status of the failed response, if there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::RateLimited(_) => Some(429),
            _ => None,
        }
    }

    /// The API's problem type (e.g. `.../basket-transfer-conflict`), if any.
    #[must_use]
    pub fn fault_type(&self) -> Option<&str> {
        match self {
            Self::Status { fault, .. } => fault.type_.as_deref(),
            _ => None,
        }
    }
}

/// Problem-details body returned by the API on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFault {
    /// Problem type URI.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Occurrence-specific explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiFault {
    /// Parse a fault from a response body, keeping the raw text as the detail
    /// when it is not problem-details JSON.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str::<Self>(body).unwrap_or_else(|_| Self {
            type_: None,
            title: None,
            detail: (!body.trim().is_empty()).then(|| body.chars().take(200).collect()),
        })
    }
}

impl std::fmt::Display for ApiFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => write!(f, "{title}: {detail}"),
            (Some(message), None) | (None, Some(message)) => f.write_str(message),
            (None, None) => match &self.type_ {
                Some(type_) => f.write_str(type_),
                None => f.write_str("(no error details provided)"),
            },
        }
    }
}
