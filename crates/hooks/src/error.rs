//! Errors returned by query hooks.

use commerce_query_client::ApiError;
use thiserror::Error;

/// Errors that can occur when reading through the query cache.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The fetch itself failed. Nothing was cached.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A cached value did not deserialize into the requested type.
    #[error("cached value for {key} has an unexpected shape: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Data handed to `set_query_data` could not be serialized.
    #[error("failed to serialize query data: {0}")]
    Encode(#[source] serde_json::Error),
}

impl QueryError {
    /// The underlying API error, if the fetch failed.
    #[must_use]
    pub const fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// A mutation name that is not part of the API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mutation: {0}")]
pub struct UnknownMutation(pub String);
