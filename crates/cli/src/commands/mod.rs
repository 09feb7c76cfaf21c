//! Command implementations.

use std::sync::Arc;

use commerce_query::{CommerceProvider, QueryError, UnknownMutation};
use commerce_query_client::{ApiError, CommerceConfig, ConfigError, StaticToken};
use serde::Serialize;
use thiserror::Error;

pub mod basket;
pub mod context;
pub mod matrix;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// A mutation hook failed; hooks share their error.
    #[error(transparent)]
    Mutation(#[from] Arc<ApiError>),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    UnknownMutation(#[from] UnknownMutation),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build a provider from the loaded configuration.
pub fn connect(config: &CommerceConfig) -> Result<CommerceProvider, CliError> {
    let auth = StaticToken::from_config(config)?;
    Ok(CommerceProvider::from_config(config, Arc::new(auth))?)
}

/// Write a value to stdout as pretty JSON.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
