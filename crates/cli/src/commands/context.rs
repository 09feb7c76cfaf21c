//! Shopper context commands.

use std::collections::BTreeMap;

use commerce_query::shopper_contexts::{CreateShopperContext, DeleteShopperContext};
use commerce_query::{CommerceProvider, MutationOptions};
use commerce_query_client::{ContextParams, ShopperContext};
use commerce_query_core::Usid;
use tracing::info;

use super::{CliError, print_json};

/// The `--usid` argument, or the usid the token was issued to.
fn resolve_usid(provider: &CommerceProvider, usid: Option<String>) -> Result<Usid, CliError> {
    usid.map(Usid::new).or_else(|| provider.usid()).ok_or_else(|| {
        CliError::InvalidArgument("pass --usid or set COMMERCE_USID".to_string())
    })
}

/// Parse `name=value` qualifier arguments.
fn parse_qualifiers(qualifiers: &[String]) -> Result<BTreeMap<String, String>, CliError> {
    qualifiers
        .iter()
        .map(|raw| {
            raw.split_once('=')
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .ok_or_else(|| {
                    CliError::InvalidArgument(format!("qualifier must be name=value, got '{raw}'"))
                })
        })
        .collect()
}

pub async fn get(provider: &CommerceProvider, usid: Option<String>) -> Result<(), CliError> {
    let usid = resolve_usid(provider, usid)?;
    let context = provider
        .use_shopper_context(&ContextParams::new(usid))
        .await?;
    print_json(&context)
}

/// Create (or replace) the context, then print it as stored.
pub async fn set(
    provider: &CommerceProvider,
    usid: Option<String>,
    source_code: Option<String>,
    qualifiers: &[String],
) -> Result<(), CliError> {
    let params = ContextParams::new(resolve_usid(provider, usid)?);
    let body = ShopperContext {
        source_code,
        custom_qualifiers: parse_qualifiers(qualifiers)?,
        ..ShopperContext::default()
    };

    provider
        .use_mutation::<CreateShopperContext>()
        .mutate(MutationOptions::with_body(params.clone(), body))
        .await?;
    info!(usid = %params.usid, "Shopper context set");

    let context = provider.use_shopper_context(&params).await?;
    print_json(&context)
}

pub async fn delete(provider: &CommerceProvider, usid: Option<String>) -> Result<(), CliError> {
    let usid = resolve_usid(provider, usid)?;
    provider
        .use_mutation::<DeleteShopperContext>()
        .mutate(MutationOptions::new(ContextParams::new(usid.clone())))
        .await?;

    info!(%usid, "Shopper context deleted");
    Ok(())
}
