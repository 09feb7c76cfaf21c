//! commerce-query CLI - drive hooks against a live API and inspect the
//! cache-update matrix.
//!
//! # Usage
//!
//! ```bash
//! # Print what every mutation does to the query cache
//! cq-cli matrix
//!
//! # Only one mutation
//! cq-cli matrix --mutation addItemToBasket
//!
//! # Basket round trip
//! cq-cli basket create
//! cq-cli basket add-item a10ff320829cb0eef93ad691e7 25592770M --quantity 2
//! cq-cli basket get a10ff320829cb0eef93ad691e7
//!
//! # Shopper context of the configured usid
//! cq-cli context set --source-code instagram
//! cq-cli context get
//! ```
//!
//! # Commands
//!
//! - `matrix` - Print the cache-update matrix (no API access needed)
//! - `basket` - Create, read, edit and delete baskets
//! - `context` - Read, write and delete the shopper context
//!
//! All commands except `matrix` read `COMMERCE_*` variables (or `.env`); see
//! `CommerceConfig` for the full list.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use commerce_query_client::{CommerceConfig, ConfigError, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cq-cli")]
#[command(author, version, about = "commerce-query CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cache-update matrix
    Matrix {
        /// Only this mutation (e.g. `addItemToBasket`)
        #[arg(short, long)]
        mutation: Option<String>,
    },
    /// Manage baskets
    Basket {
        #[command(subcommand)]
        action: BasketAction,
    },
    /// Manage the shopper context
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },
}

#[derive(Subcommand)]
enum BasketAction {
    /// Create a basket for the configured shopper
    Create,
    /// Show a basket
    Get {
        /// Basket ID
        basket_id: String,
    },
    /// List the configured customer's baskets
    List,
    /// Add a product to a basket
    AddItem {
        /// Basket ID
        basket_id: String,
        /// Product ID
        product_id: String,
        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product item from a basket
    RemoveItem {
        /// Basket ID
        basket_id: String,
        /// Item ID
        item_id: String,
    },
    /// Delete a basket
    Delete {
        /// Basket ID
        basket_id: String,
    },
}

#[derive(Subcommand)]
enum ContextAction {
    /// Show the shopper context
    Get {
        /// Unique shopper ID (default: `COMMERCE_USID`)
        #[arg(short, long)]
        usid: Option<String>,
    },
    /// Create or replace the shopper context
    Set {
        /// Unique shopper ID (default: `COMMERCE_USID`)
        #[arg(short, long)]
        usid: Option<String>,
        /// Campaign source code
        #[arg(short, long)]
        source_code: Option<String>,
        /// Custom qualifier as `name=value` (repeatable)
        #[arg(short = 'q', long = "qualifier")]
        qualifiers: Vec<String>,
    },
    /// Delete the shopper context
    Delete {
        /// Unique shopper ID (default: `COMMERCE_USID`)
        #[arg(short, long)]
        usid: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = CommerceConfig::from_env();
    init_tracing(
        config
            .as_ref()
            .map_or(LogFormat::Text, |config| config.log_format),
    );

    let result: Result<(), commands::CliError> = run(cli.command, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,commerce_query=info,commerce_query_client=info".into());

    // Logs go to stderr, stdout carries command output
    let json = format == LogFormat::Json;
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(
    command: Commands,
    config: Result<CommerceConfig, ConfigError>,
) -> Result<(), commands::CliError> {
    match command {
        Commands::Matrix { mutation } => commands::matrix::print(mutation.as_deref()),
        Commands::Basket { action } => {
            let provider = commands::connect(&config?)?;
            match action {
                BasketAction::Create => commands::basket::create(&provider).await,
                BasketAction::Get { basket_id } => {
                    commands::basket::get(&provider, basket_id).await
                }
                BasketAction::List => commands::basket::list(&provider).await,
                BasketAction::AddItem {
                    basket_id,
                    product_id,
                    quantity,
                } => commands::basket::add_item(&provider, basket_id, product_id, quantity).await,
                BasketAction::RemoveItem { basket_id, item_id } => {
                    commands::basket::remove_item(&provider, basket_id, item_id).await
                }
                BasketAction::Delete { basket_id } => {
                    commands::basket::delete(&provider, basket_id).await
                }
            }
        }
        Commands::Context { action } => {
            let provider = commands::connect(&config?)?;
            match action {
                ContextAction::Get { usid } => commands::context::get(&provider, usid).await,
                ContextAction::Set {
                    usid,
                    source_code,
                    qualifiers,
                } => commands::context::set(&provider, usid, source_code, &qualifiers).await,
                ContextAction::Delete { usid } => {
                    commands::context::delete(&provider, usid).await
                }
            }
        }
    }
}
