//! Cartview CLI - Inspect and seed the local cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart identifiers
//! cartview list
//!
//! # Add products to the cart (duplicates are kept)
//! cartview add 1 5 12
//!
//! # Remove every occurrence of a product
//! cartview remove 5
//!
//! # Empty the cart
//! cartview clear
//!
//! # Fetch the catalog and mark the products that are in the cart
//! cartview catalog --in-cart
//! ```
//!
//! # Commands
//!
//! - `list` / `add` / `remove` / `clear` - Edit the persisted identifier list
//! - `catalog` - Preview the remote catalog against the cart
//!
//! The storage document and catalog endpoint come from the same environment
//! variables as the storefront (`CART_STORAGE_PATH`, `CART_CATALOG_URL`) and
//! can be overridden per invocation.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use cartview_core::ProductId;
use cartview_storefront::cart_store::CartStore;
use cartview_storefront::catalog::CatalogClient;
use cartview_storefront::config::{StorefrontConfig, parse_catalog_url};
use cartview_storefront::storage::FileStorage;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cartview")]
#[command(author, version, about = "Cartview CLI tools")]
struct Cli {
    /// Local storage document (overrides `CART_STORAGE_PATH`)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Catalog endpoint (overrides `CART_CATALOG_URL`)
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the persisted cart identifiers
    List,
    /// Append product ids to the cart
    Add {
        /// Product ids to add
        #[arg(required = true)]
        ids: Vec<ProductId>,
    },
    /// Remove every occurrence of a product id
    Remove {
        /// Product id to remove
        id: ProductId,
    },
    /// Remove the cart from storage
    Clear,
    /// Fetch the catalog and show which products are in the cart
    Catalog {
        /// Only show products that are in the cart
        #[arg(long)]
        in_cart: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(path) = cli.storage {
        config.storage_path = path;
    }
    if let Some(url) = cli.catalog_url {
        config.catalog.endpoint = parse_catalog_url(&url)?;
    }

    let store = CartStore::new(Arc::new(FileStorage::new(&config.storage_path)));

    match cli.command {
        Commands::List => {
            commands::cart::list(&store);
        }
        Commands::Add { ids } => {
            commands::cart::add(&store, &ids);
        }
        Commands::Remove { id } => {
            commands::cart::remove(&store, id);
        }
        Commands::Clear => commands::cart::clear(&store),
        Commands::Catalog { in_cart } => {
            let client = CatalogClient::new(&config.catalog)?;
            commands::catalog::preview(&client, &store, in_cart).await?;
        }
    }
    Ok(())
}
