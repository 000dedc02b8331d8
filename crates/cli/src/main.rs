//! Green Earth CLI - catalog queries and local cart management.
//!
//! # Usage
//!
//! ```bash
//! # Browse the remote catalog
//! ge-cli catalog categories
//! ge-cli catalog plants --category 3
//! ge-cli catalog plant 7
//!
//! # Manage the persisted cart (same slot the storefront uses)
//! ge-cli cart add 7 "Neem Tree" 35
//! ge-cli cart show
//! ge-cli cart remove 0
//! ge-cli cart checkout
//! ```
//!
//! # Environment Variables
//!
//! - `GREEN_EARTH_API_BASE` - Catalog API base URL
//! - `GREEN_EARTH_DATA_DIR` - Directory holding the persisted cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use green_earth_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "ge-cli")]
#[command(author, version, about = "Green Earth CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the remote plant catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the local shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List every category
    Categories,
    /// List plants, optionally for one category
    Plants {
        /// Category id, or `all`
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one plant's details
    Plant {
        /// Plant id
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart contents and total
    Show,
    /// Add one unit of a plant
    Add {
        /// Plant id (blank for a placeholder id)
        id: String,
        /// Display name
        name: String,
        /// Unit price
        price: String,
    },
    /// Remove the line at a zero-based index
    Remove {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Empty the cart
    Clear,
    /// Simulated checkout: show the total and clear the cart
    Checkout,
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
    let config = StorefrontConfig::from_env()?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Categories => commands::catalog::categories(&config).await?,
            CatalogAction::Plants { category } => {
                commands::catalog::plants(&config, category.as_deref()).await?;
            }
            CatalogAction::Plant { id } => commands::catalog::plant(&config, &id).await?,
        },
        Commands::Cart { action } => {
            let mut store = commands::cart::open(&config);
            match action {
                CartAction::Show => commands::cart::show(&store),
                CartAction::Add { id, name, price } => {
                    commands::cart::add(&mut store, &id, &name, &price)?;
                }
                CartAction::Remove { index } => commands::cart::remove(&mut store, index)?,
                CartAction::Clear => commands::cart::clear(&mut store)?,
                CartAction::Checkout => commands::cart::checkout(&mut store)?,
            }
        }
    }
    Ok(())
}
