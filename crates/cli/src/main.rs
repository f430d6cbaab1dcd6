//! RocketShoes CLI - Shopping cart from the command line.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog with prices and how many of each are in the cart
//! rs-cart products
//!
//! # Show the cart with subtotals and total
//! rs-cart show
//!
//! # Add one unit of product 3
//! rs-cart add 3
//!
//! # Set product 3 to exactly 2 units
//! rs-cart update 3 2
//!
//! # Remove product 3
//! rs-cart remove 3
//! ```
//!
//! Configuration comes from the environment; see `rocketshoes_cart::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_cart::CartConfig;
use rocketshoes_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "rs-cart")]
#[command(author, version, about = "RocketShoes shopping cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show,
    /// List catalog products
    Products,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product ID
        id: ProductId,

        /// New quantity (values below 1 are ignored)
        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_cli=info,rocketshoes_cart=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    let session = commands::Session::open(&config)?;

    match cli.command {
        Commands::Show => commands::cart::show(&session),
        Commands::Products => commands::products::list(&session).await?,
        Commands::Add { id } => commands::cart::add(&session, id).await?,
        Commands::Remove { id } => commands::cart::remove(&session, id).await?,
        Commands::Update { id, amount } => commands::cart::update(&session, id, amount).await?,
    }
    Ok(())
}
