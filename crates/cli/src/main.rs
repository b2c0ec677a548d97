//! GoMarket CLI - Inspect and mutate a local cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart and its summary line
//! gm-cli show
//!
//! # Add one unit of a product (or bump its quantity)
//! gm-cli add --id p1 --title "Mechanical Keyboard" --image-url https://img.test/p1.png --price 129.90
//!
//! # Change quantities
//! gm-cli increment p1
//! gm-cli decrement p1
//! ```
//!
//! # Commands
//!
//! - `show` - Print cart lines plus the floating summary (unit count,
//!   formatted subtotal)
//! - `add` - Add a product to the cart
//! - `increment` / `decrement` - Adjust a line's quantity
//!
//! State lives in a file-backed store under `GOMARKET_DATA_DIR`
//! (default `.gomarket`), the same blob format the storefront cart uses.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};

use gomarket_cart::{CartStore, FileStorage, FloatingCart, Navigator, SymbolFormatter};

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "gm-cli")]
#[command(author, version, about = "GoMarket cart CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart contents and summary
    Show,
    /// Add one unit of a product to the cart
    Add {
        /// Product id
        #[arg(long)]
        id: String,

        /// Display name
        #[arg(long)]
        title: String,

        /// Display image URL
        #[arg(long)]
        image_url: String,

        /// Unit price, e.g. 129.90
        #[arg(long)]
        price: String,
    },
    /// Increase a line's quantity by 1
    Increment {
        /// Product id
        id: String,
    },
    /// Decrease a line's quantity by 1 (removes the line at zero)
    Decrement {
        /// Product id
        id: String,
    },
}

/// Navigator for a terminal host: there is no navigation stack, so a
/// requested route is just logged.
struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        tracing::info!(route, "navigation requested");
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter.
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gm_cli=info,gomarket_cart=info".into());

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::from_env()?;

    let storage = Arc::new(FileStorage::open(&config.data_dir).await?);
    let store = CartStore::open(storage).await?;
    let summary = FloatingCart::new(
        &store,
        Arc::new(SymbolFormatter::new(config.currency)),
        Arc::new(LogNavigator),
    );

    match cli.command {
        Commands::Show => commands::cart::show(&store, &summary),
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => commands::cart::add(&store, &id, &title, &image_url, &price)?,
        Commands::Increment { id } => commands::cart::increment(&store, &id)?,
        Commands::Decrement { id } => commands::cart::decrement(&store, &id)?,
    }

    // Mutations are fire-and-forget; settle the queue before the process exits.
    store.flush().await;
    Ok(())
}
