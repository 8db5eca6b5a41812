//! Alforja Café CLI - catalog checks and order previews.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! alforja-cli catalog list
//!
//! # Search the catalog
//! alforja-cli catalog list --query colombiano
//!
//! # Validate the catalog before deploying it
//! alforja-cli catalog check
//!
//! # Preview the order message for a snapshot and form
//! alforja-cli order compose --snapshot snapshot.json --form form.json
//! ```
//!
//! # Commands
//!
//! - `catalog list` - Print products by category
//! - `catalog check` - Fail on unreadable products or repeated ids
//! - `order compose` - Render the order message and hand-off link

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use alforja_core::HandoffChannel;
use clap::{Parser, Subcommand};

mod commands;

use commands::catalog::DEFAULT_CATALOG_PATH;

#[derive(Parser)]
#[command(name = "alforja-cli")]
#[command(author, version, about = "Alforja Café CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Work with orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products by category
    List {
        /// Catalog JSON file
        #[arg(short, long, default_value = DEFAULT_CATALOG_PATH)]
        path: PathBuf,

        /// Only show products whose name contains this text
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Check the catalog for unreadable products and repeated ids
    Check {
        /// Catalog JSON file
        #[arg(short, long, default_value = DEFAULT_CATALOG_PATH)]
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Render the order message for a cart snapshot and order form
    Compose {
        /// Cart snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Order form JSON file
        #[arg(short, long)]
        form: PathBuf,

        /// Chat recipient (digits only); prints the hand-off link when set
        #[arg(short, long)]
        recipient: Option<String>,

        /// Chat endpoint base URL
        #[arg(short, long, default_value = HandoffChannel::DEFAULT_ENDPOINT)]
        endpoint: String,
    },
}

fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { path, query } => {
                commands::catalog::list(&path, query.as_deref())?;
            }
            CatalogAction::Check { path } => commands::catalog::check(&path)?,
        },
        Commands::Order { action } => match action {
            OrderAction::Compose {
                snapshot,
                form,
                recipient,
                endpoint,
            } => {
                let channel = recipient.map(|recipient| HandoffChannel::new(endpoint, recipient));
                commands::order::run(&snapshot, &form, channel.as_ref())?;
            }
        },
    }
    Ok(())
}
