//! Threadline CLI - catalog inspection and offline quotes.
//!
//! # Usage
//!
//! ```bash
//! # List every product
//! threadline catalog list
//!
//! # Cheapest tops first
//! threadline catalog list --category ao --sort price-asc
//!
//! # Show one product with its sizes and colors
//! threadline catalog show ao-thun-co-tron-don-gian
//!
//! # Price a cart: slug:size:color:quantity
//! threadline quote --item ao-thun-co-tron-don-gian:M:Trắng:2
//!
//! # Same cart with 10% off above 1,000,000
//! threadline quote --item quan-jean-nam-slim-fit:32:Xanh\ đậm:3 --discount-threshold 1000000
//! ```
//!
//! # Commands
//!
//! - `catalog list` - List products, optionally filtered and sorted
//! - `catalog show` - Show one product
//! - `quote` - Price a set of cart lines under the configured policy
//!
//! Currency and pricing come from the same `STOREFRONT_*` variables as the
//! storefront, optionally loaded from `.env`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use threadline_storefront::config::StorefrontConfig;

mod commands;

use commands::catalog::{BandArg, SortArg};

#[derive(Parser)]
#[command(name = "threadline")]
#[command(author, version, about = "Threadline CLI tools")]
struct Cli {
    /// Read the catalog from this JSON file instead of the built-in fixture
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

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
    /// Price cart lines offline
    Quote {
        /// Cart line as `slug:size:color:quantity` (size, color and quantity optional)
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,

        /// Enable the discount above this subtotal
        #[arg(long)]
        discount_threshold: Option<i64>,

        /// Discount percentage (used with --discount-threshold)
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(0..=100))]
        discount_percent: u8,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Only products in this category slug
        #[arg(short, long)]
        category: Option<String>,

        /// Only featured products
        #[arg(long)]
        featured: bool,

        /// Price band filter
        #[arg(long, value_enum)]
        price: Option<BandArg>,

        /// Sort order
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Show one product
    Show {
        /// Product slug
        slug: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing (stderr, so command output stays clean)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "threadline_cli=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let catalog = commands::load_catalog(cli.catalog.as_deref()).await?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                featured,
                price,
                sort,
            } => {
                let options = commands::catalog::ListOptions {
                    category,
                    featured,
                    price: price.map(Into::into),
                    sort: sort.map(Into::into),
                };
                commands::catalog::list(&catalog, &options, config.currency, &mut out)?;
            }
            CatalogAction::Show { slug } => {
                commands::catalog::show(&catalog, &slug, config.currency, &mut out)?;
            }
        },
        Commands::Quote {
            items,
            discount_threshold,
            discount_percent,
        } => {
            let policy =
                commands::quote::policy(config.pricing, discount_threshold, discount_percent);
            commands::quote::run(&catalog, &policy, config.currency, &items, &mut out)?;
        }
    }
    Ok(())
}
