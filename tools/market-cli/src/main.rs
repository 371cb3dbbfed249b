//! Market CLI - Preview storefront pages and sections from the command line.
//!
//! Commands:
//! - `market home` - Render the home page
//! - `market slides` - Render the hero slider
//! - `market categories` - Render the category sidebar from the API
//! - `market featured` - Render the featured-product grid
//! - `market search` - Render one page of product search results
//! - `market listings` - Render a category's listings
//! - `market listing` - Render one listing with its seller
//! - `market check-env` - Report missing settings

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use market_sdk::LogFormat;

use commands::{
    CategoriesArgs, FeaturedArgs, ListingArgs, ListingsArgs, SearchArgs, SlidesArgs,
};

/// Market CLI - Render storefront pages against the live APIs
#[derive(Parser)]
#[command(name = "market")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print fetched data as JSON instead of HTML
    #[arg(long, global = true)]
    json: bool,

    /// Config file path (TOML or JSON). Without one, settings come from MARKET_* variables
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log format: json or human
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the home page
    Home,

    /// Render the hero slider
    Slides(SlidesArgs),

    /// Render the category sidebar from the API
    Categories(CategoriesArgs),

    /// Render the featured-product grid
    Featured(FeaturedArgs),

    /// Render one page of product search results
    Search(SearchArgs),

    /// Render a category's listings
    Listings(ListingsArgs),

    /// Render one listing with its seller
    Listing(ListingArgs),

    /// Report missing settings
    CheckEnv,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), cli.log_format, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Home => commands::home::run(&ctx).await,
        Commands::Slides(args) => commands::catalog::slides(args, &ctx).await,
        Commands::Categories(args) => commands::catalog::categories(args, &ctx).await,
        Commands::Featured(args) => commands::catalog::featured(args, &ctx).await,
        Commands::Search(args) => commands::catalog::search(args, &ctx).await,
        Commands::Listings(args) => commands::listings::category(args, &ctx).await,
        Commands::Listing(args) => commands::listings::detail(args, &ctx).await,
        Commands::CheckEnv => commands::env::run(&ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
