//! BookHub CLI - Browse the catalog, manage the cart and rent books.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations and load the sample catalog
//! bh migrate
//! bh seed
//!
//! # Browse
//! bh books --category fiction --sort price-asc
//! bh book 3
//!
//! # Cart, wishlist and checkout
//! bh cart add 3 --quantity 2
//! bh wishlist toggle 7
//! bh login u1 --email reader@example.com
//! bh checkout --shipping express
//!
//! # Rentals
//! bh rent 3 --plan 6_months
//! bh rentals
//! ```
//!
//! Without `BOOKHUB_DATABASE_URL` the catalog commands read the bundled sample
//! catalog (or the file given with `--catalog`). Rentals always need the
//! database.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bookhub_storefront::checkout::ShippingMethod;
use bookhub_storefront::config::StorefrontConfig;

mod commands;

use commands::Context;
use commands::books::BooksArgs;

#[derive(Parser)]
#[command(name = "bh")]
#[command(author, version, about = "BookHub storefront CLI")]
struct Cli {
    /// Read the catalog from this JSON file instead of the database
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Load books into the database
    Seed {
        /// JSON array of books (default: bundled sample catalog)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Search, filter and sort the catalog
    Books(BooksArgs),
    /// Show one book
    Book {
        /// Book id
        id: String,
    },
    /// List categories with book counts
    Categories,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Sign in as a customer
    Login {
        /// Customer id issued by the auth provider
        #[arg(value_parser = commands::session::parse_user_id)]
        user_id: String,

        #[arg(short, long)]
        email: Option<String>,
    },
    /// Sign out
    Logout,
    /// Rent a book for online reading
    Rent {
        /// Book id
        book_id: String,

        /// Rental plan (`1_month`, `6_months`, `1_year`)
        #[arg(short, long, default_value = "1_year")]
        plan: String,
    },
    /// List your rentals
    Rentals,
    /// Place an order for the cart
    Checkout {
        /// Shipping method (`standard`, `express`, `overnight`)
        #[arg(short, long, default_value = "standard")]
        shipping: ShippingMethod,

        /// Show the order summary without placing the order
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart and its total
    Show,
    /// Add a book
    Add {
        book_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a book
    Remove { book_id: String },
    /// Set a book's quantity (0 removes it)
    Set { book_id: String, quantity: u32 },
    /// Remove everything
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show the wishlist
    Show,
    /// Save a book
    Add { book_id: String },
    /// Forget a book
    Remove { book_id: String },
    /// Save a book, or forget it if already saved
    Toggle { book_id: String },
    /// Remove everything
    Clear,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let result = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing with `RUST_LOG`, defaulting to info for our crates.
///
/// Logs go to stderr so command output can be piped.
fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bookhub_storefront=info,bookhub_cli=info".into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> bookhub_storefront::Result<()> {
    let config = StorefrontConfig::from_env()?;
    let mut ctx = Context::new(config, cli.catalog, cli.json_logs);

    // Notifications are shown whether or not the command succeeded.
    let result = dispatch(&mut ctx, cli.command).await;
    ctx.flush_notifications();
    result
}

async fn dispatch(ctx: &mut Context, command: Commands) -> bookhub_storefront::Result<()> {
    match command {
        Commands::Migrate => commands::db::migrate(ctx).await?,
        Commands::Seed { file } => commands::db::seed(ctx, file.as_deref()).await?,
        Commands::Books(args) => commands::books::list(ctx, args).await?,
        Commands::Book { id } => commands::books::show(ctx, &id).await?,
        Commands::Categories => commands::books::categories(ctx).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(ctx),
            CartAction::Add { book_id, quantity } => {
                commands::cart::add(ctx, &book_id, quantity).await?;
            }
            CartAction::Remove { book_id } => commands::cart::remove(ctx, &book_id)?,
            CartAction::Set { book_id, quantity } => {
                commands::cart::set_quantity(ctx, &book_id, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(ctx),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(ctx),
            WishlistAction::Add { book_id } => commands::wishlist::add(ctx, &book_id).await?,
            WishlistAction::Remove { book_id } => {
                commands::wishlist::remove(ctx, &book_id)?;
            }
            WishlistAction::Toggle { book_id } => {
                commands::wishlist::toggle(ctx, &book_id).await?;
            }
            WishlistAction::Clear => commands::wishlist::clear(ctx),
        },
        Commands::Login { user_id, email } => commands::session::login(ctx, user_id, email),
        Commands::Logout => commands::session::logout(ctx),
        Commands::Rent { book_id, plan } => commands::rentals::rent(ctx, &book_id, &plan).await?,
        Commands::Rentals => commands::rentals::list(ctx).await?,
        Commands::Checkout { shipping, dry_run } => {
            commands::checkout::checkout(ctx, shipping, dry_run)?;
        }
    }
    Ok(())
}
