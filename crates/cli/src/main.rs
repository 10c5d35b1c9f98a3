//! Tienda CLI - shop from the terminal.
//!
//! Drives the same shop controller as the web storefront. A JSON profile
//! file stands in for the browser's local storage, so the cart, registered
//! users and sign-in survive between invocations.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally by category
//! tienda catalog --category kitchen
//!
//! # Fill the cart
//! tienda cart add 3
//! tienda cart show
//!
//! # Sign up and pay
//! tienda auth register -u ana -p secret -e ana@example.com
//! tienda checkout --name "Ana Ruiz" --card "4242 4242 4242 4242" --expiry 12/29
//!
//! # Check the gateway's approval ratio
//! tienda simulate --runs 1000 --seed 7
//! ```
//!
//! # Environment Variables
//!
//! Reads the storefront's configuration (`STOREFRONT_CATALOG`,
//! `CHECKOUT_DELAY_MS`, `CHECKOUT_SUCCESS_RATE`, `CHECKOUT_SEED`), including
//! from a `.env` file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use tienda_core::ProductId;
use tienda_storefront::catalog::CatalogSource;
use tienda_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "tienda")]
#[command(author, version, about = "Tienda storefront from the command line")]
struct Cli {
    /// Catalog file path or http(s) URL (defaults to `STOREFRONT_CATALOG`)
    #[arg(long, global = true)]
    catalog: Option<CatalogSource>,

    /// Profile file holding the cart, users and sign-in
    #[arg(long, global = true, default_value = "tienda-profile.json")]
    profile: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Catalog {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Register, sign in or sign out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Pay for the cart
    Checkout {
        /// Cardholder name
        #[arg(short, long)]
        name: String,

        /// Card number (digits, spaces allowed)
        #[arg(short, long)]
        card: String,

        /// Card expiry, e.g. 12/29
        #[arg(short, long)]
        expiry: String,
    },
    /// Run the payment simulator without a cart and report the approval ratio
    Simulate {
        /// Number of payments to draw
        #[arg(short, long, default_value_t = 1000)]
        runs: u32,

        /// RNG seed (defaults to `CHECKOUT_SEED`, else random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Approval probability (defaults to `CHECKOUT_SUCCESS_RATE`)
        #[arg(long)]
        rate: Option<f64>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add one unit of a product
    Add { id: ProductId },
    /// Remove one unit of a product
    Remove { id: ProductId },
    /// Empty the cart
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,

        #[arg(short, long)]
        email: String,
    },
    /// Sign in to an existing account
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tienda=info,tienda_storefront=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(source) = cli.catalog {
        config.catalog = source;
    }

    match cli.command {
        Commands::Catalog { category } => {
            let catalog = commands::load_catalog(&config.catalog).await?;
            commands::catalog::list(&catalog, category.as_deref());
        }
        Commands::Cart { action } => {
            let mut profile = commands::Profile::open(&config.catalog, cli.profile).await?;
            match action {
                CartAction::Show => commands::cart::show(&profile),
                CartAction::Add { id } => commands::cart::add(&mut profile, id)?,
                CartAction::Remove { id } => commands::cart::remove(&mut profile, id)?,
                CartAction::Clear { yes } => commands::cart::clear(&mut profile, yes)?,
            }
        }
        Commands::Auth { action } => {
            let mut profile = commands::Profile::open(&config.catalog, cli.profile).await?;
            match action {
                AuthAction::Register {
                    username,
                    password,
                    email,
                } => commands::auth::register(&mut profile, username, password, email)?,
                AuthAction::Login { username, password } => {
                    commands::auth::login(&mut profile, username, password)?;
                }
                AuthAction::Logout => commands::auth::logout(&mut profile)?,
                AuthAction::Whoami => commands::auth::whoami(&profile),
            }
        }
        Commands::Checkout { name, card, expiry } => {
            let mut profile = commands::Profile::open(&config.catalog, cli.profile).await?;
            commands::checkout::pay(&mut profile, &config.checkout, name, card, expiry).await?;
        }
        Commands::Simulate { runs, seed, rate } => {
            commands::simulate::run(&config.checkout, runs, seed, rate)?;
        }
    }
    Ok(())
}
