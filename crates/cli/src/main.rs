//! Choco Shop CLI - Browse the catalog and manage the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products, cheapest first
//! choco products --sort price-asc
//!
//! # Add a product to the cart, then remove one unit
//! choco cart add 3
//! choco cart dec 3
//!
//! # Show the cart using a remote catalog
//! choco --catalog https://shop.example/data/productos.json cart show
//!
//! # Mock login
//! choco register "Ana"
//! choco whoami
//! ```
//!
//! # Commands
//!
//! - `products`, `product`, `search` - Catalog browsing
//! - `cart` - Cart operations (`show`, `add`, `inc`, `dec`, `change`, `remove`, `count`)
//! - `register`, `login`, `logout`, `whoami` - Mock session

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use choco_shop_core::ProductId;
use choco_shop_storefront::catalog::CatalogSource;
use choco_shop_storefront::config::{ConfigError, StorefrontConfig, parse_http_url};
use choco_shop_storefront::search::SearchSort;
use choco_shop_storefront::state::AppState;
use choco_shop_storefront::views::Notice;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "choco")]
#[command(author, version, about = "Choco Shop storefront CLI")]
struct Cli {
    /// Catalog location (http(s) URL or file path); overrides `CHOCO_CATALOG_URL`/`CHOCO_CATALOG_PATH`
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Storage file; overrides `CHOCO_STORE_PATH`
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all products
    Products {
        /// Ordering (`catalog`, `price-asc`, `price-desc`, `title`)
        #[arg(long, default_value_t = SearchSort::Catalog)]
        sort: SearchSort,
    },
    /// Show one product
    Product {
        /// Product ID
        id: ProductId,
    },
    /// Search products by title or description
    Search {
        /// Search terms (all must match)
        query: String,

        /// Ordering (`catalog`, `price-asc`, `price-desc`, `title`)
        #[arg(long, default_value_t = SearchSort::Catalog)]
        sort: SearchSort,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Register a display name and log in
    Register {
        /// Display name
        name: String,
    },
    /// Log in as a registered user
    Login {
        /// Display name
        name: String,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with its total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Increase a line by one unit
    Inc {
        /// Product ID
        id: ProductId,
    },
    /// Decrease a line by one unit (removes it at zero)
    Dec {
        /// Product ID
        id: ProductId,
    },
    /// Change a line by an arbitrary amount
    Change {
        /// Product ID
        id: ProductId,

        /// Signed quantity change
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Remove a line
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Print the cart badge
    Count,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the tracing subscriber. Logs go to stderr so stdout stays clean.
fn init_tracing(log_json: bool) {
    // Defaults to warnings only if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "choco_shop_storefront=warn,choco_shop_cli=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(log_json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// Apply command-line overrides on top of the environment configuration.
fn load_config(cli: &Cli) -> Result<StorefrontConfig, ConfigError> {
    let mut config = StorefrontConfig::from_env()?;

    if let Some(catalog) = cli.catalog.as_deref() {
        config.catalog = if catalog.starts_with("http://") || catalog.starts_with("https://") {
            CatalogSource::Http(parse_http_url("--catalog", catalog)?)
        } else {
            CatalogSource::File(PathBuf::from(catalog))
        };
    }
    if let Some(store) = &cli.store {
        config.store_path.clone_from(store);
    }

    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(false);
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_json);

    let state = AppState::new(config);

    if let Err(e) = run(cli.command, &state).await {
        e.report();
        if let Err(io_err) = output::notify(&Notice::error(&e)) {
            tracing::error!("Failed to write error: {io_err}");
        }
        std::process::exit(1);
    }
}

async fn run(command: Commands, state: &AppState) -> commands::CommandResult {
    match command {
        Commands::Products { sort } => commands::catalog::list(state, sort).await,
        Commands::Product { id } => commands::catalog::show(state, id).await,
        Commands::Search { query, sort } => commands::catalog::search(state, &query, sort).await,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(state).await,
            CartAction::Add { id } => commands::cart::add(state, id).await,
            CartAction::Inc { id } => commands::cart::change(state, id, 1).await,
            CartAction::Dec { id } => commands::cart::change(state, id, -1).await,
            CartAction::Change { id, delta } => commands::cart::change(state, id, delta).await,
            CartAction::Remove { id } => commands::cart::remove(state, id).await,
            CartAction::Count => commands::cart::count(state).await,
        },
        Commands::Register { name } => commands::session::register(state, &name).await,
        Commands::Login { name } => commands::session::login(state, &name).await,
        Commands::Logout => commands::session::logout(state).await,
        Commands::Whoami => commands::session::whoami(state).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_negative_delta() {
        let cli = Cli::try_parse_from(["choco", "cart", "change", "3", "-2"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::Change { delta: -2, .. }
            })
        ));
    }

    #[test]
    fn test_parse_sort_option() {
        let cli = Cli::try_parse_from(["choco", "products", "--sort", "price-desc"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Products {
                sort: SearchSort::PriceDesc
            })
        ));
    }

    #[test]
    fn test_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["choco", "cart", "add", "trufas"]).is_err());
    }

    #[test]
    fn test_global_store_flag() {
        let cli = Cli::try_parse_from(["choco", "cart", "show", "--store", "/tmp/s.json"]);
        assert_eq!(
            cli.ok().and_then(|c| c.store),
            Some(PathBuf::from("/tmp/s.json"))
        );
    }
}
