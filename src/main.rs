//! Kalshi Venue Client - Entry Point
//!
//! Command-line front end over the library use cases.
//!
//! Wiring sequence:
//! 1. Load `.env`, parse arguments
//! 2. Load config.toml (defaults when absent) + env overrides
//! 3. Init tracing (JSON or pretty, to stderr)
//! 4. Load credentials from env (optional for public commands)
//! 5. Create KalshiClient (signing + concurrency cap + rate limit + timeout)
//! 6. Run the subcommand; Ctrl-C drops the in-flight call

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use kalshi_venue_client::adapters::api::{Credentials, KalshiClient};
use kalshi_venue_client::config::{AppConfig, loader};
use kalshi_venue_client::domain::order::status_summary;
use kalshi_venue_client::domain::{Contracts, Order, PriceCents, RankedEvent, Side, TrendingRanker};
use kalshi_venue_client::usecases::{
    MarketCatalog, OrderFilter, OrderManager, PortfolioService, TrendingScanner,
};
use kalshi_venue_client::CredentialError;

/// Kalshi venue client - market scanning and limit order management.
#[derive(Parser, Debug)]
#[command(name = "kalshi-venue")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show account balance
    Balance,

    /// Show one market snapshot
    Market { ticker: String },

    /// Rank open events by 24h volume plus open interest
    Trending {
        /// Number of events to show
        #[arg(long)]
        top: Option<usize>,
        /// Events requested per page (1-200)
        #[arg(long)]
        page_size: Option<u32>,
        /// Pick a representative market per event
        #[arg(long)]
        representative: bool,
    },

    /// Place a limit buy one cent above the best bid
    Place {
        ticker: String,
        /// `yes` or `no`
        side: Side,
        /// Budget in cents
        budget_cents: u64,
    },

    /// List orders
    Orders {
        /// Show only the N most recent orders
        #[arg(long)]
        recent: Option<Option<usize>>,
        #[arg(long)]
        ticker: Option<String>,
        /// Venue status filter, e.g. `resting`
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one order
    Order { order_id: String },

    /// Cancel a resting order
    Cancel { order_id: String },

    /// Change price (YES cents) and count of a resting order
    Amend {
        order_id: String,
        price: PriceCents,
        count: Contracts,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Environment + arguments ──────────────────────────
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // ── 2. Configuration ────────────────────────────────────
    let config = loader::load_config_or_default(&cli.config)
        .context("Failed to load configuration")?;

    // ── 3. Logging ──────────────────────────────────────────
    init_tracing(&config, cli.log_level.as_deref());

    info!(
        name = %config.client.name,
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "Starting Kalshi venue client"
    );

    // ── 4. Credentials (public commands run without them) ───
    let credentials = match Credentials::from_env() {
        Ok(credentials) => Some(Arc::new(credentials)),
        Err(CredentialError::Missing(var)) => {
            debug!(missing = var, "No credentials, signed endpoints unavailable");
            None
        }
        Err(e) => return Err(e).context("Failed to load venue credentials"),
    };

    // ── 5. Venue client ─────────────────────────────────────
    let client = Arc::new(
        KalshiClient::new(credentials, config.api.client_config())
            .context("Failed to create venue client")?,
    );

    // ── 6. Run until done or interrupted ────────────────────
    tokio::select! {
        result = run(cli.command, client, &config) => result,
        _ = signal::ctrl_c() => {
            warn!("Interrupted, in-flight request dropped");
            Ok(())
        }
    }
}

fn init_tracing(config: &AppConfig, cli_level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(cli_level.unwrap_or(&config.client.log_level))
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.client.log_format == "pretty" {
        builder.pretty().init();
    } else {
        builder.json().init();
    }
}

async fn run(command: Command, client: Arc<KalshiClient>, config: &AppConfig) -> Result<()> {
    match command {
        Command::Balance => {
            let balance = PortfolioService::new(client).balance().await?;
            println!("Balance: ${}", balance.dollars());
        }

        Command::Market { ticker } => {
            let market = MarketCatalog::new(client).get_market(&ticker).await?;
            println!("{} [{}] {}", market.ticker, market.status, market.title);
            println!(
                "  last {}c  yes bid {}c  no bid {}c  vol24h {}  OI {}  liquidity {}",
                market.last_price,
                market.yes_bid,
                market.no_bid,
                market.volume_24h,
                market.open_interest,
                market.liquidity
            );
        }

        Command::Trending {
            top,
            page_size,
            representative,
        } => {
            let ranker = TrendingRanker::new(top.unwrap_or(config.catalog.top_n))
                .with_representatives(representative);
            let scanner = TrendingScanner::new(
                MarketCatalog::new(client),
                ranker,
                page_size.unwrap_or(config.catalog.page_size),
            );
            let ranked = scanner.scan().await?;
            if ranked.is_empty() {
                println!("No active events found.");
            }
            for (i, entry) in ranked.iter().enumerate() {
                print_ranked(i + 1, entry);
            }
        }

        Command::Place {
            ticker,
            side,
            budget_cents,
        } => {
            let manager = OrderManager::new(client, config.orders.sizing_rules());
            let order = manager.place_order(&ticker, side, budget_cents).await?;
            println!("Placed:");
            print_order(&order);
        }

        Command::Orders {
            recent,
            ticker,
            status,
        } => {
            let manager = OrderManager::new(client, config.orders.sizing_rules());
            let filter = OrderFilter { ticker, status };
            let orders = match recent {
                Some(limit) => {
                    manager
                        .recent_orders(&filter, limit.unwrap_or(config.orders.recent_limit))
                        .await?
                }
                None => manager.list_orders(&filter).await?,
            };
            for order in &orders {
                print_order(order);
            }
            let summary = status_summary(&orders)
                .into_iter()
                .map(|(state, n)| format!("{state}={n}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{} orders {summary}", orders.len());
        }

        Command::Order { order_id } => {
            let manager = OrderManager::new(client, config.orders.sizing_rules());
            print_order(&manager.get_order(&order_id).await?);
        }

        Command::Cancel { order_id } => {
            let manager = OrderManager::new(client, config.orders.sizing_rules());
            let order = manager.cancel_order(&order_id).await?;
            println!("Canceled:");
            print_order(&order);
        }

        Command::Amend {
            order_id,
            price,
            count,
        } => {
            let manager = OrderManager::new(client, config.orders.sizing_rules());
            let order = manager.amend_order(&order_id, price, count).await?;
            println!("Amended:");
            print_order(&order);
        }
    }
    Ok(())
}

fn print_ranked(rank: usize, entry: &RankedEvent) {
    let event = &entry.event;
    println!("{rank:>2}. {} (score {})", event.title, entry.score);
    println!("    {}", event.web_url());
    if let Some(market) = &entry.representative {
        println!(
            "    {} last {}c  vol24h {}  OI {}",
            market.ticker, market.last_price, market.volume_24h, market.open_interest
        );
    }
}

fn print_order(order: &Order) {
    let created = order
        .created_time
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}  {} {} {} @ {}c  {}/{} left  {}  {}",
        order.order_id,
        order.action,
        order.side,
        order.ticker,
        order.limit_price(),
        order.remaining_count,
        order.initial_count,
        order.state(),
        created
    );
}
