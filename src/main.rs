//! Polymarket market finder entry point.

use std::num::NonZeroUsize;

use clap::{Parser, Subcommand};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{info, warn};

use market_scout::config::Config;
use market_scout::error::MarketError;
use market_scout::market::{ClobClient, MarketListing, MarketSearcher};
use market_scout::orderbook::{PriceSnapshot, PriceSnapshotter};

/// Search Polymarket markets and sample YES prices.
#[derive(Parser, Debug)]
#[command(name = "market-scout")]
#[command(about = "Search Polymarket markets by keyword(s) across paginated results")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find active markets whose question contains every keyword.
    Search {
        /// One or more case-insensitive substrings to search in market questions.
        #[arg(long, num_args = 1.., required = true)]
        keywords: Vec<String>,

        /// Stop after collecting this many matches.
        #[arg(long, default_value = "3")]
        max_matches: NonZeroUsize,

        /// Maximum number of pages to scan via next_cursor.
        #[arg(long, default_value = "100")]
        max_pages: NonZeroUsize,

        /// Also fetch the YES mid for the first result.
        #[arg(long)]
        probe: bool,
    },

    /// Snapshot the YES best bid/ask/mid of one market.
    Snapshot {
        /// Market condition ID.
        market_id: String,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    if let Command::CheckConfig = args.command {
        return cmd_check_config();
    }

    let config = Config::load()?;
    config.validate()?;
    config.init_logging(args.verbose);

    match args.command {
        Command::Search {
            keywords,
            max_matches,
            max_pages,
            probe,
        } => cmd_search(&config, &keywords, max_matches, max_pages, probe).await,
        Command::Snapshot { market_id, json } => cmd_snapshot(&config, &market_id, json).await,
        Command::CheckConfig => cmd_check_config(),
    }
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("MARKET SCOUT - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  CLOB URL: {}", config.polymarket_clob_url);
    println!("  HTTP Timeout: {}ms", config.http_timeout_ms);
    println!("  Connect Timeout: {}ms", config.http_connect_timeout_ms);
    println!("  User-Agent: {}", config.user_agent);
    println!("  Log: {} ({})", config.rust_log, config.log_format);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Search the listing and print every match.
async fn cmd_search(
    config: &Config,
    keywords: &[String],
    max_matches: NonZeroUsize,
    max_pages: NonZeroUsize,
    probe: bool,
) -> anyhow::Result<()> {
    let client = ClobClient::new(config)?;

    info!(?keywords, %max_matches, %max_pages, "Searching markets");
    let results = MarketSearcher::new(&client)
        .find_markets(keywords, max_matches, max_pages)
        .await?;

    let now = OffsetDateTime::now_utc();
    for market in &results {
        render_match(market, now);
    }

    let Some(first) = results.first() else {
        println!("No markets found containing: {:?}", keywords);
        return Ok(());
    };

    if probe {
        match PriceSnapshotter::new(&client)
            .fetch_yes_mid(&first.condition_id)
            .await
        {
            Ok(snapshot) => render_snapshot(&snapshot)?,
            Err(e @ MarketError::NoYesToken { .. }) => {
                warn!(condition_id = %first.condition_id, "Probe skipped: {}", e);
                println!("Probe: market unsupported ({})", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// Snapshot one market's YES prices.
async fn cmd_snapshot(config: &Config, market_id: &str, json: bool) -> anyhow::Result<()> {
    let client = ClobClient::new(config)?;
    let snapshot = PriceSnapshotter::new(&client).fetch_yes_mid(market_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        render_snapshot(&snapshot)?;
    }

    Ok(())
}

/// Pretty-print a found market.
fn render_match(market: &MarketListing, now: OffsetDateTime) {
    println!("Question: {}", market.question);
    println!("Condition ID: {}", market.condition_id);
    println!("Status: {}", market.status);
    println!("End Date: {}", market.end_date_label(now));
    println!("{}", "-".repeat(72));
}

/// Pretty-print a YES snapshot.
fn render_snapshot(snapshot: &PriceSnapshot) -> anyhow::Result<()> {
    println!("Market ID: {}", snapshot.market_id);
    println!("Timestamp: {}", snapshot.timestamp.format(&Rfc3339)?);
    println!("YES Bid: {}", snapshot.yes_bid);
    println!("YES Ask: {}", snapshot.yes_ask);
    println!("YES Mid: {}", snapshot.yes_mid);
    println!("{}", "-".repeat(72));
    Ok(())
}
