//! Market protocol command-line tool.
//!
//! - `schemas`: print JSON schemas of the records markets emit
//! - `simulate`: run a scripted trader against a debug market and print the
//!   resulting transaction records as JSON lines

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use market_protocol::domain::entities::{Good, GoodSnapshot};
use market_protocol::domain::events::TransactionRecord;
use market_protocol::domain::value_objects::{GoodKind, Price, ProtocolConstants, Quantity};
use market_protocol::infrastructure::config::Settings;
use market_protocol::infrastructure::history::{
    FanOutSink, InMemoryTransactionLog, TracingTransactionSink,
};
use market_protocol::infrastructure::markets::{ExchangeMarket, Market};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Market protocol tooling.
#[derive(Parser, Debug)]
#[command(name = "market_cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the JSON schemas of transaction records and good snapshots.
    Schemas,

    /// Trade against a single market and print its transaction history.
    Simulate {
        /// Name of the simulated market.
        #[arg(long, default_value = "bazaar")]
        market: String,

        /// Number of lock/commit rounds.
        #[arg(long, default_value_t = 20)]
        rounds: u32,

        /// Settings file (defaults to `config/default.toml` if present).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use a randomized allocation instead of the debug one.
        #[arg(long)]
        random: bool,

        /// Abandon every Nth lock so that it expires (0 disables).
        #[arg(long, default_value_t = 7)]
        abandon_every: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Schemas => print_schemas(),
        Commands::Simulate {
            market,
            rounds,
            config,
            random,
            abandon_every,
        } => {
            let settings = Settings::load(config.as_deref()).context("loading settings")?;
            settings.logging.init().context("initialising logging")?;
            simulate(&settings.protocol, &market, rounds, random, abandon_every)
        }
    }
}

fn print_schemas() -> Result<()> {
    let record = schemars::schema_for!(TransactionRecord);
    let snapshot = schemars::schema_for!(GoodSnapshot);
    println!("{}", serde_json::to_string_pretty(&record)?);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn simulate(
    constants: &ProtocolConstants,
    name: &str,
    rounds: u32,
    random: bool,
    abandon_every: u32,
) -> Result<()> {
    let log = InMemoryTransactionLog::new();
    let sink = FanOutSink::new()
        .with(Arc::new(TracingTransactionSink::new()))
        .with(Arc::new(log.clone()));

    let mut market = if random {
        ExchangeMarket::randomized(name, *constants, &mut rand::rng())
    } else {
        ExchangeMarket::debug(name, *constants)
    }
    .context("opening market")?;
    market.attach_sink(Arc::new(sink));

    let mut wallet: BTreeMap<GoodKind, Good> = GoodKind::ALL
        .into_iter()
        .map(|kind| (kind, Good::from_kind(kind, constants)))
        .collect();
    let tradeable: Vec<GoodKind> = GoodKind::ALL
        .into_iter()
        .filter(|kind| !kind.is_default())
        .collect();

    for round in 0..rounds {
        let Some(kind) = tradeable.get(round as usize % tradeable.len()).copied() else {
            break;
        };
        let abandon = abandon_every != 0 && (round + 1) % abandon_every == 0;
        let outcome = if round % 2 == 0 {
            buy_round(&mut market, &mut wallet, kind, abandon)
        } else {
            sell_round(&mut market, &mut wallet, kind, abandon)
        };
        if let Err(err) = outcome {
            warn!(round, kind = %kind, error = %err, "round failed");
        }
    }

    for snapshot in wallet.values().map(Good::snapshot) {
        info!(holding = %snapshot, "trader wallet");
    }
    for line in log.to_json_lines()? {
        println!("{line}");
    }
    Ok(())
}

fn round_quantity(kind: GoodKind) -> Quantity {
    match kind {
        GoodKind::Yen => Quantity::from_units(100),
        GoodKind::Eur | GoodKind::Usd | GoodKind::Yuan => Quantity::from_units(10),
    }
}

fn wallet_entry(wallet: &mut BTreeMap<GoodKind, Good>, kind: GoodKind) -> Result<&mut Good> {
    wallet
        .get_mut(&kind)
        .with_context(|| format!("wallet holds no {kind}"))
}

fn buy_round(
    market: &mut dyn Market,
    wallet: &mut BTreeMap<GoodKind, Good>,
    kind: GoodKind,
    abandon: bool,
) -> Result<()> {
    let quantity = round_quantity(kind);
    let quote = market.buy_quote(kind, quantity)?;
    let token = market.lock_buy_offer(kind, quantity, Price::new(quote)?, "simulation")?;
    if abandon {
        info!(kind = %kind, "abandoning buy lock");
        return Ok(());
    }

    let price = Quantity::new(quote)?;
    let mut cash = wallet_entry(wallet, GoodKind::Eur)?.split(price)?;
    match market.buy(token, &mut cash) {
        Ok(mut bought) => wallet_entry(wallet, kind)?.merge(&mut bought)?,
        Err(err) => {
            wallet_entry(wallet, GoodKind::Eur)?.merge(&mut cash)?;
            return Err(err.into());
        }
    }
    Ok(())
}

fn sell_round(
    market: &mut dyn Market,
    wallet: &mut BTreeMap<GoodKind, Good>,
    kind: GoodKind,
    abandon: bool,
) -> Result<()> {
    let quantity = round_quantity(kind);
    let quote = market.sell_quote(kind, quantity)?;
    let token = market.lock_sell_offer(kind, quantity, Price::new(quote)?)?;
    if abandon {
        info!(kind = %kind, "abandoning sell lock");
        return Ok(());
    }

    let mut goods = wallet_entry(wallet, kind)?.split(quantity)?;
    match market.sell(token, &mut goods) {
        Ok(mut paid) => wallet_entry(wallet, GoodKind::Eur)?.merge(&mut paid)?,
        Err(err) => {
            wallet_entry(wallet, kind)?.merge(&mut goods)?;
            return Err(err.into());
        }
    }
    Ok(())
}
