//! # doubo — Gap-Fade Trader
//!
//! ```text
//!  doubo gap EURUSD 0.1 --market-open-at 00:00 --open-after 10s --close-after 1h
//!        │
//!        ▼
//!  [CLI] parse + validate ──▶ [GapTrader] ──▶ MT5 EA bridge (MT5_BASE_URL)
//! ```
//!
//! Exit status: `0` when the position was closed or the gap did not qualify,
//! `1` on any other failure, `2` on invalid arguments.

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use doubo::clock::SystemClock;
use doubo::config::Config;
use doubo::events::LogReporter;
use doubo::gateway::Mt5Bridge;
use doubo::GapTrader;

mod cli;

use cli::{Cli, Command, GapArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env (optional — CI/prod can use real env vars) ──────────────
    dotenvy::dotenv().ok();

    // ── 2. Parse arguments (exits with a usage message on bad input) ─────────
    let cli = Cli::parse();

    // ── 3. Structured logging (stderr, so --json output stays clean) ─────────
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("doubo=debug".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    info!(r#"

  ╔═══════════════════════════════════════════╗
  ║   DOUBO — Gap-Fade Trader                 ║
  ║   wait · measure · fade · close           ║
  ╚═══════════════════════════════════════════╝"#);

    match cli.command {
        Command::Gap(args) => run_gap(args).await,
    }
}

async fn run_gap(args: GapArgs) -> anyhow::Result<()> {
    // ── 1. Typed, validated parameters ───────────────────────────────────────
    let params = args.to_params().context("Invalid gap parameters")?;

    // ── 2. Bridge + execution settings ───────────────────────────────────────
    let config = Config::from_env().context("Failed to load config")?;
    info!(
        bridge   = %config.bridge.base_url,
        magic    = config.execution.magic,
        symbol   = %params.symbol(),
        open_at  = %params.market_open_time(),
        "Config loaded"
    );

    let gateway = Mt5Bridge::new(reqwest::Client::new(), &config.bridge);
    let reporter = LogReporter { json: args.json };
    let clock = SystemClock;

    // ── 3. Run the lifecycle ─────────────────────────────────────────────────
    let mut trader = GapTrader::new(&gateway, &clock, &reporter, params, config.execution);
    let outcome = trader.run().await;
    match outcome {
        Ok(summary) => {
            info!(
                run_id = %summary.run_id,
                profit = ?summary.profit,
                "🏁 Done"
            );
            Ok(())
        }
        Err(e) if e.is_informational() => {
            info!(reason = %e, "🏁 Done — no trade placed");
            Ok(())
        }
        Err(e) => {
            let session = trader.session();
            error!(
                error     = %e,
                state     = ?session.state(),
                reference = ?session.reference_close,
                symbol    = ?session.symbol_info,
                "❌ Gap trade failed"
            );
            Err(e.into())
        }
    }
}
