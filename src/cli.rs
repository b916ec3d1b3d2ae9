//! # cli
//!
//! Command-line surface.  Only parsing and validation live here: every raw
//! string becomes a typed value (or a clap error) before the engine runs.

use chrono::NaiveTime;
use clap::{Args, Parser, Subcommand};

use doubo::duration::{parse_duration, parse_time_of_day};
use doubo::error::GapTradeError;
use doubo::models::TradeParameters;

#[derive(Debug, Parser)]
#[command(name = "doubo", version, about = "Gap-fade trading on MetaTrader 5", arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wait for the market open, fade the opening gap, then close on schedule.
    #[command(alias = "g")]
    Gap(GapArgs),
}

#[derive(Debug, Args)]
pub struct GapArgs {
    /// The symbol to trade the gap on.
    pub symbol: String,

    /// The volume of the position.
    pub volume: f64,

    /// Local time the market opens, HH:MM.
    #[arg(long, default_value = "00:00", value_parser = parse_time_of_day)]
    pub market_open_at: NaiveTime,

    /// Delay after the open before entering, e.g. 10s, 1m30s.
    #[arg(long, default_value = "10s", value_parser = parse_duration)]
    pub open_after: u64,

    /// How long to hold the position after entry, e.g. 1h, 45m.
    #[arg(long, default_value = "1h", value_parser = parse_duration)]
    pub close_after: u64,

    /// Fraction of the gap to target as take-profit, in (0, 1].
    #[arg(long, default_value_t = 1.0)]
    pub fill_gap_ratio: f64,

    /// Smallest gap, in points, worth trading.
    #[arg(long, default_value_t = 100)]
    pub min_gap_pips: i64,

    /// Largest gap, in points, worth trading.
    #[arg(long, default_value_t = 10_000)]
    pub max_gap_pips: i64,

    /// Also print every trade event as a JSON line on stdout.
    #[arg(long)]
    pub json: bool,
}

impl GapArgs {
    pub fn to_params(&self) -> Result<TradeParameters, GapTradeError> {
        TradeParameters::new(
            self.symbol.clone(),
            self.volume,
            self.market_open_at,
            self.open_after,
            self.close_after,
            self.fill_gap_ratio,
            self.min_gap_pips,
            self.max_gap_pips,
        )
    }
}
