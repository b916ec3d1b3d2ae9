//! # doubo — gap-fade trader for MetaTrader 5
//!
//! Waits for a market's opening, measures the gap between the prior close and
//! the first tick, fades a fraction of it with a market order, holds for a
//! while, and closes the position no matter how many attempts that takes.
//!
//! ```text
//!  ┌──────────────┐   TradeParameters   ┌────────────────────┐  HTTP/JSON  ┌──────────┐
//!  │  CLI (clap)  │ ───────────────────▶│  engine::GapTrader │ ──────────▶ │  MT5 EA  │
//!  └──────────────┘                     │  Clock · Reporter  │ ◀────────── │  bridge  │
//!                                       └────────────────────┘             └──────────┘
//! ```

pub mod clock;
pub mod config;
pub mod duration;
pub mod engine;
pub mod error;
pub mod events;
pub mod gateway;
pub mod models;
pub mod state;

pub use engine::GapTrader;
pub use error::{FormatError, GapTradeError, GatewayError};
