//! # error
//!
//! Centralised error types.
//!
//! * [`FormatError`]   — a malformed duration / time-of-day string.  Caught by
//!   the CLI before the orchestrator is ever entered.
//! * [`GatewayError`]  — the MT5 bridge could not be reached or answered with
//!   something we cannot use.
//! * [`GapTradeError`] — every terminal outcome of one gap-trade run.  The
//!   close phase never produces one of these; it retries instead.

use thiserror::Error;

// ─── FormatError ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind} '{input}': expected {expected}")]
pub struct FormatError {
    pub kind:     &'static str,
    pub input:    String,
    pub expected: &'static str,
}

impl FormatError {
    pub fn duration(input: &str) -> Self {
        Self {
            kind:     "duration",
            input:    input.to_string(),
            expected: "<N>h<N>m<N>s, e.g. 1h30m15s",
        }
    }

    pub fn time_of_day(input: &str) -> Self {
        Self {
            kind:     "time of day",
            input:    input.to_string(),
            expected: "HH:MM (24h)",
        }
    }
}

// ─── GatewayError ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network-level failure: refused, timed out, DNS, ...
    #[error("MT5 bridge unreachable: {0}")]
    Unreachable(String),

    /// The bridge answered with a non-success HTTP status.
    #[error("MT5 bridge HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The bridge answered 2xx but the body did not match the contract.
    #[error("MT5 bridge response parse error: {0}")]
    Decode(String),
}

// ─── GapTradeError ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GapTradeError {
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A parameter was well-formed but outside its allowed range.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Failed to initialize MT5 connection: {0}")]
    Connection(String),

    #[error("Failed to select symbol {symbol}: {reason}")]
    Symbol { symbol: String, reason: String },

    /// Symbol info, last bar or tick was not available.
    #[error("Market data unavailable: {0}")]
    Data(String),

    /// The gap command only makes sense before the session starts.
    #[error("Market for {symbol} is already open")]
    MarketAlreadyOpen { symbol: String },

    /// Expected, benign outcome: the gap did not qualify for a trade.
    #[error("Gap of {gap_pips} pips is outside [{min_pips}, {max_pips}] — no trade")]
    GapOutOfRange {
        gap_pips: i64,
        min_pips: i64,
        max_pips: i64,
    },

    /// The entry order was rejected or never confirmed.
    #[error("Entry order failed: {0}")]
    Order(String),
}

impl GapTradeError {
    /// `true` for outcomes that are reported but are not faults.
    pub fn is_informational(&self) -> bool {
        matches!(self, GapTradeError::GapOutOfRange { .. })
    }
}
