//! # models::order
//!
//! Order-side types: [`Direction`], the [`OrderRequest`] we hand to the
//! gateway and the [`OrderResult`] MT5 sends back.

use serde::{Deserialize, Serialize};

/// `TRADE_RETCODE_DONE` — the only return code treated as success.
pub const RETCODE_DONE: u32 = 10009;

// ─── Direction ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// The direction of the order that closes a position opened in `self`.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Buy  => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Buy  => "buy",
            Direction::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── OrderRequest ─────────────────────────────────────────────────────────────

/// A market deal request (`TRADE_ACTION_DEAL`).
///
/// When `position` is set the deal closes that position instead of opening a
/// new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    pub symbol:    String,
    pub volume:    f64,
    pub direction: Direction,
    pub price:     f64,
    #[serde(rename = "tp", skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    #[serde(rename = "sl", skip_serializing_if = "Option::is_none")]
    pub stop_loss:   Option<f64>,
    /// Maximum accepted slippage in points.
    pub deviation: u32,
    /// EA "magic number" identifying orders placed by this tool.
    pub magic:     u64,
    pub comment:   String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position:  Option<u64>,
}

// ─── OrderResult ──────────────────────────────────────────────────────────────

/// What MT5 returned for an [`OrderRequest`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderResult {
    /// MT5 return code — 10009 = done.
    pub retcode: u32,
    /// Ticket of the resulting order (present when done).
    #[serde(rename = "order")]
    pub ticket:  Option<u64>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl OrderResult {
    /// A confirmed fill: `TRADE_RETCODE_DONE` **and** a ticket to refer to.
    pub fn is_confirmed(&self) -> bool {
        self.retcode == RETCODE_DONE && self.ticket.is_some()
    }

    /// Human-readable reason used in rejection messages.
    pub fn describe(&self) -> String {
        format!(
            "retcode={} comment={}",
            self.retcode,
            self.comment.as_deref().unwrap_or("unknown")
        )
    }
}
