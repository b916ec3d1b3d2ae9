//! # models::position
//!
//! `OpenPosition` = the position that is live in MT5 right now.
//! `TradeSummary` = what is reported once that position has been closed.

use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Direction;

// ─── OpenPosition ─────────────────────────────────────────────────────────────

/// Created when the entry order is confirmed, dropped when the close is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenPosition {
    /// Ticket number from MT5; every close attempt refers to it.
    pub ticket:      u64,
    pub symbol:      String,
    pub direction:   Direction,
    pub entry_price: f64,
    pub volume:      f64,
    pub take_profit: f64,
    /// Wall-clock instant the entry was confirmed; the hold timer starts here.
    pub opened_at:   NaiveDateTime,
}

// ─── TradeSummary ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSummary {
    pub run_id:         Uuid,
    pub symbol:         String,
    pub direction:      Direction,
    pub ticket:         u64,
    pub volume:         f64,
    pub gap_pips:       i64,
    pub entry_price:    f64,
    pub close_price:    f64,
    /// `None` when the bridge could not compute it after the close.
    pub profit:         Option<f64>,
    /// Close attempts made, including the confirmed one and any that failed
    /// before an order could be sent.
    pub close_attempts: u32,
    pub opened_at:      NaiveDateTime,
    pub closed_at:      NaiveDateTime,
}

impl TradeSummary {
    pub fn from_position(
        run_id: Uuid,
        position: &OpenPosition,
        gap_pips: i64,
        close_price: f64,
        closed_at: NaiveDateTime,
    ) -> Self {
        Self {
            run_id,
            symbol:         position.symbol.clone(),
            direction:      position.direction,
            ticket:         position.ticket,
            volume:         position.volume,
            gap_pips,
            entry_price:    position.entry_price,
            close_price,
            profit:         None,
            close_attempts: 0,
            opened_at:      position.opened_at,
            closed_at,
        }
    }
}
