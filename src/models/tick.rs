//! # models::tick
//!
//! Market data snapshots returned by the MT5 bridge: the live quote
//! ([`TickData`]), the last completed bar ([`LastBar`]) and the static
//! instrument properties ([`SymbolInfo`]).

use serde::{Deserialize, Serialize};

/// The live quote for one symbol.  Mirrors the bid/ask part of MQL5 `MqlTick`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickData {
    /// The current **bid** price (price at which we can sell).
    pub bid: f64,

    /// The current **ask** price (price at which we can buy).
    pub ask: f64,
}

impl TickData {
    /// Spread in price units (ask − bid).
    #[inline]
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }
}

/// The most recent **completed** bar.  Only the close is used: it is the
/// prior session's reference price for the gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LastBar {
    pub close: f64,
}

/// Read-only instrument properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Smallest price increment, e.g. `0.00001` for a 5-digit EURUSD quote.
    pub point: f64,

    /// Decimal places prices are quoted with.
    pub digits: u32,
}

impl SymbolInfo {
    /// Pip maths needs a finite, positive point.
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.point.is_finite() && self.point > 0.0
    }

    /// Convert a price distance into whole points ("pips" in CLI wording).
    ///
    /// Rounds half away from zero.
    #[inline]
    pub fn to_pips(&self, price_distance: f64) -> i64 {
        (price_distance / self.point).round() as i64
    }

    /// Round a price to the symbol's quoting precision.
    #[inline]
    pub fn normalize(&self, price: f64) -> f64 {
        let factor = 10f64.powi(self.digits as i32);
        (price * factor).round() / factor
    }
}
