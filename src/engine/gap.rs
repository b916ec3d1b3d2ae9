//! # engine::gap
//!
//! **Gap assessment** — the pure decision taken on the first tick after the
//! open.  No I/O here so every branch can be unit tested with plain numbers.
//!
//! ```text
//!   bid > last close  →  gapped UP    →  SELL at bid, TP below entry
//!   otherwise         →  gapped DOWN  →  BUY  at ask, TP above entry
//! ```
//!
//! The take-profit sits `gap × fill_gap_ratio` away from entry, i.e. the
//! trade aims to capture that fraction of the gap closing.

use serde::Serialize;

use crate::models::{Direction, SymbolInfo, TickData};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GapAssessment {
    pub direction:       Direction,
    /// Gap in price units, measured from the side we would trade at.
    pub gap_price:       f64,
    /// `gap_price / point`, rounded half away from zero.
    pub gap_pips:        i64,
    /// The tick price the gap was measured from; also the entry price.
    pub reference_price: f64,
    /// Take-profit, normalised to the symbol's digits.
    pub target_price:    f64,
}

/// Decide direction, gap size and take-profit for the opening `tick`.
///
/// The result is only meaningful together with the `symbol` it was computed
/// with: `gap_pips` and `target_price` depend on its point and digits.
pub fn assess_gap(
    tick: &TickData,
    reference_close: f64,
    fill_gap_ratio: f64,
    symbol: &SymbolInfo,
) -> GapAssessment {
    let (direction, gap_price, entry) = if tick.bid > reference_close {
        (Direction::Sell, tick.bid - reference_close, tick.bid)
    } else {
        (Direction::Buy, reference_close - tick.ask, tick.ask)
    };

    let fill = gap_price * fill_gap_ratio;
    let target = match direction {
        Direction::Sell => entry - fill,
        Direction::Buy  => entry + fill,
    };

    GapAssessment {
        direction,
        gap_price,
        gap_pips: symbol.to_pips(gap_price),
        reference_price: entry,
        target_price: symbol.normalize(target),
    }
}
