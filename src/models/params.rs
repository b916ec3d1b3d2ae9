//! # models::params
//!
//! [`TradeParameters`] — the immutable input of one gap-trade run, built once
//! from already-parsed CLI values and validated on construction.

use chrono::NaiveTime;
use serde::Serialize;

use crate::error::GapTradeError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeParameters {
    symbol:              String,
    volume:              f64,
    market_open_time:    NaiveTime,
    open_after_seconds:  u64,
    close_after_seconds: u64,
    fill_gap_ratio:      f64,
    min_gap_pips:        i64,
    max_gap_pips:        i64,
}

impl TradeParameters {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        volume: f64,
        market_open_time: NaiveTime,
        open_after_seconds: u64,
        close_after_seconds: u64,
        fill_gap_ratio: f64,
        min_gap_pips: i64,
        max_gap_pips: i64,
    ) -> Result<Self, GapTradeError> {
        let symbol = symbol.into();
        let invalid = |msg: String| -> Result<Self, GapTradeError> {
            Err(GapTradeError::InvalidParameters(msg))
        };

        if symbol.trim().is_empty() {
            return invalid("symbol must not be empty".into());
        }
        if !(volume.is_finite() && volume > 0.0) {
            return invalid(format!("volume must be positive, got {volume}"));
        }
        if !(fill_gap_ratio > 0.0 && fill_gap_ratio <= 1.0) {
            return invalid(format!("fill gap ratio must be in (0, 1], got {fill_gap_ratio}"));
        }
        if min_gap_pips < 0 {
            return invalid(format!("min gap pips must be non-negative, got {min_gap_pips}"));
        }
        if max_gap_pips < min_gap_pips {
            return invalid(format!(
                "max gap pips ({max_gap_pips}) must be >= min gap pips ({min_gap_pips})"
            ));
        }

        Ok(Self {
            symbol,
            volume,
            market_open_time,
            open_after_seconds,
            close_after_seconds,
            fill_gap_ratio,
            min_gap_pips,
            max_gap_pips,
        })
    }

    pub fn symbol(&self) -> &str { &self.symbol }
    pub fn volume(&self) -> f64 { self.volume }
    pub fn market_open_time(&self) -> NaiveTime { self.market_open_time }
    pub fn open_after_seconds(&self) -> u64 { self.open_after_seconds }
    pub fn close_after_seconds(&self) -> u64 { self.close_after_seconds }
    pub fn fill_gap_ratio(&self) -> f64 { self.fill_gap_ratio }
    pub fn min_gap_pips(&self) -> i64 { self.min_gap_pips }
    pub fn max_gap_pips(&self) -> i64 { self.max_gap_pips }

    /// Inclusive check against `[min_gap_pips, max_gap_pips]`.
    pub fn gap_in_range(&self, gap_pips: i64) -> bool {
        (self.min_gap_pips..=self.max_gap_pips).contains(&gap_pips)
    }
}
