//! # events
//!
//! Defines [`TradeEvent`] — everything the gap trader reports while it runs —
//! and the [`Reporter`] sink that renders them.
//!
//! [`LogReporter`] writes each event as a structured tracing line and, in
//! `--json` mode, also as one JSON object per line on stdout.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

use crate::engine::gap::GapAssessment;
use crate::models::{OpenPosition, SymbolInfo, TradeSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeEvent {
    /// Connected, symbol selected, market confirmed closed.
    PreconditionChecked {
        symbol: String,
        info:   SymbolInfo,
    },

    /// Prior session's close captured.
    ReferenceCaptured {
        close: f64,
    },

    WaitingForOpen {
        until: NaiveDateTime,
    },

    GapEvaluated {
        assessment: GapAssessment,
    },

    /// Gap outside the configured bounds — no order sent.
    GapRejected {
        gap_pips: i64,
        min_pips: i64,
        max_pips: i64,
    },

    PositionOpened {
        position: OpenPosition,
    },

    WaitingForClose {
        until: NaiveDateTime,
    },

    /// One close attempt failed; another follows after the retry delay.
    CloseRetry {
        attempt: u32,
        reason:  String,
    },

    PositionClosed {
        summary: TradeSummary,
    },
}

impl TradeEvent {
    #[inline]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"event":"SERIALIZATION_ERROR"}"#.to_string())
    }
}

// ─── Reporter ─────────────────────────────────────────────────────────────────

pub trait Reporter: Send + Sync {
    fn report(&self, event: &TradeEvent);
}

/// Console sink used by the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter {
    pub json: bool,
}

impl Reporter for LogReporter {
    fn report(&self, event: &TradeEvent) {
        match event {
            TradeEvent::PreconditionChecked { symbol, info } => {
                info!(%symbol, point = info.point, digits = info.digits, "🔌 Connected, market is closed");
            }
            TradeEvent::ReferenceCaptured { close } => {
                info!(close, "📌 Last close captured");
            }
            TradeEvent::WaitingForOpen { until } => {
                info!(%until, "⏰ Waiting to open position");
            }
            TradeEvent::GapEvaluated { assessment } => {
                info!(
                    direction = %assessment.direction,
                    gap_pips  = assessment.gap_pips,
                    entry     = assessment.reference_price,
                    target    = assessment.target_price,
                    "📏 Gap evaluated"
                );
            }
            TradeEvent::GapRejected { gap_pips, min_pips, max_pips } => {
                info!(gap_pips, min_pips, max_pips, "🚫 Gap outside range — no trade");
            }
            TradeEvent::PositionOpened { position } => {
                info!(
                    ticket    = position.ticket,
                    direction = %position.direction,
                    entry     = position.entry_price,
                    tp        = position.take_profit,
                    "✅ Position opened"
                );
            }
            TradeEvent::WaitingForClose { until } => {
                info!(%until, "⏰ Holding position until close time");
            }
            TradeEvent::CloseRetry { attempt, reason } => {
                warn!(attempt, %reason, "⚠️ Close failed — retrying");
            }
            TradeEvent::PositionClosed { summary } => {
                info!(
                    ticket      = summary.ticket,
                    close_price = summary.close_price,
                    profit      = ?summary.profit,
                    attempts    = summary.close_attempts,
                    "💰 Position closed"
                );
            }
        }

        if self.json {
            println!("{}", event.to_json());
        }
    }
}
