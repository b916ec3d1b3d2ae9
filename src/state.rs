//! # state
//!
//! The lifecycle of one gap-trade invocation as an explicit state machine.
//!
//! ```text
//! Idle → PreconditionChecked → ReferenceCaptured → WaitingForOpen → GapEvaluated
//!                                                                     │
//!                                   RangeRejected ◀────────────────────┤
//!                                                                     ▼
//!                          Closed ◀─ ClosingRetryLoop ◀─ WaitingForClose ◀─ Entered
//!
//! any phase 0–3 failure ──▶ Failed
//! ```
//!
//! [`TradeSession`] is owned by the orchestrator alone; nothing here is
//! shared or persisted.

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::engine::gap::GapAssessment;
use crate::models::{OpenPosition, SymbolInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeState {
    Idle,
    PreconditionChecked,
    ReferenceCaptured,
    WaitingForOpen,
    GapEvaluated,
    RangeRejected,
    Entered,
    WaitingForClose,
    ClosingRetryLoop,
    Closed,
    Failed,
}

impl TradeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TradeState::RangeRejected | TradeState::Closed | TradeState::Failed)
    }
}

/// Everything one invocation learns along the way.
#[derive(Debug, Clone)]
pub struct TradeSession {
    pub run_id:          Uuid,
    state:               TradeState,
    pub symbol_info:     Option<SymbolInfo>,
    pub reference_close: Option<f64>,
    pub assessment:      Option<GapAssessment>,
    /// Present between a confirmed entry and a confirmed close.
    pub position:        Option<OpenPosition>,
    pub close_attempts:  u32,
}

impl TradeSession {
    pub fn new() -> Self {
        Self {
            run_id:          Uuid::new_v4(),
            state:           TradeState::Idle,
            symbol_info:     None,
            reference_close: None,
            assessment:      None,
            position:        None,
            close_attempts:  0,
        }
    }

    pub fn state(&self) -> TradeState {
        self.state
    }

    pub fn transition(&mut self, next: TradeState) {
        debug!(run_id = %self.run_id, from = ?self.state, to = ?next, "State transition");
        self.state = next;
    }
}

impl Default for TradeSession {
    fn default() -> Self {
        Self::new()
    }
}
