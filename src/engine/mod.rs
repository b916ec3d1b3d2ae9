//! The gap-trade engine: the pure gap decision, wall-clock scheduling and
//! the orchestrator that strings the phases together.

pub mod gap;
pub mod gap_trader;
pub mod schedule;

pub use gap::{assess_gap, GapAssessment};
pub use gap_trader::GapTrader;
