//! Domain models shared across the whole crate.

pub mod order;
pub mod params;
pub mod position;
pub mod tick;

pub use order::{Direction, OrderRequest, OrderResult, RETCODE_DONE};
pub use params::TradeParameters;
pub use position::{OpenPosition, TradeSummary};
pub use tick::{LastBar, SymbolInfo, TickData};
