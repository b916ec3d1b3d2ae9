//! # gateway
//!
//! The broker capability the gap trader drives.  The orchestrator only ever
//! sees `&dyn BrokerGateway`, so the session is an explicit handle rather than
//! process-wide state, and tests can script every answer.
//!
//! `Err(GatewayError)` means "could not ask"; a `false` / `None` answer means
//! MT5 was asked and said no.

pub mod mt5;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::models::{Direction, LastBar, OrderRequest, OrderResult, SymbolInfo, TickData};

pub use mt5::Mt5Bridge;

#[async_trait]
pub trait BrokerGateway: Send + Sync {
    /// Initialise the terminal connection.
    async fn connect(&self) -> Result<bool, GatewayError>;

    /// Add `symbol` to Market Watch so quotes flow for it.
    async fn select_symbol(&self, symbol: &str) -> Result<bool, GatewayError>;

    async fn symbol_info(&self, symbol: &str) -> Result<Option<SymbolInfo>, GatewayError>;

    /// `true` if the market is currently open (market-depth subscription
    /// accepted).
    async fn probe_market_open(&self, symbol: &str) -> Result<bool, GatewayError>;

    /// Close of the most recent completed bar.
    async fn last_closed_bar(&self, symbol: &str) -> Result<Option<LastBar>, GatewayError>;

    async fn tick(&self, symbol: &str) -> Result<Option<TickData>, GatewayError>;

    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult, GatewayError>;

    /// Realised profit, in account currency, of a round trip.
    async fn compute_profit(
        &self,
        direction: Direction,
        symbol: &str,
        volume: f64,
        entry_price: f64,
        exit_price: f64,
    ) -> Result<f64, GatewayError>;
}
