//! Scripted [`BrokerGateway`] for orchestrator tests.
//!
//! Every answer is configurable; queued tick / order results are consumed
//! front-to-back and fall back to a default once the queue is empty.  Every
//! submitted order is recorded so tests can assert on what was (not) sent.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::gateway::BrokerGateway;
use crate::models::{
    Direction, LastBar, OrderRequest, OrderResult, SymbolInfo, TickData, RETCODE_DONE,
};

pub struct MockGateway {
    pub connect_ok:     bool,
    pub connect_fails:  bool,
    pub select_ok:      bool,
    pub select_fails:   bool,
    pub symbol_info:    Option<SymbolInfo>,
    pub market_open:    bool,
    pub probe_fails:    bool,
    pub last_bar:       Option<LastBar>,
    pub default_tick:   Option<TickData>,
    pub profit:         f64,
    pub profit_fails:   bool,
    ticks:              Mutex<VecDeque<Result<Option<TickData>, GatewayError>>>,
    order_results:      Mutex<VecDeque<Result<OrderResult, GatewayError>>>,
    submitted:          Mutex<Vec<OrderRequest>>,
    profit_calls:       Mutex<Vec<(Direction, String, f64, f64, f64)>>,
    next_ticket:        Mutex<u64>,
}

impl MockGateway {
    /// A healthy, closed EURUSD market that last closed at 1.2000.
    pub fn new() -> Self {
        Self {
            connect_ok:   true,
            connect_fails: false,
            select_ok:    true,
            select_fails: false,
            symbol_info:  Some(SymbolInfo { point: 0.0001, digits: 4 }),
            market_open:  false,
            probe_fails:  false,
            last_bar:     Some(LastBar { close: 1.2000 }),
            default_tick: Some(TickData { bid: 1.1950, ask: 1.1952 }),
            profit:       18.0,
            profit_fails: false,
            ticks:         Mutex::new(VecDeque::new()),
            order_results: Mutex::new(VecDeque::new()),
            submitted:     Mutex::new(Vec::new()),
            profit_calls:  Mutex::new(Vec::new()),
            next_ticket:   Mutex::new(1000),
        }
    }

    pub fn push_tick(&self, tick: Result<Option<TickData>, GatewayError>) {
        self.ticks.lock().unwrap().push_back(tick);
    }

    pub fn push_order_result(&self, result: Result<OrderResult, GatewayError>) {
        self.order_results.lock().unwrap().push_back(result);
    }

    pub fn submitted(&self) -> Vec<OrderRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn profit_calls(&self) -> Vec<(Direction, String, f64, f64, f64)> {
        self.profit_calls.lock().unwrap().clone()
    }

    pub fn rejected(retcode: u32, comment: &str) -> OrderResult {
        OrderResult { retcode, ticket: None, comment: Some(comment.to_string()) }
    }
}

#[async_trait]
impl BrokerGateway for MockGateway {
    async fn connect(&self) -> Result<bool, GatewayError> {
        if self.connect_fails {
            return Err(GatewayError::Unreachable("connection refused".into()));
        }
        Ok(self.connect_ok)
    }

    async fn select_symbol(&self, _symbol: &str) -> Result<bool, GatewayError> {
        if self.select_fails {
            return Err(GatewayError::Http { status: 502, body: "bad gateway".into() });
        }
        Ok(self.select_ok)
    }

    async fn symbol_info(&self, _symbol: &str) -> Result<Option<SymbolInfo>, GatewayError> {
        Ok(self.symbol_info)
    }

    async fn probe_market_open(&self, _symbol: &str) -> Result<bool, GatewayError> {
        if self.probe_fails {
            return Err(GatewayError::Decode("missing field `ok`".into()));
        }
        Ok(self.market_open)
    }

    async fn last_closed_bar(&self, _symbol: &str) -> Result<Option<LastBar>, GatewayError> {
        Ok(self.last_bar)
    }

    async fn tick(&self, _symbol: &str) -> Result<Option<TickData>, GatewayError> {
        self.ticks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(self.default_tick))
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult, GatewayError> {
        self.submitted.lock().unwrap().push(request.clone());

        if let Some(scripted) = self.order_results.lock().unwrap().pop_front() {
            return scripted;
        }

        let mut ticket = self.next_ticket.lock().unwrap();
        *ticket += 1;
        Ok(OrderResult {
            retcode: RETCODE_DONE,
            ticket:  Some(*ticket),
            comment: Some("Request completed".to_string()),
        })
    }

    async fn compute_profit(
        &self,
        direction: Direction,
        symbol: &str,
        volume: f64,
        entry_price: f64,
        exit_price: f64,
    ) -> Result<f64, GatewayError> {
        self.profit_calls
            .lock()
            .unwrap()
            .push((direction, symbol.to_string(), volume, entry_price, exit_price));
        if self.profit_fails {
            return Err(GatewayError::Http { status: 500, body: "calc failed".into() });
        }
        Ok(self.profit)
    }
}
