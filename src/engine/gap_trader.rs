//! # engine::gap_trader
//!
//! **Gap Trader** — drives one symbol through one gap-fade lifecycle.
//!
//! ```text
//! [0] connect · select symbol · symbol info · market must be CLOSED
//! [1] capture last completed bar close
//! [2] wait until next market open + open_after
//! [3] first tick → assess gap → in range? → market order with TP
//! [4] hold for close_after
//! [5] close at market, retrying every second until MT5 confirms
//! ```
//!
//! Phases 0–3 fail fast.  Phase 5 never gives up: a position that was
//! opened must not be left open when we report success.

use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::ExecutionSettings;
use crate::engine::gap::assess_gap;
use crate::engine::schedule::{after, next_open_at, wait_until};
use crate::error::{GapTradeError, GatewayError};
use crate::events::{Reporter, TradeEvent};
use crate::gateway::BrokerGateway;
use crate::models::{Direction, OpenPosition, OrderRequest, SymbolInfo, TradeParameters, TradeSummary};
use crate::state::{TradeSession, TradeState};

pub struct GapTrader<'a> {
    gateway:  &'a dyn BrokerGateway,
    clock:    &'a dyn Clock,
    reporter: &'a dyn Reporter,
    params:   TradeParameters,
    settings: ExecutionSettings,
    session:  TradeSession,
}

impl<'a> GapTrader<'a> {
    pub fn new(
        gateway: &'a dyn BrokerGateway,
        clock: &'a dyn Clock,
        reporter: &'a dyn Reporter,
        params: TradeParameters,
        settings: ExecutionSettings,
    ) -> Self {
        Self {
            gateway,
            clock,
            reporter,
            params,
            settings,
            session: TradeSession::new(),
        }
    }

    pub fn session(&self) -> &TradeSession {
        &self.session
    }

    /// Run the whole lifecycle.  `Ok` only once the position is closed.
    pub async fn run(&mut self) -> Result<TradeSummary, GapTradeError> {
        info!(
            run_id = %self.session.run_id,
            symbol = %self.params.symbol(),
            volume = self.params.volume(),
            "📈 Gap trade starting"
        );

        let result = self.run_phases().await;
        if result.is_err() && !self.session.state().is_terminal() {
            self.session.transition(TradeState::Failed);
        }
        result
    }

    async fn run_phases(&mut self) -> Result<TradeSummary, GapTradeError> {
        let info = self.check_preconditions().await?;
        let reference_close = self.capture_reference().await?;
        self.wait_for_open().await;
        let position = self.enter(reference_close, &info).await?;
        self.hold(&position).await;
        Ok(self.close_with_retry(position).await)
    }

    // ─── Phase 0 ──────────────────────────────────────────────────────────────

    async fn check_preconditions(&mut self) -> Result<SymbolInfo, GapTradeError> {
        let symbol = self.params.symbol();

        // ── 1. Terminal connection ────────────────────────────────────────────
        match self.gateway.connect().await {
            Ok(true) => {}
            Ok(false) => {
                return Err(GapTradeError::Connection("terminal refused to initialize".into()))
            }
            Err(e) => return Err(GapTradeError::Connection(e.to_string())),
        }

        // ── 2. Market Watch selection ─────────────────────────────────────────
        let selected = self.gateway.select_symbol(symbol).await.map_err(|e| {
            GapTradeError::Symbol { symbol: symbol.to_string(), reason: e.to_string() }
        })?;
        if !selected {
            return Err(GapTradeError::Symbol {
                symbol: symbol.to_string(),
                reason: "rejected by terminal".into(),
            });
        }

        // ── 3. Point / digits ─────────────────────────────────────────────────
        let info = self
            .gateway
            .symbol_info(symbol)
            .await
            .map_err(|e| data_error("symbol info", symbol, e))?
            .ok_or_else(|| GapTradeError::Data(format!("no symbol info for {symbol}")))?;
        if !info.is_usable() {
            return Err(GapTradeError::Data(format!(
                "unusable symbol info for {symbol}: point = {}",
                info.point
            )));
        }

        // ── 4. Market must still be closed ────────────────────────────────────
        // The session is assumed to be today's; no exchange calendar or
        // timezone is consulted.
        let open = self
            .gateway
            .probe_market_open(symbol)
            .await
            .map_err(|e| data_error("market probe", symbol, e))?;
        if open {
            return Err(GapTradeError::MarketAlreadyOpen { symbol: symbol.to_string() });
        }

        self.session.symbol_info = Some(info);
        self.session.transition(TradeState::PreconditionChecked);
        self.reporter.report(&TradeEvent::PreconditionChecked { symbol: symbol.to_string(), info });
        Ok(info)
    }

    // ─── Phase 1 ──────────────────────────────────────────────────────────────

    async fn capture_reference(&mut self) -> Result<f64, GapTradeError> {
        let symbol = self.params.symbol();
        let bar = self
            .gateway
            .last_closed_bar(symbol)
            .await
            .map_err(|e| data_error("last bar", symbol, e))?
            .ok_or_else(|| GapTradeError::Data(format!("no completed bar for {symbol}")))?;

        self.session.reference_close = Some(bar.close);
        self.session.transition(TradeState::ReferenceCaptured);
        self.reporter.report(&TradeEvent::ReferenceCaptured { close: bar.close });
        Ok(bar.close)
    }

    // ─── Phase 2 ──────────────────────────────────────────────────────────────

    async fn wait_for_open(&mut self) {
        let until = next_open_at(
            self.clock.now(),
            self.params.market_open_time(),
            self.params.open_after_seconds(),
        );
        self.session.transition(TradeState::WaitingForOpen);
        self.reporter.report(&TradeEvent::WaitingForOpen { until });
        wait_until(self.clock, until, self.settings.poll_interval).await;
    }

    // ─── Phase 3 ──────────────────────────────────────────────────────────────

    async fn enter(
        &mut self,
        reference_close: f64,
        info: &SymbolInfo,
    ) -> Result<OpenPosition, GapTradeError> {
        let symbol = self.params.symbol();

        let tick = self
            .gateway
            .tick(symbol)
            .await
            .map_err(|e| data_error("tick", symbol, e))?
            .ok_or_else(|| GapTradeError::Data(format!("no tick for {symbol}")))?;
        debug!(bid = tick.bid, ask = tick.ask, spread = tick.spread(), "Opening tick");

        let assessment = assess_gap(&tick, reference_close, self.params.fill_gap_ratio(), info);
        self.session.assessment = Some(assessment);
        self.session.transition(TradeState::GapEvaluated);
        self.reporter.report(&TradeEvent::GapEvaluated { assessment });

        if !self.params.gap_in_range(assessment.gap_pips) {
            self.session.transition(TradeState::RangeRejected);
            self.reporter.report(&TradeEvent::GapRejected {
                gap_pips: assessment.gap_pips,
                min_pips: self.params.min_gap_pips(),
                max_pips: self.params.max_gap_pips(),
            });
            return Err(GapTradeError::GapOutOfRange {
                gap_pips: assessment.gap_pips,
                min_pips: self.params.min_gap_pips(),
                max_pips: self.params.max_gap_pips(),
            });
        }

        let entry_price = assessment.reference_price;
        let request = OrderRequest {
            symbol:      symbol.to_string(),
            volume:      self.params.volume(),
            direction:   assessment.direction,
            price:       entry_price,
            take_profit: Some(assessment.target_price),
            stop_loss:   None,
            deviation:   self.settings.deviation,
            magic:       self.settings.magic,
            comment:     format!("doubo {} at {entry_price}", assessment.direction),
            position:    None,
        };

        let result = self
            .gateway
            .submit_order(&request)
            .await
            .map_err(|e| GapTradeError::Order(e.to_string()))?;

        let ticket = match result.ticket {
            Some(ticket) if result.is_confirmed() => ticket,
            _ => return Err(GapTradeError::Order(result.describe())),
        };

        let position = OpenPosition {
            ticket,
            symbol:      symbol.to_string(),
            direction:   assessment.direction,
            entry_price,
            volume:      self.params.volume(),
            take_profit: assessment.target_price,
            opened_at:   self.clock.now(),
        };

        self.session.position = Some(position.clone());
        self.session.transition(TradeState::Entered);
        self.reporter.report(&TradeEvent::PositionOpened { position: position.clone() });
        Ok(position)
    }

    // ─── Phase 4 ──────────────────────────────────────────────────────────────

    async fn hold(&mut self, position: &OpenPosition) {
        let until = after(position.opened_at, self.params.close_after_seconds());
        self.session.transition(TradeState::WaitingForClose);
        self.reporter.report(&TradeEvent::WaitingForClose { until });
        wait_until(self.clock, until, self.settings.poll_interval).await;
    }

    // ─── Phase 5 ──────────────────────────────────────────────────────────────

    /// Close `position`, retrying forever with a fixed delay.
    async fn close_with_retry(&mut self, position: OpenPosition) -> TradeSummary {
        self.session.transition(TradeState::ClosingRetryLoop);
        let close_direction = position.direction.opposite();

        let close_price = loop {
            self.session.close_attempts += 1;
            match self.try_close(&position, close_direction).await {
                Ok(price) => break price,
                Err(reason) => {
                    let attempt = self.session.close_attempts;
                    self.reporter.report(&TradeEvent::CloseRetry { attempt, reason });
                    self.clock.sleep(self.settings.close_retry_delay).await;
                }
            }
        };

        let profit = match self
            .gateway
            .compute_profit(
                position.direction,
                &position.symbol,
                position.volume,
                position.entry_price,
                close_price,
            )
            .await
        {
            Ok(profit) => Some(profit),
            Err(e) => {
                warn!(error = %e, ticket = position.ticket, "Position closed but profit is unavailable");
                None
            }
        };

        let gap_pips = self.session.assessment.map(|a| a.gap_pips).unwrap_or_default();
        let mut summary = TradeSummary::from_position(
            self.session.run_id,
            &position,
            gap_pips,
            close_price,
            self.clock.now(),
        );
        summary.profit = profit;
        summary.close_attempts = self.session.close_attempts;

        self.session.position = None;
        self.session.transition(TradeState::Closed);
        self.reporter.report(&TradeEvent::PositionClosed { summary: summary.clone() });
        summary
    }

    /// One close attempt.  `Err` carries the reason to report.
    ///
    /// The price is the side the opposite order fills on: a Buy position is
    /// sold at the bid, a Sell position is bought back at the ask.
    async fn try_close(
        &self,
        position: &OpenPosition,
        close_direction: Direction,
    ) -> Result<f64, String> {
        let tick = match self.gateway.tick(&position.symbol).await {
            Ok(Some(tick)) => tick,
            Ok(None) => return Err(format!("no tick for {}", position.symbol)),
            Err(e) => return Err(e.to_string()),
        };

        let price = match close_direction {
            Direction::Sell => tick.bid,
            Direction::Buy  => tick.ask,
        };

        let request = OrderRequest {
            symbol:      position.symbol.clone(),
            volume:      position.volume,
            direction:   close_direction,
            price,
            take_profit: None,
            stop_loss:   None,
            deviation:   self.settings.deviation,
            magic:       self.settings.magic,
            comment:     format!("doubo close {close_direction} at {price}"),
            position:    Some(position.ticket),
        };

        match self.gateway.submit_order(&request).await {
            Ok(result) if result.is_confirmed() => Ok(price),
            Ok(result) => Err(result.describe()),
            Err(e) => Err(e.to_string()),
        }
    }
}

fn data_error(what: &str, symbol: &str, e: GatewayError) -> GapTradeError {
    GapTradeError::Data(format!("{what} for {symbol}: {e}"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::events::testing::RecordingReporter;
    use crate::gateway::mock::MockGateway;
    use crate::models::{LastBar, OrderResult, TickData, RETCODE_DONE};

    const EPS: f64 = 1e-9;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap().and_hms_opt(23, 59, 58).unwrap()
    }

    fn opening() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn make_params(close_after: u64, ratio: f64, min_pips: i64) -> TradeParameters {
        let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        TradeParameters::new("EURUSD", 0.1, midnight, 0, close_after, ratio, min_pips, 10_000)
            .unwrap()
    }

    fn make_settings() -> ExecutionSettings {
        ExecutionSettings {
            close_retry_delay: Duration::from_millis(250),
            ..ExecutionSettings::default()
        }
    }

    fn confirmed(ticket: u64) -> OrderResult {
        OrderResult { retcode: RETCODE_DONE, ticket: Some(ticket), comment: None }
    }

    fn retry_sleeps(clock: &ManualClock) -> usize {
        clock.sleeps().iter().filter(|d| **d == Duration::from_millis(250)).count()
    }

    #[tokio::test]
    async fn test_gap_down_buys_and_closes_with_profit() {
        let gateway = MockGateway::new();
        gateway.push_tick(Ok(Some(TickData { bid: 1.1950, ask: 1.1952 })));
        gateway.push_tick(Ok(Some(TickData { bid: 1.1970, ask: 1.1972 })));
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();

        let mut trader = GapTrader::new(&gateway, &clock, &reporter, make_params(0, 0.5, 10), make_settings());
        let summary = trader.run().await.unwrap();

        assert_eq!(trader.session().state(), TradeState::Closed);
        assert!(trader.session().position.is_none());
        assert_eq!(summary.direction, Direction::Buy);
        assert_eq!(summary.gap_pips, 48);
        assert_eq!(summary.entry_price, 1.1952);
        assert_eq!(summary.close_price, 1.1970);
        assert_eq!(summary.profit, Some(18.0));
        assert_eq!(summary.close_attempts, 1);
        assert_eq!(summary.opened_at, opening());

        // Entry: buy at ask with TP = entry + gap * ratio, no SL.
        let orders = gateway.submitted();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].direction, Direction::Buy);
        assert!((orders[0].take_profit.unwrap() - 1.1976).abs() < EPS);
        assert_eq!(orders[0].stop_loss, None);
        assert_eq!(orders[0].magic, 309613);
        assert_eq!(orders[0].comment, "doubo buy at 1.1952");
        assert_eq!(orders[0].position, None);

        // Close: opposite direction at bid, referencing the entry ticket.
        assert_eq!(orders[1].direction, Direction::Sell);
        assert_eq!(orders[1].price, 1.1970);
        assert_eq!(orders[1].position, Some(summary.ticket));

        assert_eq!(
            gateway.profit_calls(),
            vec![(Direction::Buy, "EURUSD".to_string(), 0.1, 1.1952, 1.1970)]
        );

        // Only the wait for the 00:00 open slept; the zero hold did not.
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(1); 2]);
    }

    #[tokio::test]
    async fn test_gap_up_sells_and_closes_at_ask() {
        let gateway = MockGateway::new();
        gateway.push_tick(Ok(Some(TickData { bid: 1.2050, ask: 1.2048 })));
        gateway.push_tick(Ok(Some(TickData { bid: 1.2010, ask: 1.2012 })));
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();

        let mut trader = GapTrader::new(&gateway, &clock, &reporter, make_params(0, 1.0, 10), make_settings());
        let summary = trader.run().await.unwrap();

        assert_eq!(summary.direction, Direction::Sell);
        assert_eq!(summary.gap_pips, 50);
        let orders = gateway.submitted();
        assert!((orders[0].take_profit.unwrap() - 1.2000).abs() < EPS);
        assert_eq!(orders[1].direction, Direction::Buy);
        assert_eq!(orders[1].price, 1.2012);
        assert_eq!(
            gateway.profit_calls(),
            vec![(Direction::Sell, "EURUSD".to_string(), 0.1, 1.2050, 1.2012)]
        );
    }

    #[tokio::test]
    async fn test_gap_below_minimum_places_no_order() {
        let gateway = MockGateway::new();
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();

        let mut trader = GapTrader::new(&gateway, &clock, &reporter, make_params(0, 1.0, 100), make_settings());
        let err = trader.run().await.unwrap_err();

        assert!(matches!(
            err,
            GapTradeError::GapOutOfRange { gap_pips: 48, min_pips: 100, max_pips: 10_000 }
        ));
        assert!(err.is_informational());
        assert_eq!(trader.session().state(), TradeState::RangeRejected);
        assert!(gateway.submitted().is_empty());
        assert!(reporter
            .events()
            .iter()
            .any(|e| matches!(e, TradeEvent::GapRejected { gap_pips: 48, .. })));
    }

    #[tokio::test]
    async fn test_gap_above_maximum_places_no_order() {
        let gateway = MockGateway::new();
        gateway.push_tick(Ok(Some(TickData { bid: 1.3000, ask: 1.3002 })));
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();
        let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        let params = TradeParameters::new("EURUSD", 0.1, midnight, 0, 0, 1.0, 100, 500).unwrap();

        let mut trader = GapTrader::new(&gateway, &clock, &reporter, params, make_settings());
        let err = trader.run().await.unwrap_err();

        assert!(matches!(err, GapTradeError::GapOutOfRange { gap_pips: 1000, .. }));
        assert!(gateway.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_open_market_fails_precondition() {
        let mut gateway = MockGateway::new();
        gateway.market_open = true;
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();

        let mut trader = GapTrader::new(&gateway, &clock, &reporter, make_params(0, 1.0, 10), make_settings());
        let err = trader.run().await.unwrap_err();

        assert!(matches!(err, GapTradeError::MarketAlreadyOpen { .. }));
        assert_eq!(trader.session().state(), TradeState::Failed);
        assert!(clock.sleeps().is_empty());
        assert!(reporter.events().is_empty());
    }

    #[tokio::test]
    async fn test_setup_failures_map_to_taxonomy() {
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();

        let mut refused = MockGateway::new();
        refused.connect_ok = false;
        let err = GapTrader::new(&refused, &clock, &reporter, make_params(0, 1.0, 10), make_settings())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, GapTradeError::Connection(_)));

        let mut unknown = MockGateway::new();
        unknown.select_ok = false;
        let err = GapTrader::new(&unknown, &clock, &reporter, make_params(0, 1.0, 10), make_settings())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, GapTradeError::Symbol { .. }));

        let mut no_info = MockGateway::new();
        no_info.symbol_info = None;
        let err = GapTrader::new(&no_info, &clock, &reporter, make_params(0, 1.0, 10), make_settings())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, GapTradeError::Data(_)));

        let mut no_bar = MockGateway::new();
        no_bar.last_bar = None;
        let err = GapTrader::new(&no_bar, &clock, &reporter, make_params(0, 1.0, 10), make_settings())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, GapTradeError::Data(_)));
    }

    #[tokio::test]
    async fn test_transport_errors_map_to_taxonomy() {
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();

        let mut down = MockGateway::new();
        down.connect_fails = true;
        let err = GapTrader::new(&down, &clock, &reporter, make_params(0, 1.0, 10), make_settings())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, GapTradeError::Connection(_)));

        let mut select_broken = MockGateway::new();
        select_broken.select_fails = true;
        let err = GapTrader::new(&select_broken, &clock, &reporter, make_params(0, 1.0, 10), make_settings())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, GapTradeError::Symbol { .. }));

        let mut probe_broken = MockGateway::new();
        probe_broken.probe_fails = true;
        let mut trader = GapTrader::new(&probe_broken, &clock, &reporter, make_params(0, 1.0, 10), make_settings());
        let err = trader.run().await.unwrap_err();
        assert!(matches!(err, GapTradeError::Data(_)));
        assert_eq!(trader.session().state(), TradeState::Failed);

        assert!(down.submitted().is_empty());
        assert!(select_broken.submitted().is_empty());
        assert!(probe_broken.submitted().is_empty());
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_zero_point_symbol_info_places_no_order() {
        let mut gateway = MockGateway::new();
        gateway.symbol_info = Some(SymbolInfo { point: 0.0, digits: 4 });
        gateway.push_tick(Ok(Some(TickData { bid: 1.1998, ask: 1.2000 })));
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();

        let mut trader = GapTrader::new(&gateway, &clock, &reporter, make_params(0, 1.0, 0), make_settings());
        let err = trader.run().await.unwrap_err();

        assert!(matches!(err, GapTradeError::Data(_)));
        assert_eq!(trader.session().state(), TradeState::Failed);
        assert!(gateway.submitted().is_empty());
        assert!(reporter.events().is_empty());
    }

    #[tokio::test]
    async fn test_missing_opening_tick_is_data_error() {
        let gateway = MockGateway::new();
        gateway.push_tick(Ok(None));
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();

        let mut trader = GapTrader::new(&gateway, &clock, &reporter, make_params(0, 1.0, 10), make_settings());
        let err = trader.run().await.unwrap_err();

        assert!(matches!(err, GapTradeError::Data(_)));
        assert!(gateway.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_entry_is_order_error() {
        let gateway = MockGateway::new();
        gateway.push_order_result(Ok(MockGateway::rejected(10019, "No money")));
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();

        let mut trader = GapTrader::new(&gateway, &clock, &reporter, make_params(0, 1.0, 10), make_settings());
        let err = trader.run().await.unwrap_err();

        match err {
            GapTradeError::Order(msg) => assert!(msg.contains("10019")),
            other => panic!("expected Order error, got {other:?}"),
        }
        assert_eq!(trader.session().state(), TradeState::Failed);
        assert_eq!(gateway.submitted().len(), 1);
    }

    #[tokio::test]
    async fn test_close_retries_until_confirmed_with_same_ticket() {
        let gateway = MockGateway::new();
        gateway.push_order_result(Ok(confirmed(77)));
        gateway.push_order_result(Ok(MockGateway::rejected(10004, "Requote")));
        gateway.push_order_result(Err(GatewayError::Unreachable("timeout".into())));
        gateway.push_order_result(Ok(MockGateway::rejected(10018, "Market closed")));
        gateway.push_order_result(Ok(confirmed(78)));
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();

        let mut trader = GapTrader::new(&gateway, &clock, &reporter, make_params(0, 1.0, 10), make_settings());
        let summary = trader.run().await.unwrap();

        let orders = gateway.submitted();
        assert_eq!(orders.len(), 1 + 4);
        assert!(orders[1..].iter().all(|o| o.position == Some(77)));
        assert!(orders[1..].iter().all(|o| o.direction == Direction::Sell));
        assert_eq!(summary.ticket, 77);
        assert_eq!(summary.close_attempts, 4);
        assert_eq!(retry_sleeps(&clock), 3);

        let retries: Vec<u32> = reporter
            .events()
            .iter()
            .filter_map(|e| match e {
                TradeEvent::CloseRetry { attempt, .. } => Some(*attempt),
                _ => None,
            })
            .collect();
        assert_eq!(retries, vec![1, 2, 3]);
        assert_eq!(trader.session().state(), TradeState::Closed);
    }

    #[tokio::test]
    async fn test_close_retries_when_tick_unavailable() {
        let gateway = MockGateway::new();
        gateway.push_tick(Ok(Some(TickData { bid: 1.1950, ask: 1.1952 })));
        gateway.push_tick(Err(GatewayError::Unreachable("refused".into())));
        gateway.push_tick(Ok(None));
        gateway.push_tick(Ok(Some(TickData { bid: 1.1960, ask: 1.1962 })));
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();

        let mut trader = GapTrader::new(&gateway, &clock, &reporter, make_params(0, 1.0, 10), make_settings());
        let summary = trader.run().await.unwrap();

        assert_eq!(gateway.submitted().len(), 2);
        assert_eq!(summary.close_price, 1.1960);
        assert_eq!(summary.close_attempts, 3);
        assert_eq!(retry_sleeps(&clock), 2);

        let retries: Vec<u32> = reporter
            .events()
            .iter()
            .filter_map(|e| match e {
                TradeEvent::CloseRetry { attempt, .. } => Some(*attempt),
                _ => None,
            })
            .collect();
        assert_eq!(retries, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_close_price_is_opposite_side_of_entry() {
        // (opening tick, position, close order, close price); closing tick 1.1970/1.1972
        let cases = [
            (TickData { bid: 1.1950, ask: 1.1952 }, Direction::Buy, Direction::Sell, 1.1970),
            (TickData { bid: 1.2050, ask: 1.2048 }, Direction::Sell, Direction::Buy, 1.1972),
        ];

        for (opening, held, closed_by, expected) in cases {
            let gateway = MockGateway::new();
            gateway.push_tick(Ok(Some(opening)));
            gateway.push_tick(Ok(Some(TickData { bid: 1.1970, ask: 1.1972 })));
            let clock = ManualClock::new(start());
            let reporter = RecordingReporter::default();

            let mut trader = GapTrader::new(&gateway, &clock, &reporter, make_params(0, 1.0, 10), make_settings());
            let summary = trader.run().await.unwrap();

            assert_eq!(summary.direction, held);
            assert_eq!(summary.close_price, expected);
            let orders = gateway.submitted();
            assert_eq!(orders[1].direction, closed_by);
            assert_eq!(orders[1].price, expected);
        }
    }

    #[tokio::test]
    async fn test_hold_waits_close_after_from_entry() {
        let gateway = MockGateway::new();
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();
        let settings = ExecutionSettings { poll_interval: Duration::from_secs(60), ..make_settings() };

        let mut trader = GapTrader::new(&gateway, &clock, &reporter, make_params(3600, 1.0, 10), settings);
        let summary = trader.run().await.unwrap();

        assert_eq!(clock.total_slept(), Duration::from_secs(2 + 3600));
        assert_eq!(summary.closed_at, opening() + chrono::Duration::hours(1));
        assert!(reporter.events().iter().any(|e| matches!(
            e,
            TradeEvent::WaitingForClose { until } if *until == opening() + chrono::Duration::hours(1)
        )));
    }

    #[tokio::test]
    async fn test_profit_failure_still_reports_closed() {
        let mut gateway = MockGateway::new();
        gateway.profit_fails = true;
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();

        let mut trader = GapTrader::new(&gateway, &clock, &reporter, make_params(0, 1.0, 10), make_settings());
        let summary = trader.run().await.unwrap();

        assert_eq!(summary.profit, None);
        assert_eq!(trader.session().state(), TradeState::Closed);
    }

    #[tokio::test]
    async fn test_event_sequence_for_full_run() {
        let mut gateway = MockGateway::new();
        gateway.last_bar = Some(LastBar { close: 1.2000 });
        let clock = ManualClock::new(start());
        let reporter = RecordingReporter::default();

        let mut trader = GapTrader::new(&gateway, &clock, &reporter, make_params(0, 1.0, 10), make_settings());
        trader.run().await.unwrap();

        let names: Vec<&str> = reporter
            .events()
            .iter()
            .map(|e| match e {
                TradeEvent::PreconditionChecked { .. } => "precondition",
                TradeEvent::ReferenceCaptured { .. } => "reference",
                TradeEvent::WaitingForOpen { .. } => "wait_open",
                TradeEvent::GapEvaluated { .. } => "gap",
                TradeEvent::GapRejected { .. } => "rejected",
                TradeEvent::PositionOpened { .. } => "opened",
                TradeEvent::WaitingForClose { .. } => "wait_close",
                TradeEvent::CloseRetry { .. } => "retry",
                TradeEvent::PositionClosed { .. } => "closed",
            })
            .collect();
        assert_eq!(
            names,
            vec!["precondition", "reference", "wait_open", "gap", "opened", "wait_close", "closed"]
        );
    }
}
