//! # gateway::mt5
//!
//! **MT5 bridge** — [`BrokerGateway`] over HTTP to an MT5 EA adapter.
//!
//! ## EA API Contract
//!
//! | Method | Path                  | Response                                  |
//! |--------|-----------------------|-------------------------------------------|
//! | POST   | `/initialize`         | `{ "ok": true }`                          |
//! | POST   | `/symbol/select`      | `{ "ok": true }`                          |
//! | GET    | `/symbol/info`        | `{ "point": 0.00001, "digits": 5 }` / 404 |
//! | POST   | `/market-book/add`    | `{ "ok": true }` (true = market open)     |
//! | GET    | `/rates/last`         | `{ "close": 1.0842 }` / 404               |
//! | GET    | `/tick`               | `{ "bid": 1.0841, "ask": 1.0843 }` / 404  |
//! | POST   | `/order/send`         | `{ "retcode": 10009, "order": 123456 }`   |
//! | POST   | `/order/calc-profit`  | `{ "profit": 12.5 }`                      |
//!
//! retcode 10009 = `TRADE_RETCODE_DONE`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::BridgeConfig;
use crate::error::GatewayError;
use crate::gateway::BrokerGateway;
use crate::models::{Direction, LastBar, OrderRequest, OrderResult, SymbolInfo, TickData};

// ─── Wire Types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct OkResponse {
    ok: bool,
}

#[derive(Debug, Deserialize)]
struct ProfitResponse {
    profit: f64,
}

#[derive(Debug, Serialize)]
struct SymbolRequest<'a> {
    symbol: &'a str,
}

#[derive(Debug, Serialize)]
struct CalcProfitRequest<'a> {
    direction:   Direction,
    symbol:      &'a str,
    volume:      f64,
    price_open:  f64,
    price_close: f64,
}

// ─── Mt5Bridge ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Mt5Bridge {
    client:   reqwest::Client,
    base_url: String,
    timeout:  Duration,
}

impl Mt5Bridge {
    pub fn new(client: reqwest::Client, config: &BridgeConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout:  config.timeout,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET returning `None` on 404 (symbol / bar / tick not available).
    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        symbol: &str,
    ) -> Result<Option<T>, GatewayError> {
        let url = self.endpoint(path);
        debug!(%url, symbol, "MT5 bridge GET");

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, %url, "MT5 unreachable");
                GatewayError::Unreachable(e.to_string())
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response).await.map(Some)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let url = self.endpoint(path);
        debug!(%url, "MT5 bridge POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, %url, "MT5 unreachable");
                GatewayError::Unreachable(e.to_string())
            })?;

        decode(response).await
    }
}

/// Check the HTTP status, then parse the JSON body.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(http_status = %status, body = %body, "MT5 returned HTTP error");
        return Err(GatewayError::Http { status: status.as_u16(), body });
    }

    response.json().await.map_err(|e| {
        error!(error = %e, "MT5 response parse failed");
        GatewayError::Decode(e.to_string())
    })
}

#[async_trait]
impl BrokerGateway for Mt5Bridge {
    async fn connect(&self) -> Result<bool, GatewayError> {
        let resp: OkResponse = self.post("/initialize", &serde_json::json!({})).await?;
        Ok(resp.ok)
    }

    async fn select_symbol(&self, symbol: &str) -> Result<bool, GatewayError> {
        let resp: OkResponse = self.post("/symbol/select", &SymbolRequest { symbol }).await?;
        Ok(resp.ok)
    }

    async fn symbol_info(&self, symbol: &str) -> Result<Option<SymbolInfo>, GatewayError> {
        self.get_optional("/symbol/info", symbol).await
    }

    async fn probe_market_open(&self, symbol: &str) -> Result<bool, GatewayError> {
        let resp: OkResponse = self.post("/market-book/add", &SymbolRequest { symbol }).await?;
        Ok(resp.ok)
    }

    async fn last_closed_bar(&self, symbol: &str) -> Result<Option<LastBar>, GatewayError> {
        self.get_optional("/rates/last", symbol).await
    }

    async fn tick(&self, symbol: &str) -> Result<Option<TickData>, GatewayError> {
        self.get_optional("/tick", symbol).await
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult, GatewayError> {
        info!(
            symbol    = %request.symbol,
            direction = %request.direction,
            volume    = request.volume,
            price     = request.price,
            tp        = ?request.take_profit,
            position  = ?request.position,
            "🚀 [MT5] Sending order"
        );

        let result: OrderResult = self.post("/order/send", request).await?;

        if result.is_confirmed() {
            info!(ticket = ?result.ticket, "✅ [MT5] Order accepted");
        } else {
            warn!(reason = %result.describe(), "MT5 rejected order");
        }
        Ok(result)
    }

    async fn compute_profit(
        &self,
        direction: Direction,
        symbol: &str,
        volume: f64,
        entry_price: f64,
        exit_price: f64,
    ) -> Result<f64, GatewayError> {
        let body = CalcProfitRequest {
            direction,
            symbol,
            volume,
            price_open:  entry_price,
            price_close: exit_price,
        };
        let resp: ProfitResponse = self.post("/order/calc-profit", &body).await?;
        Ok(resp.profit)
    }
}
