//! # config — read settings from environment variables
//!
//! `.env` is loaded by `main` first (optional — CI/prod can use real env
//! vars).
//!
//! | Variable           | Default                 | Description                          |
//! |--------------------|-------------------------|--------------------------------------|
//! | `MT5_BASE_URL`     | `http://localhost:8081` | Base URL of the MT5 EA bridge        |
//! | `MT5_TIMEOUT_SECS` | `5`                     | Per-request timeout                  |
//! | `ORDER_DEVIATION`  | `10`                    | Max slippage in points               |
//! | `ORDER_MAGIC`      | `309613`                | Magic number tagging our orders      |
//! | `POLL_INTERVAL_MS` | `1000`                  | Scheduled-wait polling interval      |
//! | `CLOSE_RETRY_SECS` | `1`                     | Delay between failed close attempts  |
//! | `RUST_LOG`         | `doubo=debug`           | Tracing filter                       |

use std::time::Duration;

use anyhow::Context;

/// Magic number stamped on every order this tool sends.
pub const DEFAULT_MAGIC: u64 = 309613;

// ─── BridgeConfig ─────────────────────────────────────────────────────────────

/// Where and how to reach the MT5 EA bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub base_url: String,
    pub timeout:  Duration,
}

// ─── ExecutionSettings ────────────────────────────────────────────────────────

/// Knobs of the gap trader that are not part of the trade itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSettings {
    pub deviation:         u32,
    pub magic:             u64,
    /// Upper bound of one sleep inside a scheduled wait.
    pub poll_interval:     Duration,
    /// Fixed pause after a failed close attempt.  Never grows.
    pub close_retry_delay: Duration,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            deviation:         10,
            magic:             DEFAULT_MAGIC,
            poll_interval:     Duration::from_secs(1),
            close_retry_delay: Duration::from_secs(1),
        }
    }
}

// ─── Config ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Config {
    pub bridge:    BridgeConfig,
    pub execution: ExecutionSettings,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = ExecutionSettings::default();

        let timeout_secs: u64 = env_or("MT5_TIMEOUT_SECS", 5)
            .context("MT5_TIMEOUT_SECS must be a number")?;
        let poll_ms: u64 = env_or("POLL_INTERVAL_MS", defaults.poll_interval.as_millis() as u64)
            .context("POLL_INTERVAL_MS must be a number")?;
        let retry_secs: u64 = env_or("CLOSE_RETRY_SECS", defaults.close_retry_delay.as_secs())
            .context("CLOSE_RETRY_SECS must be a number")?;

        if poll_ms == 0 {
            anyhow::bail!("POLL_INTERVAL_MS must be greater than zero");
        }

        Ok(Self {
            bridge: BridgeConfig {
                base_url: std::env::var("MT5_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8081".to_string()),
                timeout:  Duration::from_secs(timeout_secs),
            },
            execution: ExecutionSettings {
                deviation:         env_or("ORDER_DEVIATION", defaults.deviation)
                    .context("ORDER_DEVIATION must be a number")?,
                magic:             env_or("ORDER_MAGIC", defaults.magic)
                    .context("ORDER_MAGIC must be a number")?,
                poll_interval:     Duration::from_millis(poll_ms),
                close_retry_delay: Duration::from_secs(retry_secs),
            },
        })
    }
}

/// Parse `key` if set, otherwise `default`.  A set-but-garbage value is an
/// error rather than a silent fallback.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().with_context(|| format!("invalid value '{raw}' for {key}")),
        Err(_) => Ok(default),
    }
}
