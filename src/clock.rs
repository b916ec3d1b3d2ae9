//! # clock
//!
//! The time source behind every scheduled wait.  Production code uses
//! [`SystemClock`]; tests swap in a virtual clock whose `sleep` just moves
//! "now" forward, so hour-long holds finish instantly.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};

#[async_trait]
pub trait Clock: Send + Sync {
    /// Current wall-clock time in the local timezone.
    fn now(&self) -> NaiveDateTime;

    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Local wall clock + `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
