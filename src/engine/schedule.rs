//! # engine::schedule
//!
//! Wall-clock scheduling for the two waits of a gap trade: until the session
//! opens (plus an offset), and until the hold period after entry is over.
//!
//! Waiting is coarse polling — look at the clock, sleep at most one poll
//! interval, repeat — so precision is bounded by the interval.

use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::clock::Clock;

/// Next occurrence of `open_time` strictly after `now`, shifted by
/// `offset_secs`.
///
/// If today's occurrence is still ahead it is used, otherwise tomorrow's.
/// The session is assumed to open daily in the local timezone; weekends and
/// holidays are not known here.
pub fn next_open_at(now: NaiveDateTime, open_time: NaiveTime, offset_secs: u64) -> NaiveDateTime {
    let today = now.date().and_time(open_time);
    let open = if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    };
    after(open, offset_secs)
}

/// `start + secs`, saturating instead of panicking on absurd inputs.
pub fn after(start: NaiveDateTime, secs: u64) -> NaiveDateTime {
    start
        .checked_add_signed(seconds(secs))
        .unwrap_or(NaiveDateTime::MAX)
}

fn seconds(secs: u64) -> chrono::Duration {
    chrono::Duration::try_seconds(secs.min(i64::MAX as u64 / 1000) as i64)
        .unwrap_or(chrono::Duration::MAX)
}

/// Block until `clock.now() >= target`, sleeping at most `poll` per step.
///
/// Returns immediately when the target is already in the past.
pub async fn wait_until(clock: &dyn Clock, target: NaiveDateTime, poll: Duration) {
    loop {
        let now = clock.now();
        if now >= target {
            return;
        }
        let remaining = (target - now).to_std().unwrap_or(Duration::ZERO);
        let step = remaining.min(poll);
        debug!(%now, %target, ?remaining, "⏳ Waiting");
        clock.sleep(step).await;
    }
}
