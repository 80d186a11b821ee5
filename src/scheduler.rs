//! Periodic task pacing.
//!
//! Each task wakes on a fixed period using "delay-until" semantics: the
//! next deadline is the previous deadline plus one period, so work time
//! does not accumulate as drift.
//!
//! ```text
//!   deadline   deadline   deadline        (overrun)     deadline
//!      │◀─period─▶│◀─period─▶│◀──────── late ────────▶│◀─period─▶│
//!      ▼          ▼          ▼                        ▼          ▼
//!  ────┼──work────┼──work────┼──work──────────────────┼──work────┼──▶ t
//!                                          resync to now ┘
//! ```
//!
//! When a whole period has been missed the schedule resyncs to the
//! current time instead of firing a burst of catch-up cycles.

use core::time::Duration;

use log::debug;

// ═══════════════════════════════════════════════════════════════
//  Ticker
// ═══════════════════════════════════════════════════════════════

/// Deadline tracker for one periodic task.
#[derive(Debug, Clone)]
pub struct Ticker {
    period_ms: u64,
    /// Absolute time of the next wake-up.
    deadline_ms: u64,
    /// Number of resyncs after a missed period.
    overruns: u32,
}

impl Ticker {
    /// First deadline is one period after `now_ms`.
    pub fn new(period_ms: u32, now_ms: u64) -> Self {
        let period_ms = u64::from(period_ms.max(1));
        Self {
            period_ms,
            deadline_ms: now_ms + period_ms,
            overruns: 0,
        }
    }

    /// How long to sleep until the pending deadline.  Advances the
    /// deadline by one period.
    pub fn next_wait(&mut self, now_ms: u64) -> u64 {
        if now_ms >= self.deadline_ms + self.period_ms {
            self.overruns = self.overruns.saturating_add(1);
            debug!(
                "ticker overrun: {} ms late, resyncing",
                now_ms - self.deadline_ms
            );
            self.deadline_ms = now_ms;
        }
        let wait = self.deadline_ms.saturating_sub(now_ms);
        self.deadline_ms += self.period_ms;
        wait
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn overruns(&self) -> u32 {
        self.overruns
    }
}

/// Block the calling thread.  On ESP-IDF this yields to FreeRTOS.
pub fn sleep_ms(ms: u64) {
    if ms > 0 {
        std::thread::sleep(Duration::from_millis(ms));
    }
}
