//! Translator clock driven by `tokio::time`.
//!
//! Using Tokio's `Instant` rather than `std::time::Instant` means a test
//! runtime started with `start_paused = true` controls both the session's
//! `sleep_until` and the translator's notion of "now".  The two can never
//! disagree about whether the AltGr deadline has passed.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use kvm_input_core::Clock;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new(origin: Instant) -> Self {
        Self { origin }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        Instant::now().saturating_duration_since(self.origin)
    }
}

/// Unix time in milliseconds; the clock the device echoes pings against.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
