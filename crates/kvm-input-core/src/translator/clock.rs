//! Time source for AltGr deadlines and snapshot timestamps.
//!
//! The translator never sleeps.  It reads "now" from a [`Clock`] when it
//! arms the pending timer and when it stamps a snapshot; whoever drives the
//! translator decides when to call [`KeyEventTranslator::poll_timer`].
//! Tests use [`ManualClock`] to step virtual time deterministically; the
//! async client supplies a clock backed by its runtime's timer.
//!
//! [`KeyEventTranslator::poll_timer`]: super::KeyEventTranslator::poll_timer

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Monotonic time elapsed since an arbitrary, fixed origin.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves virtual time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(duration_to_nanos(by), Ordering::SeqCst);
    }

    /// Jumps virtual time to `to`.
    pub fn set(&self, to: Duration) {
        self.nanos.store(duration_to_nanos(to), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

fn duration_to_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_starts_at_zero() {
        assert_eq!(ManualClock::new().now(), Duration::ZERO);
    }

    #[test]
    fn test_manual_clock_advance_accumulates() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_millis(30));
        clock.advance(Duration::from_millis(25));
        assert_eq!(clock.now(), Duration::from_millis(55));
    }

    #[test]
    fn test_manual_clock_set_overrides() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(3));
        clock.set(Duration::from_millis(7));
        assert_eq!(clock.now(), Duration::from_millis(7));
    }
}
