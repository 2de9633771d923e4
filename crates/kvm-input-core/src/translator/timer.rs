//! The single deferred AltGr resolution.

use std::time::Duration;

use crate::keymap::KeyId;

/// A key-down held back until its meaning is known.
///
/// At most one exists at a time and only while the AltGr workaround is
/// active.  It carries the deferred key and its deadline on the
/// translator's clock; dropping it is cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    key: KeyId,
    started_at: Duration,
    deadline: Duration,
}

impl PendingTimer {
    pub fn start(key: KeyId, now: Duration, delay: Duration) -> Self {
        Self {
            key,
            started_at: now,
            deadline: now.saturating_add(delay),
        }
    }

    pub fn key(&self) -> &KeyId {
        &self.key
    }

    pub fn into_key(self) -> KeyId {
        self.key
    }

    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn is_due(&self, now: Duration) -> bool {
        now >= self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_is_start_plus_delay() {
        let timer = PendingTimer::start(
            KeyId::from("ControlLeft"),
            Duration::from_millis(100),
            Duration::from_millis(50),
        );
        assert_eq!(timer.deadline(), Duration::from_millis(150));
        assert_eq!(timer.started_at(), Duration::from_millis(100));
    }

    #[test]
    fn test_is_due_at_and_after_deadline() {
        let timer = PendingTimer::start(
            KeyId::from("ControlLeft"),
            Duration::ZERO,
            Duration::from_millis(50),
        );
        assert!(!timer.is_due(Duration::from_millis(49)));
        assert!(timer.is_due(Duration::from_millis(50)));
        assert!(timer.is_due(Duration::from_millis(51)));
    }
}
