//! KeyEventTranslator: raw key events → ordered pressed-key snapshots.
//!
//! The translator is the heart of the keyboard client.  It consumes physical
//! key-down/key-up events and on-screen keyboard button events, keeps the
//! [`PressedKeySet`], and synchronously hands a [`KeySnapshot`] to every
//! registered observer after each change.  Transport is the observer's job.
//!
//! # AltGr on Windows layouts
//!
//! Pressing AltGr on a Windows-style layout produces `ControlLeft` down
//! followed almost immediately by `AltRight` down.  Forwarding both would
//! inject a spurious Ctrl into every AltGr character on the remote machine;
//! dropping `ControlLeft` would break real Ctrl shortcuts.  So when the
//! workaround is active, a fresh `ControlLeft` down is held in a
//! [`PendingTimer`] for `altgr_delay` (50 ms by default):
//!
//! ```text
//! ControlLeft ↓ ──► pending ──┬── AltRight ↓ before deadline ─► drop Ctrl (AltGr)
//!                             ├── other key ↓ before deadline ─► press Ctrl, then key
//!                             ├── any key ↑ before deadline ───► press Ctrl, then release
//!                             └── deadline reached ────────────► press Ctrl
//! ```
//!
//! # Threading
//!
//! The translator is a plain `&mut self` state machine.  Drivers must deliver
//! input events and timer expiry on the same task, in order; there is no
//! internal locking.

pub mod clock;
pub mod timer;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::domain::{PressedKeySet, TargetPlatform};
use crate::keymap::dom::{ALT_RIGHT, CONTROL_LEFT};
use crate::keymap::{dom, KeyId, VirtualKeyTable};
use crate::protocol::messages::KeySnapshot;

use self::clock::Clock;
use self::timer::PendingTimer;

/// Window in which an `AltRight` down turns a held `ControlLeft` into AltGr.
pub const DEFAULT_ALTGR_DELAY: Duration = Duration::from_millis(50);

/// Construction-time settings.  Never re-read after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorConfig {
    pub platform: TargetPlatform,
    pub altgr_delay: Duration,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            platform: TargetPlatform::Other,
            altgr_delay: DEFAULT_ALTGR_DELAY,
        }
    }
}

impl TranslatorConfig {
    pub fn for_platform(platform: TargetPlatform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }
}

/// Receives a snapshot after every change to the pressed-key set.
pub trait KeysObserver: Send {
    fn keys_changed(&mut self, snapshot: &KeySnapshot);
}

impl<F> KeysObserver for F
where
    F: FnMut(&KeySnapshot) + Send,
{
    fn keys_changed(&mut self, snapshot: &KeySnapshot) {
        self(snapshot)
    }
}

/// Running counters, mostly useful for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslatorStats {
    /// Snapshots delivered (counted once per mutation, not per observer).
    pub notifications: u64,
    /// Releases of keys the translator was not tracking.
    pub untracked_releases: u64,
    /// Virtual keyboard labels with no key mapping.
    pub unknown_virtual_labels: u64,
    /// `ControlLeft` downs swallowed because `AltRight` followed.
    pub altgr_chords: u64,
    /// Held `ControlLeft` pressed when its deadline elapsed.
    pub ctrl_resolved_by_timeout: u64,
    /// Held `ControlLeft` pressed because another key went down.
    pub ctrl_resolved_by_key: u64,
    /// Held `ControlLeft` pressed because a key-up arrived first.
    pub ctrl_resolved_by_release: u64,
}

/// Where a release came from; only used for anomaly reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeySource {
    Physical,
    Virtual,
}

/// Translates key events into pressed-key snapshots.
pub struct KeyEventTranslator {
    pressed: PressedKeySet,
    pending: Option<PendingTimer>,
    config: TranslatorConfig,
    clock: Arc<dyn Clock>,
    virtual_keys: VirtualKeyTable,
    observers: Vec<Box<dyn KeysObserver>>,
    stats: TranslatorStats,
}

impl KeyEventTranslator {
    /// Creates a translator with an empty pressed set and the standard
    /// virtual keyboard table.
    pub fn new(config: TranslatorConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            pressed: PressedKeySet::new(),
            pending: None,
            config,
            clock,
            virtual_keys: VirtualKeyTable::standard(),
            observers: Vec::new(),
            stats: TranslatorStats::default(),
        }
    }

    /// Replaces the virtual keyboard lookup table.
    pub fn with_virtual_keys(mut self, table: VirtualKeyTable) -> Self {
        self.virtual_keys = table;
        self
    }

    /// Registers an observer.  Observers run in registration order.
    pub fn subscribe(&mut self, observer: impl KeysObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ── Physical keyboard ─────────────────────────────────────────────────────

    /// Handles a physical key-down.  Auto-repeat of a held key is a no-op.
    pub fn on_key_down(&mut self, code: &str) {
        if self.altgr_workaround()
            && code == CONTROL_LEFT
            && !self.pressed.contains(CONTROL_LEFT)
            && self.pending.is_none()
        {
            let now = self.clock.now();
            self.pending = Some(PendingTimer::start(
                KeyId::from(code),
                now,
                self.config.altgr_delay,
            ));
            debug!(
                "holding {CONTROL_LEFT} for {:?} pending AltGr disambiguation",
                self.config.altgr_delay
            );
            return;
        }

        if let Some(timer) = self.pending.take() {
            if code == ALT_RIGHT {
                self.stats.altgr_chords += 1;
                debug!("AltGr chord detected; {} not forwarded", timer.key());
            } else {
                self.stats.ctrl_resolved_by_key += 1;
                debug!("{code} followed {}; treating as a real Ctrl press", timer.key());
                self.press(timer.key().as_str());
            }
        }

        self.press(code);
    }

    /// Handles a physical key-up.
    ///
    /// Releasing a Meta key clears every held key: the OS swallows the
    /// key-ups of whatever was chorded with it.
    pub fn on_key_up(&mut self, code: &str) {
        // An undecided key must resolve to "pressed" before anything is
        // released, so the device sees a matching press/release pair.
        if let Some(timer) = self.pending.take() {
            self.stats.ctrl_resolved_by_release += 1;
            debug!("{code} released while {} pending; pressing it first", timer.key());
            self.press(timer.key().as_str());
        }

        let removed = self.pressed.remove(code);
        if !removed {
            self.record_untracked(code, KeySource::Physical);
        }

        if dom::is_meta(code) {
            let cleared = self.pressed.clear();
            if removed || cleared {
                debug!("{code} released; all keys released");
                self.notify();
            }
            return;
        }

        if removed {
            self.notify();
        }
    }

    // ── Virtual keyboard ──────────────────────────────────────────────────────

    /// Handles an on-screen keyboard button press.  No AltGr handling.
    pub fn on_virtual_key_press(&mut self, button: &str) {
        let Some(code) = self.resolve_virtual(button) else {
            return;
        };
        self.press(code.as_str());
    }

    /// Handles an on-screen keyboard button release.
    pub fn on_virtual_key_release(&mut self, button: &str) {
        let Some(code) = self.resolve_virtual(button) else {
            return;
        };
        if self.pressed.remove(code.as_str()) {
            self.notify();
        } else {
            self.record_untracked(code.as_str(), KeySource::Virtual);
        }
    }

    // ── Bulk release ──────────────────────────────────────────────────────────

    /// Releases every key, e.g. on focus loss or disconnect.
    ///
    /// A held `ControlLeft` is discarded rather than pressed.  Notifies only
    /// when something was actually held.
    pub fn release_all(&mut self) {
        if let Some(timer) = self.pending.take() {
            debug!("release-all discarded pending {}", timer.key());
        }
        if self.pressed.clear() {
            debug!("all keys released");
            self.notify();
        }
    }

    // ── Pending timer ─────────────────────────────────────────────────────────

    /// Clock time at which the pending `ControlLeft` resolves, if any.
    pub fn pending_deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(PendingTimer::deadline)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fires the pending timer if its deadline has passed.  Returns `true`
    /// when it fired.
    pub fn poll_timer(&mut self) -> bool {
        let now = self.clock.now();
        let due = self.pending.as_ref().is_some_and(|t| t.is_due(now));
        due && self.fire_pending()
    }

    /// Resolves the pending key as pressed right now, regardless of its
    /// deadline.  Returns `false` when nothing was pending.
    pub fn fire_pending(&mut self) -> bool {
        let Some(timer) = self.pending.take() else {
            return false;
        };
        self.stats.ctrl_resolved_by_timeout += 1;
        let waited = self.clock.now().saturating_sub(timer.started_at());
        debug!(?waited, "no AltGr partner for {}; pressing it", timer.key());
        let key = timer.into_key();
        self.press(key.as_str());
        true
    }

    /// Drops the pending timer without pressing its key.
    pub fn cancel_pending(&mut self) -> Option<KeyId> {
        self.pending.take().map(PendingTimer::into_key)
    }

    // ── Inspection ────────────────────────────────────────────────────────────

    pub fn pressed_keys(&self) -> &[KeyId] {
        self.pressed.as_slice()
    }

    pub fn is_pressed(&self, code: &str) -> bool {
        self.pressed.contains(code)
    }

    pub fn platform(&self) -> TargetPlatform {
        self.config.platform
    }

    pub fn altgr_workaround(&self) -> bool {
        self.config.platform.requires_altgr_workaround()
    }

    pub fn stats(&self) -> TranslatorStats {
        self.stats
    }

    /// The current pressed set stamped with the current clock time.
    pub fn snapshot(&self) -> KeySnapshot {
        KeySnapshot::new(self.pressed.to_vec(), self.clock.now())
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn press(&mut self, code: &str) -> bool {
        if self.pressed.insert(code) {
            trace!("pressed {code}");
            self.notify();
            true
        } else {
            false
        }
    }

    fn resolve_virtual(&mut self, button: &str) -> Option<KeyId> {
        let code = self.virtual_keys.resolve(button);
        if code.is_none() {
            self.stats.unknown_virtual_labels += 1;
            debug!("virtual keyboard label {button:?} has no key mapping; ignored");
        }
        code
    }

    fn record_untracked(&mut self, code: &str, source: KeySource) {
        self.stats.untracked_releases += 1;
        debug!(?source, "release of untracked key {code}; ignored");
    }

    fn notify(&mut self) {
        self.stats.notifications += 1;
        let snapshot = self.snapshot();
        for observer in self.observers.iter_mut() {
            observer.keys_changed(&snapshot);
        }
    }
}
