//! Tracks what the device reports back over the WebSocket.
//!
//! The device answers each ping with `data.pong` (the echoed send time) and
//! piggybacks keyboard LED and HID gadget state onto the same envelope.  The
//! monitor keeps the latest values and logs only transitions, so a device
//! that repeats its status every second does not flood the log.

use kvm_input_core::protocol::{DeviceMessage, HidStatus, KeyboardStatus};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct DeviceMonitor {
    latency_ms: Option<u64>,
    keyboard: Option<KeyboardStatus>,
    hid: Option<HidStatus>,
    alerts: u64,
}

impl DeviceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one decoded device message.  `now_ms` is the current Unix
    /// time in milliseconds, the same clock the ping carried.
    pub fn observe(&mut self, message: &DeviceMessage, now_ms: u64) {
        let data = &message.data;

        if let Some(pong) = data.pong {
            // Round trip halved; a pong from the future (clock skew) reads as 0.
            let half = ((now_ms as f64 - pong) / 2.0).max(0.0).ceil();
            let latency = half as u64;
            debug!(latency_ms = latency, "pong received");
            self.latency_ms = Some(latency);
        }

        if let Some(status) = data.keyboard_status {
            if self.keyboard != Some(status) {
                info!(
                    online = status.online,
                    caps_lock = status.caps_lock,
                    num_lock = status.num_lock,
                    scroll_lock = status.scroll_lock,
                    "remote keyboard status changed"
                );
                self.keyboard = Some(status);
            }
        }

        if let Some(hid) = &data.hid_status {
            if self.hid.as_ref() != Some(hid) {
                info!(
                    enable = hid.enable,
                    mouse_mode = hid.mouse_mode.as_deref().unwrap_or("-"),
                    pass_through = hid.pass_through,
                    "HID status changed"
                );
                self.hid = Some(hid.clone());
            }
        }

        if let Some(alert) = data.alert_text() {
            self.alerts += 1;
            warn!(alert = %alert, "device alert");
        }
    }

    /// Half the last measured round trip, in milliseconds.
    pub fn latency_ms(&self) -> Option<u64> {
        self.latency_ms
    }

    pub fn keyboard_status(&self) -> Option<KeyboardStatus> {
        self.keyboard
    }

    pub fn hid_status(&self) -> Option<&HidStatus> {
        self.hid.as_ref()
    }

    pub fn alerts(&self) -> u64 {
        self.alerts
    }
}
