//! Wire message types.
//!
//! # Outbound
//!
//! ```json
//! {"k":["ControlLeft","KeyC"],"ts":1234.5}
//! {"ping":1718000000000}
//! ```
//!
//! `k` is the pressed-key list in press order; `ts` is fractional
//! milliseconds on the sender's monotonic clock.  `ping` carries wall-clock
//! Unix milliseconds, which the device echoes back as `pong`.
//!
//! # Inbound
//!
//! ```json
//! {"data":{"pong":1718000000000}}
//! {"data":{"keyboardStatus":{"onlineStatus":true,"CapsLockLed":false,"NumLockLed":true,"ScrollLockLed":false}}}
//! {"data":{"hidStatus":{"enable":true,"mouseMode":"absolute","passThrough":false}}}
//! ```
//!
//! Unknown fields (system info, video status, notifications) are ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keymap::KeyId;

/// Errors converting between wire text and message types.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("failed to encode outbound message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("malformed device message: {0}")]
    Decode(#[source] serde_json::Error),
}

// ── Outbound ──────────────────────────────────────────────────────────────────

/// The ordered set of held keys at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySnapshot {
    #[serde(rename = "k")]
    pub keys: Vec<KeyId>,
    #[serde(rename = "ts")]
    pub timestamp_ms: f64,
}

impl KeySnapshot {
    /// Builds a snapshot stamped at `at` on the producer's clock.
    pub fn new(keys: Vec<KeyId>, at: Duration) -> Self {
        Self {
            keys,
            timestamp_ms: at.as_nanos() as f64 / 1_000_000.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Keepalive probe.  The device echoes `ping` back as `data.pong`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ping {
    pub ping: u64,
}

/// Anything the client sends to the device.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Keys(KeySnapshot),
    Ping(Ping),
}

impl OutboundMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

impl From<KeySnapshot> for OutboundMessage {
    fn from(snapshot: KeySnapshot) -> Self {
        OutboundMessage::Keys(snapshot)
    }
}

impl From<Ping> for OutboundMessage {
    fn from(ping: Ping) -> Self {
        OutboundMessage::Ping(ping)
    }
}

// ── Inbound ───────────────────────────────────────────────────────────────────

/// Envelope of every device → client message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeviceMessage {
    #[serde(default)]
    pub data: DeviceData,
}

/// The optional sections of a device message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeviceData {
    /// Echo of a previous [`Ping::ping`].
    #[serde(default)]
    pub pong: Option<f64>,

    #[serde(default, rename = "keyboardStatus")]
    pub keyboard_status: Option<KeyboardStatus>,

    #[serde(default, rename = "hidStatus")]
    pub hid_status: Option<HidStatus>,

    /// Free-form alert text for the operator.
    #[serde(default)]
    pub alert: Option<serde_json::Value>,
}

impl DeviceData {
    /// Alert rendered as text; non-string alerts are rendered as JSON.
    pub fn alert_text(&self) -> Option<String> {
        match self.alert.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Remote keyboard endpoint state, including its lock LEDs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct KeyboardStatus {
    #[serde(default, rename = "onlineStatus")]
    pub online: bool,
    #[serde(default, rename = "CapsLockLed")]
    pub caps_lock: bool,
    #[serde(default, rename = "NumLockLed")]
    pub num_lock: bool,
    #[serde(default, rename = "ScrollLockLed")]
    pub scroll_lock: bool,
}

/// HID gadget state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HidStatus {
    #[serde(default)]
    pub enable: bool,
    #[serde(default, rename = "mouseMode")]
    pub mouse_mode: Option<String>,
    #[serde(default, rename = "passThrough")]
    pub pass_through: bool,
}

/// Parses one WebSocket text frame from the device.
///
/// # Errors
///
/// Returns [`ProtocolError::Decode`] when `text` is not a JSON object of the
/// expected shape.
pub fn decode_device_message(text: &str) -> Result<DeviceMessage, ProtocolError> {
    serde_json::from_str(text).map_err(ProtocolError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_wire_shape() {
        // Arrange
        let snapshot = KeySnapshot::new(
            vec![KeyId::from("ControlLeft"), KeyId::from("KeyC")],
            Duration::from_micros(1_500),
        );

        // Act
        let json = OutboundMessage::from(snapshot).to_json().unwrap();

        // Assert
        assert_eq!(json, r#"{"k":["ControlLeft","KeyC"],"ts":1.5}"#);
    }

    #[test]
    fn test_empty_snapshot_serializes_empty_list() {
        let snapshot = KeySnapshot::new(Vec::new(), Duration::from_millis(2));
        let json = OutboundMessage::Keys(snapshot).to_json().unwrap();
        assert_eq!(json, r#"{"k":[],"ts":2.0}"#);
    }

    #[test]
    fn test_ping_wire_shape() {
        let json = OutboundMessage::Ping(Ping { ping: 42 }).to_json().unwrap();
        assert_eq!(json, r#"{"ping":42}"#);
    }

    #[test]
    fn test_decode_pong() {
        let msg = decode_device_message(r#"{"data":{"pong":1718000000000}}"#).unwrap();
        assert_eq!(msg.data.pong, Some(1_718_000_000_000.0));
        assert!(msg.data.keyboard_status.is_none());
    }

    #[test]
    fn test_decode_keyboard_status_leds() {
        let msg = decode_device_message(
            r#"{"data":{"keyboardStatus":{"onlineStatus":true,"CapsLockLed":true,"NumLockLed":false,"ScrollLockLed":true}}}"#,
        )
        .unwrap();
        let status = msg.data.keyboard_status.unwrap();
        assert!(status.online);
        assert!(status.caps_lock);
        assert!(!status.num_lock);
        assert!(status.scroll_lock);
    }

    #[test]
    fn test_decode_hid_status() {
        let msg = decode_device_message(
            r#"{"data":{"hidStatus":{"enable":true,"mouseMode":"relative","passThrough":false,"jigglerInterval":0}}}"#,
        )
        .unwrap();
        let hid = msg.data.hid_status.unwrap();
        assert!(hid.enable);
        assert_eq!(hid.mouse_mode.as_deref(), Some("relative"));
    }

    #[test]
    fn test_decode_ignores_unrelated_sections() {
        let msg = decode_device_message(
            r#"{"data":{"systemInfo":{"cpuLoad":3},"videoStatus":{"isActive":true}}}"#,
        )
        .unwrap();
        assert_eq!(msg, DeviceMessage::default());
    }

    #[test]
    fn test_decode_message_without_data() {
        let msg = decode_device_message("{}").unwrap();
        assert_eq!(msg, DeviceMessage::default());
    }

    #[test]
    fn test_alert_text_rendering() {
        let msg = decode_device_message(r#"{"data":{"alert":"HID offline"}}"#).unwrap();
        assert_eq!(msg.data.alert_text().as_deref(), Some("HID offline"));

        let msg = decode_device_message(r#"{"data":{"alert":{"code":7}}}"#).unwrap();
        assert_eq!(msg.data.alert_text().as_deref(), Some(r#"{"code":7}"#));
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let err = decode_device_message("{not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }
}
