//! JSON messages exchanged with the KVM device over its WebSocket.
//!
//! Outbound traffic is tiny: a pressed-key snapshot after every change and a
//! keepalive ping.  Inbound traffic is a status envelope whose fields are all
//! optional; only the parts relevant to the keyboard client are decoded.

pub mod messages;

pub use messages::{
    decode_device_message, DeviceData, DeviceMessage, HidStatus, KeySnapshot, KeyboardStatus,
    OutboundMessage, Ping, ProtocolError,
};
