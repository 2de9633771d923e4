//! Application layer for kvm-input-client.
//!
//! # Responsibilities
//!
//! - Driving the key event translator from one event loop, so input events
//!   and the AltGr timer are handled on the same queue
//! - Delivering snapshots and keepalive pings through a [`KeyTransport`]
//! - Tracking device status (latency, lock LEDs, HID state)
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or reading stdin (that is infrastructure)
//! - JSON framing details (that is `kvm_input_core::protocol`)

pub mod device_monitor;
pub mod session;

pub use device_monitor::DeviceMonitor;
pub use session::{KeyTransport, KeyboardSession, SessionError, SessionSummary, TransportError};
