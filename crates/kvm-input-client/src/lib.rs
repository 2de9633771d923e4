//! kvm-input-client library crate.
//!
//! Streams the operator's keyboard state to a KVM-over-IP device.  Key events
//! come in as JSON lines, go through a single [`KeyEventTranslator`], and
//! every resulting pressed-key snapshot goes out over the device WebSocket.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! stdin (JSON lines: key_down / key_up / virtual_press / ...)
//!         ↓
//! [kvm-input-client]
//!   ├── domain/           ClientConfig, InputEvent (pure types)
//!   ├── application/      KeyboardSession (single-task event loop),
//!   │                     DeviceMonitor (device status bookkeeping)
//!   └── infrastructure/
//!         ├── input_source/ JSON-lines reader (tokio)
//!         ├── ws_transport/ WebSocket to the device (tokio-tungstenite)
//!         ├── config_store/ TOML config file loading
//!         └── clock/        tokio-time backed Clock
//!         ↓
//! KVM device  ({"k":[...],"ts":...} over WebSocket)
//! ```
//!
//! [`KeyEventTranslator`]: kvm_input_core::KeyEventTranslator

/// Domain layer: configuration and input event types (no I/O).
pub mod domain;

/// Application layer: the session event loop and device status tracking.
pub mod application;

/// Infrastructure layer: stdin reader, WebSocket transport, config file.
pub mod infrastructure;
