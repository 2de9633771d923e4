//! Infrastructure layer for kvm-input-client.
//!
//! Everything that touches the outside world lives here:
//!
//! - [`clock`] – the translator clock backed by Tokio's (pausable) time
//! - [`config_store`] – reading the TOML config file
//! - [`input_source`] – JSON-lines input events from stdin or any reader
//! - [`ws_transport`] – the WebSocket connection to the KVM device

pub mod clock;
pub mod config_store;
pub mod input_source;
pub mod ws_transport;
