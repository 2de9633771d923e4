//! Domain layer for kvm-input-client.
//!
//! Pure types with no I/O: the configuration schema and the input events the
//! session consumes.

pub mod config;
pub mod events;

pub use config::{ClientConfig, ConfigError};
pub use events::InputEvent;
