//! # kvm-input-core
//!
//! Shared library for the KVM-Over-IP keyboard client containing the key
//! event translator, the pressed-key model, the virtual keyboard lookup
//! table, and the JSON messages exchanged with the KVM device.
//!
//! It has zero dependencies on OS APIs, async runtimes, or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! A KVM-over-IP device plugs into a remote computer as a USB keyboard and
//! mouse.  The operator's machine captures local key presses and tells the
//! device, many times per second, *which keys are currently held down*.  The
//! device replays that set on its USB HID endpoint.
//!
//! This crate (`kvm-input-core`) turns raw key-down/key-up events into that
//! "currently held" set.  It defines:
//!
//! - **`keymap`** – Key identifiers (DOM `KeyboardEvent.code` strings such as
//!   `"ControlLeft"` or `"KeyA"`), the catalogue of codes the device knows,
//!   and the table that maps on-screen keyboard button labels to codes.
//!
//! - **`domain`** – The ordered, duplicate-free [`PressedKeySet`] and the
//!   target platform setting that switches the AltGr workaround on or off.
//!
//! - **`translator`** – The [`KeyEventTranslator`] state machine, its
//!   pending AltGr timer, the clock abstraction used for deadlines and
//!   timestamps, and the observer contract.
//!
//! - **`protocol`** – The JSON payloads sent to and received from the device.

pub mod domain;
pub mod keymap;
pub mod protocol;
pub mod translator;

// Re-export the most-used types at the crate root so callers can write
// `kvm_input_core::KeyEventTranslator` instead of the full module path.
pub use domain::platform::{PlatformParseError, TargetPlatform};
pub use domain::pressed::PressedKeySet;
pub use keymap::{KeyId, VirtualKeyTable};
pub use protocol::messages::{DeviceMessage, KeySnapshot, OutboundMessage, Ping, ProtocolError};
pub use translator::clock::{Clock, ManualClock};
pub use translator::{KeyEventTranslator, KeysObserver, TranslatorConfig, TranslatorStats};
