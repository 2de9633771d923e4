//! Pure domain types for keyboard state.
//!
//! Nothing in here performs I/O or knows about time; the translator layers
//! timing and notification on top of these types.

pub mod platform;
pub mod pressed;

pub use platform::{PlatformParseError, TargetPlatform};
pub use pressed::PressedKeySet;
