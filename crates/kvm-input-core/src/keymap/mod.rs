//! Key identifiers and lookup tables.
//!
//! The canonical key representation is the DOM `KeyboardEvent.code` string
//! (`"KeyA"`, `"ControlLeft"`, `"AltRight"` ...).  These name *physical key
//! positions*, not characters, so they survive any keyboard layout.  The
//! device accepts them verbatim and maps them to USB HID usages itself.

pub mod dom;
pub mod virtual_keys;

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use virtual_keys::VirtualKeyTable;

/// An opaque physical key identifier.
///
/// No structure is assumed beyond identity: two `KeyId`s are the same key
/// exactly when their strings are equal.  Serializes as a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(String);

impl KeyId {
    /// Wraps a key code string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the key code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for KeyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for KeyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for KeyId {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for KeyId {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl PartialEq<str> for KeyId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for KeyId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
