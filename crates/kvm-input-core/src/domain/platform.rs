//! Target platform setting.
//!
//! The operator's browser or OS determines how AltGr is reported.  On
//! Windows-style layouts a single AltGr press arrives as `ControlLeft` down
//! immediately followed by `AltRight` down, so the translator has to hold
//! `ControlLeft` back briefly to tell the two apart.  Every other platform
//! reports AltGr as `AltRight` alone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a platform name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown target platform: {0:?} (expected windows, linux, macos or other)")]
pub struct PlatformParseError(pub String);

/// Platform whose keyboard event conventions the translator must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    Windows,
    Linux,
    #[serde(rename = "macos")]
    MacOs,
    #[default]
    Other,
}

impl TargetPlatform {
    /// Whether the AltGr (`ControlLeft` + `AltRight`) workaround applies.
    pub fn requires_altgr_workaround(self) -> bool {
        matches!(self, TargetPlatform::Windows)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetPlatform::Windows => "windows",
            TargetPlatform::Linux => "linux",
            TargetPlatform::MacOs => "macos",
            TargetPlatform::Other => "other",
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windows" | "win" | "win32" | "win64" => Ok(TargetPlatform::Windows),
            "linux" | "x11" | "wayland" => Ok(TargetPlatform::Linux),
            "macos" | "mac" | "macintosh" | "darwin" | "osx" => Ok(TargetPlatform::MacOs),
            "other" | "unknown" => Ok(TargetPlatform::Other),
            _ => Err(PlatformParseError(s.to_string())),
        }
    }
}
