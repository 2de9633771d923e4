//! Client configuration schema.
//!
//! [`ClientConfig`] is the single source of truth for runtime settings.  It is
//! read from a TOML file (see `infrastructure::config_store`), then
//! overridden field by field from the command line.  Example file:
//!
//! ```toml
//! [device]
//! host = "192.168.1.50"
//! port = 80
//! secure = false
//! token = "..."
//!
//! [keyboard]
//! target_os = "windows"
//! altgr_delay_ms = 50
//!
//! [session]
//! ping_interval_secs = 5
//! log_level = "info"
//! ```
//!
//! Every field has a serde default so a partial (or absent) file works.

use std::path::PathBuf;
use std::time::Duration;

use kvm_input_core::{PlatformParseError, TargetPlatform, TranslatorConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for the AltGr window; anything longer makes lone Ctrl
/// presses feel laggy.
pub const MAX_ALTGR_DELAY_MS: u64 = 1_000;

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("device port must be non-zero")]
    InvalidPort,

    #[error("device host must not be empty")]
    EmptyHost,

    #[error(transparent)]
    Platform(#[from] PlatformParseError),

    #[error("altgr_delay_ms must be between 1 and 1000, got {0}")]
    AltGrDelay(u64),

    #[error("ping_interval_secs must be non-zero")]
    ZeroPingInterval,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Where the device's WebSocket lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Use `wss://` instead of `ws://`.
    #[serde(default)]
    pub secure: bool,
    /// Session token appended as `?token=`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Translator settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyboardConfig {
    /// Platform whose key conventions the operator's keyboard follows:
    /// `"windows"`, `"linux"`, `"macos"` or `"other"`.
    #[serde(default = "default_target_os")]
    pub target_os: String,
    #[serde(default = "default_altgr_delay_ms")]
    pub altgr_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    80
}
fn default_target_os() -> String {
    "other".to_string()
}
fn default_altgr_delay_ms() -> u64 {
    50
}
fn default_ping_interval_secs() -> u64 {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            secure: false,
            token: None,
        }
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            target_os: default_target_os(),
            altgr_delay_ms: default_altgr_delay_ms(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ping_interval_secs: default_ping_interval_secs(),
            log_level: default_log_level(),
        }
    }
}

// ── Derived settings ──────────────────────────────────────────────────────────

impl ClientConfig {
    /// Checks every field that has constraints beyond its type.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.device.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        self.platform()?;
        let delay = self.keyboard.altgr_delay_ms;
        if delay == 0 || delay > MAX_ALTGR_DELAY_MS {
            return Err(ConfigError::AltGrDelay(delay));
        }
        if self.session.ping_interval_secs == 0 {
            return Err(ConfigError::ZeroPingInterval);
        }
        Ok(())
    }

    /// WebSocket URL of the device: `ws[s]://host:port/wss[?token=...]`.
    pub fn device_url(&self) -> String {
        let scheme = if self.device.secure { "wss" } else { "ws" };
        let base = format!("{scheme}://{}:{}/wss", self.device.host, self.device.port);
        match &self.device.token {
            Some(token) => format!("{base}?token={token}"),
            None => base,
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Platform`] if `target_os` is not recognised.
    pub fn platform(&self) -> Result<TargetPlatform, ConfigError> {
        Ok(self.keyboard.target_os.parse()?)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Platform`] if `target_os` is not recognised.
    pub fn translator_config(&self) -> Result<TranslatorConfig, ConfigError> {
        Ok(TranslatorConfig {
            platform: self.platform()?,
            altgr_delay: Duration::from_millis(self.keyboard.altgr_delay_ms),
        })
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.session.ping_interval_secs)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
