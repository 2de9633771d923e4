//! Loading [`ClientConfig`] from a TOML file.
//!
//! The file is optional: a missing file yields the defaults so the client
//! runs out of the box against a device on `127.0.0.1:80`.  Any other I/O
//! failure, or a file that is present but malformed, is an error.

use std::path::Path;

use tracing::{debug, info};

use crate::domain::config::{ClientConfig, ConfigError};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "kvm-input.toml";

/// Reads and parses the config at `path`.
///
/// # Errors
///
/// - [`ConfigError::Io`] if the file exists but cannot be read.
/// - [`ConfigError::Parse`] if it is not valid TOML for [`ClientConfig`].
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let config = parse_config(&text)?;
            info!("loaded config from {}", path.display());
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no config at {}; using defaults", path.display());
            Ok(ClientConfig::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parses config text without touching the file system.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] on malformed TOML.
pub fn parse_config(text: &str) -> Result<ClientConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}
