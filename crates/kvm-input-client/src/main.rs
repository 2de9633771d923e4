//! KVM-Over-IP keyboard input client, entry point.
//!
//! Reads key events as JSON lines on stdin, runs them through the key event
//! translator (including the Windows AltGr workaround), and streams the
//! resulting pressed-key snapshots to a KVM device over WebSocket.
//!
//! # Usage
//!
//! ```text
//! kvm-input-client [OPTIONS] < events.jsonl
//!
//! Options:
//!   --config <PATH>          TOML config file [default: kvm-input.toml]
//!   --host <HOST>            Device hostname or IP
//!   --port <PORT>            Device HTTP(S) port
//!   --secure                 Use wss:// instead of ws://
//!   --token <TOKEN>          Session token
//!   --target-os <OS>         windows | linux | macos | other
//!   --altgr-delay-ms <MS>    AltGr disambiguation window
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable           | Description                        |
//! |--------------------|------------------------------------|
//! | `KVM_INPUT_CONFIG` | Config file path                   |
//! | `KVM_TOKEN`        | Session token                      |
//! | `KVM_TARGET_OS`    | Target platform                    |
//! | `RUST_LOG`         | Log filter; wins over `log_level`  |
//!
//! Command-line values win over environment variables, which win over the
//! config file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kvm_input_client::application::KeyboardSession;
use kvm_input_client::domain::ClientConfig;
use kvm_input_client::infrastructure::config_store::{load_config, DEFAULT_CONFIG_FILE};
use kvm_input_client::infrastructure::input_source::{join_source, spawn_json_lines_source};
use kvm_input_client::infrastructure::ws_transport::WsTransport;

/// Buffered input events between the stdin reader and the session.
const INPUT_CHANNEL_CAPACITY: usize = 256;

/// How long to wait for the stdin reader after the session ends.  After
/// Ctrl+C it is still blocked on stdin and gets aborted.
const INPUT_GRACE: Duration = Duration::from_millis(200);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// KVM-Over-IP keyboard input client.
///
/// Every option is optional; unset options fall back to the config file and
/// then to built-in defaults.
#[derive(Debug, Parser)]
#[command(
    name = "kvm-input-client",
    about = "Streams keyboard state to a KVM-over-IP device",
    version
)]
struct Cli {
    /// Path of the TOML config file.  A missing file means defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, env = "KVM_INPUT_CONFIG")]
    config: PathBuf,

    /// Device hostname or IP address.
    #[arg(long)]
    host: Option<String>,

    /// Device port.
    #[arg(long)]
    port: Option<u16>,

    /// Connect with `wss://`.
    #[arg(long)]
    secure: bool,

    /// Session token appended to the WebSocket URL.
    #[arg(long, env = "KVM_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Platform the operator's keyboard follows.  Only `windows` enables
    /// the AltGr workaround.
    #[arg(long, env = "KVM_TARGET_OS")]
    target_os: Option<String>,

    /// How long a lone Left Ctrl waits for a Right Alt, in milliseconds.
    #[arg(long)]
    altgr_delay_ms: Option<u64>,
}

impl Cli {
    /// Layers the command-line values over `config`.
    fn apply_overrides(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(host) = &self.host {
            config.device.host = host.clone();
        }
        if let Some(port) = self.port {
            config.device.port = port;
        }
        if self.secure {
            config.device.secure = true;
        }
        if let Some(token) = &self.token {
            config.device.token = Some(token.clone());
        }
        if let Some(os) = &self.target_os {
            config.keyboard.target_os = os.clone();
        }
        if let Some(ms) = self.altgr_delay_ms {
            config.keyboard.altgr_delay_ms = ms;
        }
        config
    }

    /// Loads the config file, applies overrides, and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the merged
    /// configuration is invalid.
    fn into_config(self) -> anyhow::Result<ClientConfig> {
        let file = load_config(&self.config)
            .with_context(|| format!("failed to load {}", self.config.display()))?;
        let config = self.apply_overrides(file);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. Parse CLI arguments and build the merged [`ClientConfig`].
/// 2. Initialise `tracing`; `RUST_LOG` wins, else the config's `log_level`.
/// 3. Connect to the device's WebSocket.
/// 4. Start the stdin reader and run the [`KeyboardSession`] until stdin
///    closes or Ctrl+C is pressed.  Either way all keys are released.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.session.log_level)),
        )
        .init();

    let translator_config = config.translator_config()?;
    info!(
        platform = %translator_config.platform,
        altgr_delay_ms = config.keyboard.altgr_delay_ms,
        "KVM-Over-IP keyboard client starting"
    );

    let transport = WsTransport::connect(&config.device_url())
        .await
        .context("could not reach the KVM device")?;
    let monitor = transport.monitor();

    let (events, reader) = spawn_json_lines_source(tokio::io::stdin(), INPUT_CHANNEL_CAPACITY);

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C; initiating graceful shutdown"),
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    let mut session = KeyboardSession::new(translator_config, transport, config.ping_interval());
    let outcome = session.run(events, shutdown).await;

    let input = join_source(reader, INPUT_GRACE).await;
    if let Some(latency) = monitor.lock().await.latency_ms() {
        info!(latency_ms = latency, "last measured device latency");
    }
    session.into_transport().close().await;

    let summary = outcome?;
    if let Some(stats) = input.context("reading key events from stdin failed")? {
        info!(
            events = stats.events,
            malformed = stats.malformed,
            "input source finished"
        );
    }
    if summary.send_failures > 0 {
        warn!(failures = summary.send_failures, "some updates did not reach the device");
    }
    info!(
        untracked_releases = summary.translator.untracked_releases,
        altgr_chords = summary.translator.altgr_chords,
        "KVM-Over-IP keyboard client stopped"
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["kvm-input-client"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_cli_without_overrides_keeps_file_values() {
        // Arrange
        let mut file = ClientConfig::default();
        file.device.host = "10.1.1.1".to_string();
        let cli = Cli {
            config: PathBuf::from("unused.toml"),
            host: None,
            port: None,
            secure: false,
            token: None,
            target_os: None,
            altgr_delay_ms: None,
        };

        // Act
        let merged = cli.apply_overrides(file.clone());

        // Assert
        assert_eq!(merged, file);
    }

    #[test]
    fn test_cli_host_and_port_override() {
        let cli = cli(&["--host", "kvm.lan", "--port", "8443", "--secure"]);
        let merged = cli.apply_overrides(ClientConfig::default());
        assert_eq!(merged.device_url().split('?').next(), Some("wss://kvm.lan:8443/wss"));
    }

    #[test]
    fn test_cli_keyboard_overrides() {
        let cli = cli(&["--target-os", "windows", "--altgr-delay-ms", "80"]);
        let merged = cli.apply_overrides(ClientConfig::default());
        assert_eq!(merged.keyboard.target_os, "windows");
        assert_eq!(merged.keyboard.altgr_delay_ms, 80);
    }

    #[test]
    fn test_cli_token_override() {
        let cli = cli(&["--token", "abc"]);
        let merged = cli.apply_overrides(ClientConfig::default());
        assert_eq!(merged.device.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_into_config_rejects_invalid_delay() {
        let missing = std::env::temp_dir().join("kvm-input-client-no-such-config.toml");
        let cli = Cli {
            config: missing,
            host: None,
            port: None,
            secure: false,
            token: None,
            target_os: Some("windows".to_string()),
            altgr_delay_ms: Some(0),
        };

        assert!(cli.into_config().is_err());
    }

    #[test]
    fn test_into_config_with_missing_file_uses_defaults() {
        let missing = std::env::temp_dir().join("kvm-input-client-no-such-config.toml");
        let cli = Cli {
            config: missing,
            host: None,
            port: None,
            secure: false,
            token: None,
            target_os: Some("linux".to_string()),
            altgr_delay_ms: None,
        };

        let config = cli.into_config().unwrap();

        assert_eq!(config.device.port, 80);
        assert_eq!(config.keyboard.target_os, "linux");
    }
}
