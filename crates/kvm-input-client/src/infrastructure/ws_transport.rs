//! WebSocket transport to the KVM device.
//!
//! The device exposes one WebSocket at `ws[s]://host:port/wss`.  After the
//! handshake the stream is split:
//!
//! - the **sink** half stays with [`WsTransport`] and carries key snapshots
//!   and pings as JSON text frames;
//! - the **stream** half moves into a reader task that decodes the device's
//!   status envelopes into a shared [`DeviceMonitor`].
//!
//! Only the sink is on the keyboard session's path, so a slow or chatty
//! device never delays key delivery.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, Stream, StreamExt};
use kvm_input_core::protocol::decode_device_message;
use kvm_input_core::OutboundMessage;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::application::{DeviceMonitor, KeyTransport, TransportError};
use crate::infrastructure::clock::epoch_millis;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct WsTransport {
    sink: SplitSink<WsStream, WsMessage>,
    monitor: Arc<Mutex<DeviceMonitor>>,
    closed: Arc<AtomicBool>,
    reader: JoinHandle<()>,
}

impl WsTransport {
    /// Opens the WebSocket and starts the reader task.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] if the TCP connection or the
    /// WebSocket handshake fails.
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        if url.starts_with("wss:") {
            install_tls_provider();
        }
        let (stream, response) = connect_async(url)
            .await
            .map_err(|e| TransportError::Connect(format!("{}: {e}", redact_token(url))))?;
        info!(
            status = %response.status(),
            "connected to device at {}",
            redact_token(url)
        );

        let (sink, source) = stream.split();
        let monitor = Arc::new(Mutex::new(DeviceMonitor::new()));
        let closed = Arc::new(AtomicBool::new(false));

        let reader = tokio::spawn(read_device_messages(
            source,
            Arc::clone(&monitor),
            Arc::clone(&closed),
        ));

        Ok(Self {
            sink,
            monitor,
            closed,
            reader,
        })
    }

    /// Shared view of what the device has reported so far.
    pub fn monitor(&self) -> Arc<Mutex<DeviceMonitor>> {
        Arc::clone(&self.monitor)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    /// Sends a Close frame and stops the reader task.
    pub async fn close(mut self) {
        if let Err(e) = self.sink.close().await {
            debug!("error while closing device socket: {e}");
        }
        self.closed.store(true, Ordering::Relaxed);
        self.reader.abort();
    }
}

#[async_trait]
impl KeyTransport for WsTransport {
    async fn send(&mut self, message: OutboundMessage) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        let json = message.to_json()?;
        self.sink.send(WsMessage::Text(json)).await.map_err(|e| {
            let err = map_ws_error(e);
            if matches!(err, TransportError::Closed) {
                self.closed.store(true, Ordering::Relaxed);
            }
            err
        })
    }
}

fn map_ws_error(e: WsError) -> TransportError {
    match e {
        WsError::ConnectionClosed | WsError::AlreadyClosed => TransportError::Closed,
        WsError::Io(io)
            if matches!(
                io.kind(),
                std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::ConnectionReset
            ) =>
        {
            TransportError::Closed
        }
        other => TransportError::Send(other.to_string()),
    }
}

/// Drains device frames into `monitor` until the stream ends.
///
/// Sets `closed` on exit so the next send fails fast instead of writing
/// into a dead socket.
pub async fn read_device_messages<S>(
    mut source: S,
    monitor: Arc<Mutex<DeviceMonitor>>,
    closed: Arc<AtomicBool>,
) where
    S: Stream<Item = Result<WsMessage, WsError>> + Unpin,
{
    while let Some(frame) = source.next().await {
        let text = match frame {
            Ok(WsMessage::Text(text)) => text,
            Ok(WsMessage::Close(_)) => {
                debug!("device sent Close frame");
                break;
            }
            Ok(WsMessage::Binary(_)) => {
                warn!("unexpected binary frame from device (ignored)");
                continue;
            }
            Ok(_) => continue,
            Err(WsError::ConnectionClosed | WsError::Protocol(_)) => {
                debug!("device socket closed");
                break;
            }
            Err(e) => {
                warn!("device socket error: {e}");
                break;
            }
        };

        match decode_device_message(&text) {
            Ok(message) => monitor.lock().await.observe(&message, epoch_millis()),
            Err(e) => warn!("undecodable device message: {e}"),
        }
    }

    closed.store(true, Ordering::Relaxed);
    info!("device connection closed");
}

/// Makes ring the process-wide rustls provider.  A provider installed
/// earlier stays in place.
fn install_tls_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Hides the session token when a URL is logged.
fn redact_token(url: &str) -> String {
    match url.split_once("token=") {
        Some((head, _)) => format!("{head}token=***"),
        None => url.to_string(),
    }
}
