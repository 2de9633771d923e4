//! KeyboardSession: the single-task event loop around the translator.
//!
//! The translator is a synchronous state machine; it needs a driver that
//! feeds it events *and* wakes it when the AltGr deadline passes.  Both must
//! happen on the same queue, otherwise a timer callback could interleave
//! with a half-handled key event.  This module runs one `tokio::select!`
//! loop that multiplexes:
//!
//! - input events from an `mpsc` channel,
//! - the translator's pending deadline (`sleep_until`),
//! - the keepalive ping interval,
//! - an external shutdown signal.
//!
//! Snapshots emitted by the translator's observer are queued and flushed to
//! the [`KeyTransport`] after each step.  A failed send is logged and
//! counted; the translator's state stays authoritative either way.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kvm_input_core::{
    KeyEventTranslator, KeySnapshot, OutboundMessage, Ping, ProtocolError, TranslatorConfig,
    TranslatorStats,
};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::InputEvent;
use crate::infrastructure::clock::{epoch_millis, TokioClock};

// ── Error types ───────────────────────────────────────────────────────────────

/// Errors a transport can report for a single send.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection is gone; further sends will fail too.
    #[error("transport connection closed")]
    Closed,

    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("send failed: {0}")]
    Send(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Errors that end a session early.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("device connection closed during session {0}")]
    TransportClosed(Uuid),
}

// ── Transport seam ────────────────────────────────────────────────────────────

/// Delivers outbound messages to the device.
///
/// The production implementation is a WebSocket; tests record or mock it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyTransport: Send {
    async fn send(&mut self, message: OutboundMessage) -> Result<(), TransportError>;
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub events: u64,
    pub snapshots_sent: u64,
    pub pings_sent: u64,
    pub send_failures: u64,
    pub translator: TranslatorStats,
}

/// Owns a translator and a transport and runs them on one task.
pub struct KeyboardSession<T> {
    id: Uuid,
    translator: KeyEventTranslator,
    outbox: mpsc::UnboundedReceiver<KeySnapshot>,
    transport: T,
    origin: Instant,
    ping_interval: Duration,
    events: u64,
    snapshots_sent: u64,
    pings_sent: u64,
    send_failures: u64,
}

impl<T: KeyTransport> KeyboardSession<T> {
    /// Creates a session whose translator clock starts now.
    pub fn new(config: TranslatorConfig, transport: T, ping_interval: Duration) -> Self {
        let origin = Instant::now();
        let mut translator = KeyEventTranslator::new(config, Arc::new(TokioClock::new(origin)));

        // The receiver lives as long as the session, so the send cannot fail.
        let (tx, outbox) = mpsc::unbounded_channel();
        translator.subscribe(move |snapshot: &KeySnapshot| {
            let _ = tx.send(snapshot.clone());
        });

        Self {
            id: Uuid::new_v4(),
            translator,
            outbox,
            transport,
            origin,
            ping_interval,
            events: 0,
            snapshots_sent: 0,
            pings_sent: 0,
            send_failures: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn translator(&self) -> &KeyEventTranslator {
        &self.translator
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            events: self.events,
            snapshots_sent: self.snapshots_sent,
            pings_sent: self.pings_sent,
            send_failures: self.send_failures,
            translator: self.translator.stats(),
        }
    }

    /// Runs until the input channel closes or `shutdown` completes.
    ///
    /// Either way every held key is released and the final snapshot flushed
    /// before returning.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::TransportClosed`] if the transport reports the
    /// connection gone.
    pub async fn run<F>(
        &mut self,
        mut events: mpsc::Receiver<InputEvent>,
        shutdown: F,
    ) -> Result<SessionSummary, SessionError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut ping = time::interval_at(Instant::now() + self.ping_interval, self.ping_interval);
        ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(session = %self.id, platform = %self.translator.platform(), "keyboard session started");

        loop {
            let deadline = self.translator.pending_deadline().map(|d| self.origin + d);

            tokio::select! {
                // Input first, so a key already queued at the deadline still
                // pairs with the held Ctrl.  `apply` checks the deadline
                // against the clock before each event, which covers a
                // deadline that expired during a slow send.
                biased;

                event = events.recv() => match event {
                    Some(event) => self.apply(event),
                    None => {
                        info!(session = %self.id, "input closed; releasing all keys");
                        self.translator.release_all();
                        self.flush().await?;
                        break;
                    }
                },
                () = wait_until(deadline) => {
                    self.translator.fire_pending();
                }
                _ = ping.tick() => {
                    self.send_ping().await?;
                }
                () = &mut shutdown => {
                    info!(session = %self.id, "shutdown requested; releasing all keys");
                    self.translator.release_all();
                    self.flush().await?;
                    break;
                }
            }

            self.flush().await?;
        }

        let summary = self.summary();
        info!(
            session = %self.id,
            events = summary.events,
            snapshots = summary.snapshots_sent,
            failures = summary.send_failures,
            "keyboard session ended"
        );
        Ok(summary)
    }

    fn apply(&mut self, event: InputEvent) {
        self.events += 1;
        if self.translator.poll_timer() {
            debug!(session = %self.id, "AltGr window expired before the next event");
        }
        match event {
            InputEvent::KeyDown { code } => self.translator.on_key_down(&code),
            InputEvent::KeyUp { code } => self.translator.on_key_up(&code),
            InputEvent::VirtualPress { button } => self.translator.on_virtual_key_press(&button),
            InputEvent::VirtualRelease { button } => {
                self.translator.on_virtual_key_release(&button)
            }
            InputEvent::ReleaseAll => self.translator.release_all(),
            InputEvent::FocusLost => {
                debug!(session = %self.id, "focus lost");
                self.translator.release_all();
            }
        }
    }

    async fn flush(&mut self) -> Result<(), SessionError> {
        while let Ok(snapshot) = self.outbox.try_recv() {
            if self.deliver(OutboundMessage::Keys(snapshot)).await? {
                self.snapshots_sent += 1;
            }
        }
        Ok(())
    }

    async fn send_ping(&mut self) -> Result<(), SessionError> {
        let ping = Ping { ping: epoch_millis() };
        if self.deliver(OutboundMessage::Ping(ping)).await? {
            self.pings_sent += 1;
        }
        Ok(())
    }

    /// Sends one message.  `Ok(false)` means a non-fatal failure.
    async fn deliver(&mut self, message: OutboundMessage) -> Result<bool, SessionError> {
        match self.transport.send(message).await {
            Ok(()) => Ok(true),
            Err(TransportError::Closed) => {
                self.send_failures += 1;
                Err(SessionError::TransportClosed(self.id))
            }
            Err(e) => {
                self.send_failures += 1;
                warn!(session = %self.id, "failed to send to device: {e}");
                Ok(false)
            }
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
