//! JSON-lines input events.
//!
//! Each non-blank line is one [`InputEvent`] object.  Lines starting with
//! `#` are comments so recorded sessions can be annotated.  A malformed line
//! is logged and skipped; it never ends the stream.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::domain::InputEvent;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid input event: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("input task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// What a reader saw before its input ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    pub events: u64,
    pub skipped: u64,
    pub malformed: u64,
}

/// Parses one line; `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns [`InputError::Json`] if the line is not a valid event object.
pub fn parse_event(line: &str) -> Result<Option<InputEvent>, InputError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

/// Reads events from `reader` into `tx` until EOF or the receiver is gone.
///
/// # Errors
///
/// Returns [`InputError::Io`] if the underlying reader fails.
pub async fn read_json_lines<R>(
    reader: R,
    tx: mpsc::Sender<InputEvent>,
) -> Result<LineStats, InputError>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut stats = LineStats::default();
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        match parse_event(&line) {
            Ok(Some(event)) => {
                stats.events += 1;
                if tx.send(event).await.is_err() {
                    debug!("session stopped accepting input at line {line_no}");
                    break;
                }
            }
            Ok(None) => stats.skipped += 1,
            Err(e) => {
                stats.malformed += 1;
                warn!("line {line_no}: {e}");
            }
        }
    }

    Ok(stats)
}

/// Spawns a task that feeds `reader` into a fresh channel.
///
/// Dropping the returned receiver stops the task at its next event.  When
/// the reader hits EOF or fails, the sender is dropped and the session sees
/// end of input either way; a read failure is logged here and returned
/// through the handle (see [`join_source`]).
pub fn spawn_json_lines_source<R>(
    reader: R,
    capacity: usize,
) -> (mpsc::Receiver<InputEvent>, JoinHandle<Result<LineStats, InputError>>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity);
    let handle = tokio::spawn(async move {
        let stats = read_json_lines(reader, tx).await.map_err(|e| {
            error!("input source stopped: {e}");
            e
        })?;
        debug!(
            events = stats.events,
            skipped = stats.skipped,
            malformed = stats.malformed,
            "input source finished"
        );
        Ok(stats)
    });
    (rx, handle)
}

/// Collects the outcome of a source task once its session has ended.
///
/// A source that is still blocked after `grace` (stdin with nothing to
/// read, say) is aborted and reported as `Ok(None)`.
///
/// # Errors
///
/// Returns the read error the source stopped on, or [`InputError::Task`]
/// if the task panicked.
pub async fn join_source(
    mut handle: JoinHandle<Result<LineStats, InputError>>,
    grace: Duration,
) -> Result<Option<LineStats>, InputError> {
    match tokio::time::timeout(grace, &mut handle).await {
        Ok(joined) => Ok(Some(joined??)),
        Err(_) => {
            handle.abort();
            Ok(None)
        }
    }
}
