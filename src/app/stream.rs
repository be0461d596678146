// sls-logs - app/stream.rs
//
// Log streaming: one external log command per selected function, each
// relayed line by line to the printing thread.
//
// Architecture:
//   - `StreamManager` lives on the main thread; every session runs on its own
//     background thread, which spawns two reader threads (stdout, stderr).
//   - All sessions share one mpsc channel of `StreamEvent`s. The main thread
//     is the only writer to the terminal, so lines never tear.
//   - A session sends `Exited` exactly once, as soon as the process has
//     exited and its pipes have drained. If a background grandchild keeps the
//     pipes open past `PIPE_DRAIN_GRACE`, the summary is sent anyway and the
//     grandchild's later lines are still relayed after it.
//   - Sessions are independent: a slow, failing or unspawnable command never
//     delays another one. There is no timeout, retry or cancellation.
//   - The channel closes once every session thread has dropped its sender,
//     which is how the main loop knows all sessions finished.

use crate::core::command::{LogCommandConfig, ShellInvocation};
use crate::core::model::{FunctionName, SessionExit, StreamEvent, StreamKind, StreamOptions};
use crate::core::relay::LineSplitter;
use crate::util::constants::{DEBUG_MAX_LINE_PREVIEW, PIPE_DRAIN_GRACE, READ_CHUNK_SIZE};
use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;

// =============================================================================
// StreamManager
// =============================================================================

/// Runs a set of log sessions on background threads.
pub struct StreamManager {
    /// Channel receiver the main thread drains.
    progress_rx: Option<mpsc::Receiver<StreamEvent>>,
    /// Number of sessions started.
    session_count: usize,
}

impl StreamManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            session_count: 0,
        }
    }

    /// Start one session per name, in order, using the configured command.
    ///
    /// Returns immediately; events arrive through [`StreamManager::recv`].
    pub fn start(&mut self, names: &[FunctionName], command: &LogCommandConfig, options: &StreamOptions) {
        let sessions = names
            .iter()
            .map(|name| (name.clone(), command.invocation(name, options)))
            .collect();
        self.start_invocations(sessions);
    }

    /// Start one session per `(name, invocation)` pair.
    pub fn start_invocations(&mut self, sessions: Vec<(FunctionName, ShellInvocation)>) {
        let (tx, rx) = mpsc::channel();
        self.progress_rx = Some(rx);
        self.session_count = sessions.len();

        for (name, invocation) in sessions {
            let tx = tx.clone();
            tracing::debug!(name = %name, command = %invocation.command_line, "Starting log session");
            std::thread::spawn(move || run_session(name, invocation, tx));
        }
        // Only session threads hold senders now.
        drop(tx);

        tracing::info!(sessions = self.session_count, "Log streaming started");
    }

    /// Number of sessions started by the last `start` call.
    pub fn session_count(&self) -> usize {
        self.session_count
    }

    /// Block until the next event. Returns `None` once every session has
    /// finished (or if nothing was started).
    pub fn recv(&self) -> Option<StreamEvent> {
        self.progress_rx.as_ref()?.recv().ok()
    }
}

impl Default for StreamManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Per-session background work
// =============================================================================

fn run_session(name: FunctionName, invocation: ShellInvocation, tx: mpsc::Sender<StreamEvent>) {
    let spawned = Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(name = %name, program = %invocation.program, error = %e, "Failed to spawn log command");
            let _ = tx.send(StreamEvent::Failed {
                name,
                message: format!("failed to start '{}': {e}", invocation.command_line),
            });
            return;
        }
    };

    tracing::info!(name = %name, pid = child.id(), "Log session spawned");
    let _ = tx.send(StreamEvent::Started {
        name: name.clone(),
        command: invocation.command_line.clone(),
    });

    // Each reader holds a `drained` sender until it returns; the channel
    // disconnects once both pipes are done.
    let (drained_tx, drained_rx) = mpsc::channel::<()>();
    let readers: Vec<JoinHandle<()>> = [
        child.stdout.take().map(|pipe| {
            spawn_reader(name.clone(), StreamKind::Stdout, pipe, tx.clone(), drained_tx.clone())
        }),
        child.stderr.take().map(|pipe| {
            spawn_reader(name.clone(), StreamKind::Stderr, pipe, tx.clone(), drained_tx.clone())
        }),
    ]
    .into_iter()
    .flatten()
    .collect();
    drop(drained_tx);

    let waited = child.wait();

    if let Err(RecvTimeoutError::Timeout) = drained_rx.recv_timeout(PIPE_DRAIN_GRACE) {
        tracing::debug!(
            name = %name,
            readers = readers.len(),
            "Pipes still open after exit (background process?); reporting exit now"
        );
    }

    let event = match waited {
        Ok(status) => {
            let status = session_exit(status);
            tracing::info!(name = %name, %status, "Log session exited");
            StreamEvent::Exited { name, status }
        }
        Err(e) => {
            tracing::warn!(name = %name, error = %e, "Failed to wait for log command");
            StreamEvent::Failed {
                name,
                message: format!("lost track of the log command: {e}"),
            }
        }
    };
    let _ = tx.send(event);
}

fn spawn_reader<R>(
    name: FunctionName,
    stream: StreamKind,
    pipe: R,
    tx: mpsc::Sender<StreamEvent>,
    drained: mpsc::Sender<()>,
) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    std::thread::spawn(move || {
        relay_pipe(&name, stream, pipe, &tx);
        drop(drained);
    })
}

/// Read `pipe` to end-of-stream and send one `Line` event per complete line.
///
/// Stops early (without error) if the receiving side has gone away.
pub fn relay_pipe<R: Read>(name: &str, stream: StreamKind, mut pipe: R, tx: &mpsc::Sender<StreamEvent>) {
    let mut splitter = LineSplitter::default();
    let mut buf = vec![0u8; READ_CHUNK_SIZE];

    let send = |text: String| {
        tracing::trace!(name, ?stream, line = %preview(&text), "Relaying line");
        tx.send(StreamEvent::Line {
            name: name.to_string(),
            stream,
            text,
        })
        .is_ok()
    };

    loop {
        match pipe.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                for line in splitter.push(&buf[..n]) {
                    if !send(line) {
                        return;
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(name, ?stream, error = %e, "Pipe read failed; stopping relay");
                break;
            }
        }
    }

    if let Some(rest) = splitter.finish() {
        send(rest);
    }
}

/// Truncate a line for diagnostic output.
fn preview(text: &str) -> &str {
    match text.char_indices().nth(DEBUG_MAX_LINE_PREVIEW) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Map a platform exit status to a `SessionExit`.
pub fn session_exit(status: ExitStatus) -> SessionExit {
    if let Some(code) = status.code() {
        return SessionExit::Code(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return SessionExit::Signal(signal);
        }
    }
    SessionExit::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn lines(rx: &mpsc::Receiver<StreamEvent>) -> Vec<(StreamKind, String)> {
        rx.try_iter()
            .filter_map(|e| match e {
                StreamEvent::Line { stream, text, .. } => Some((stream, text)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_relay_pipe_splits_lines_and_flushes_rest() {
        let (tx, rx) = mpsc::channel();
        relay_pipe("fn", StreamKind::Stdout, Cursor::new(b"one\ntwo\nthree".to_vec()), &tx);
        assert_eq!(
            lines(&rx),
            vec![
                (StreamKind::Stdout, "one".to_string()),
                (StreamKind::Stdout, "two".to_string()),
                (StreamKind::Stdout, "three".to_string()),
            ]
        );
    }

    #[test]
    fn test_relay_pipe_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        // Must return rather than loop or panic.
        relay_pipe("fn", StreamKind::Stderr, Cursor::new(b"a\nb\n".to_vec()), &tx);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(DEBUG_MAX_LINE_PREVIEW + 10);
        assert_eq!(preview(&long).chars().count(), DEBUG_MAX_LINE_PREVIEW);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_spawn_failure_reports_failed_once() {
        let mut manager = StreamManager::new();
        manager.start_invocations(vec![(
            "ghost".to_string(),
            ShellInvocation {
                program: "/nonexistent/sls-logs-shell".to_string(),
                args: Vec::new(),
                command_line: "nothing".to_string(),
            },
        )]);
        let events: Vec<StreamEvent> = std::iter::from_fn(|| manager.recv()).collect();
        assert_eq!(events.len(), 1, "{events:?}");
        assert!(matches!(events[0], StreamEvent::Failed { ref name, .. } if name == "ghost"));
    }

    #[test]
    fn test_recv_without_sessions_is_none() {
        let manager = StreamManager::new();
        assert!(manager.recv().is_none());
    }
}
