//! One-shot request/response exchange over the daemon socket.
//!
//! Each [`RpcClient::request`] call owns one connection for its whole
//! lifetime: connect, write one line, read one line, done. Connections
//! share nothing with each other, so concurrent requests (for example
//! two open reviews) cannot interfere.
//!
//! Completion is idempotent by construction: the [`Completion`] wrapper
//! holds the `oneshot` sender in an `Option` and `finish()` takes it,
//! so whichever path completes first wins and later calls are no-ops.
//! Every exit path of [`exchange`] calls `finish()`, which gives the
//! at-least-once half of the exactly-once guarantee.

// Rust guideline compliant 2026-02

use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::sync::oneshot;

use super::request::Request;
use super::response::ResponseEvent;
use super::{
    ERR_BAD_JSON, ERR_CONNECT_FAILED, ERR_EOF, ERR_READ_FAILED,
    ERR_RPC_PIPE_FAILED, ERR_WRITE_FAILED,
};

/// Maximum byte length of a Unix socket path (`sun_path` limit on macOS).
const MAX_SOCK_PATH: usize = 104;

/// Read chunk size for response accumulation.
const READ_CHUNK: usize = 4096;

/// Client for the daemon's line-delimited JSON protocol.
///
/// Holds only the endpoint path; cheap to clone, no open resources
/// between requests.
#[derive(Debug, Clone)]
pub struct RpcClient {
    socket_path: PathBuf,
}

impl RpcClient {
    /// Create a client for the daemon socket at `socket_path`.
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    /// The endpoint this client talks to.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Issue one request and await its single completion event.
    ///
    /// Never returns an `Err`: transport and protocol failures arrive as
    /// synthesized `ok=false` events with the codes documented in
    /// [`crate::rpc`]. The exchange itself runs on the reactor; the
    /// event crosses back to this task through a `oneshot`, so the
    /// caller's context is the only place the result is ever observed.
    ///
    /// There is no timeout: a peer that accepts the connection but never
    /// writes a newline-terminated line (and never closes) hangs the
    /// request indefinitely.
    pub async fn request(&self, request: &Request) -> ResponseEvent {
        let (tx, rx) = oneshot::channel();
        let path = self.socket_path.clone();
        let line = request.to_line();
        let cmd = request.cmd();

        tokio::spawn(exchange(path, line, cmd, Completion { tx: Some(tx) }));

        // A dropped sender means the exchange task died without calling
        // finish() (task panic). Surface it as the stream having ended so
        // the at-least-once property holds even then.
        rx.await
            .unwrap_or_else(|_| ResponseEvent::local_failure(ERR_EOF))
    }
}

/// Single-use completion hand-off for one connection.
struct Completion {
    tx: Option<oneshot::Sender<ResponseEvent>>,
}

impl Completion {
    /// Deliver the event if no event has been delivered yet.
    ///
    /// The receiver may already be gone (caller dropped the future);
    /// that only means nobody is listening, and is ignored.
    fn finish(&mut self, event: ResponseEvent) {
        match self.tx.take() {
            Some(tx) => {
                let _ = tx.send(event);
            }
            None => log::debug!("[rpc] duplicate completion suppressed"),
        }
    }

    fn is_done(&self) -> bool {
        self.tx.is_none()
    }
}

/// Run one request/response exchange to completion.
///
/// Linear, not a retryable state machine: each step either advances or
/// finishes the connection with a synthesized failure. Exactly one
/// `finish()` fires on every path.
async fn exchange(
    path: PathBuf,
    line: Vec<u8>,
    cmd: &'static str,
    mut completion: Completion,
) {
    // An endpoint that cannot be represented as a socket address fails
    // before any syscall; the "pipe" was never allocated.
    if !representable_socket_path(&path) {
        log::warn!(
            "[rpc] {cmd}: endpoint not usable as a socket path: {}",
            path.display()
        );
        completion.finish(ResponseEvent::local_failure(ERR_RPC_PIPE_FAILED));
        return;
    }

    let mut stream = match UnixStream::connect(&path).await {
        Ok(stream) => stream,
        Err(e) => {
            log::debug!("[rpc] {cmd}: connect {} failed: {e}", path.display());
            completion.finish(ResponseEvent::local_failure_detail(
                ERR_CONNECT_FAILED,
                e.to_string(),
            ));
            return;
        }
    };

    if let Err(e) = stream.write_all(&line).await {
        log::debug!("[rpc] {cmd}: write failed: {e}");
        completion.finish(ResponseEvent::local_failure_detail(
            ERR_WRITE_FAILED,
            e.to_string(),
        ));
        let _ = stream.shutdown().await;
        return;
    }

    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    while !completion.is_done() {
        match stream.read(&mut chunk).await {
            Ok(0) => {
                // End-of-stream. A non-empty buffer is a response whose
                // trailing newline never arrived; try it anyway.
                let event = if buf.is_empty() {
                    ResponseEvent::local_failure(ERR_EOF)
                } else {
                    decode_response(&buf)
                };
                completion.finish(event);
            }
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                    // One response per connection: anything past the
                    // first newline is discarded.
                    completion.finish(decode_response(&buf[..pos]));
                }
            }
            Err(e) => {
                log::debug!("[rpc] {cmd}: read failed: {e}");
                completion.finish(ResponseEvent::local_failure_detail(
                    ERR_READ_FAILED,
                    e.to_string(),
                ));
            }
        }
    }

    // Single teardown point; shutdown failures are swallowed.
    let _ = stream.shutdown().await;
}

/// Whether `path` fits in a `sockaddr_un`.
fn representable_socket_path(path: &Path) -> bool {
    let bytes = path.as_os_str().as_bytes();
    !bytes.is_empty() && bytes.len() <= MAX_SOCK_PATH
}

/// Decode one response line into a [`ResponseEvent`].
///
/// Anything that is not a JSON object with protocol-shaped fields is a
/// `bad_json` failure, never a panic.
fn decode_response(bytes: &[u8]) -> ResponseEvent {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("[rpc] response decode failed: {e}");
            return ResponseEvent::local_failure(ERR_BAD_JSON);
        }
    };
    if !value.is_object() {
        return ResponseEvent::local_failure(ERR_BAD_JSON);
    }
    serde_json::from_value(value).unwrap_or_else(|e| {
        log::debug!("[rpc] response envelope mismatch: {e}");
        ResponseEvent::local_failure(ERR_BAD_JSON)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_result() {
        let event = decode_response(br#"{"type":"result","ok":true}"#);
        assert!(event.ok);
        assert!(event.error.is_none());
    }

    #[test]
    fn test_decode_garbage_is_bad_json() {
        let event = decode_response(b"{nope");
        assert!(!event.ok);
        assert_eq!(event.error.as_deref(), Some(ERR_BAD_JSON));
    }

    #[test]
    fn test_decode_non_object_is_bad_json() {
        let event = decode_response(b"42");
        assert!(!event.ok);
        assert_eq!(event.error.as_deref(), Some(ERR_BAD_JSON));
    }

    #[test]
    fn test_decode_tolerates_trailing_carriage_return() {
        let event = decode_response(b"{\"type\":\"result\",\"ok\":true}\r");
        assert!(event.ok);
    }

    #[test]
    fn test_socket_path_limits() {
        assert!(representable_socket_path(Path::new("/tmp/sg.sock")));
        assert!(!representable_socket_path(Path::new("")));
        let long = format!("/tmp/{}.sock", "x".repeat(200));
        assert!(!representable_socket_path(Path::new(&long)));
    }

    #[test]
    fn test_completion_second_finish_is_noop() {
        let (tx, mut rx) = oneshot::channel();
        let mut completion = Completion { tx: Some(tx) };
        completion.finish(ResponseEvent::local_failure(ERR_EOF));
        assert!(completion.is_done());
        completion.finish(ResponseEvent::local_failure(ERR_BAD_JSON));

        let event = rx.try_recv().expect("first event delivered");
        assert_eq!(event.error.as_deref(), Some(ERR_EOF));
    }
}
