//! Line-delimited JSON RPC over the daemon's Unix domain socket.
//!
//! One connection per request: the client connects, writes a single JSON
//! line, reads until a newline-terminated JSON line (or end-of-stream)
//! arrives, and delivers exactly one [`ResponseEvent`]. There is no
//! multiplexing and no retry: a failed exchange is reported as a
//! synthesized failure event and the caller decides what to do.
//!
//! # Architecture
//!
//! ```text
//! Caller task (trusted context)          Reactor task
//! ┌──────────────────────────┐          ┌──────────────────────────┐
//! │ client.request(&req)     │          │ exchange()               │
//! │   └── await oneshot ◄────┼──────────┼── Completion::finish()   │
//! │                          │ hand-off │   connect / write / read │
//! └──────────────────────────┘          └──────────────────────────┘
//! ```
//!
//! The exchange runs on the tokio reactor; its single completion event
//! crosses back to the caller through a `oneshot` channel, so no side
//! effect ever runs on the I/O task itself.
//!
//! # Wire protocol
//!
//! - Request: one JSON object with a `cmd` discriminator, `\n`-terminated.
//! - Response: one JSON object with `type:"result"`, `ok:bool`, and on
//!   failure `error` (machine code) plus optional `detail` (human text).
//!
//! See [`request`] for the command table and [`response`] for the
//! envelope fields.

pub mod client;
pub mod request;
pub mod response;

pub use client::RpcClient;
pub use request::Request;
pub use response::ResponseEvent;

// Error codes synthesized locally by the transport. The daemon never
// produces these; everything it reports arrives verbatim in the event.

/// The endpoint cannot be represented as a Unix socket address.
pub const ERR_RPC_PIPE_FAILED: &str = "rpc_pipe_failed";
/// Connecting to the daemon socket failed.
pub const ERR_CONNECT_FAILED: &str = "connect_failed";
/// Writing the request line failed.
pub const ERR_WRITE_FAILED: &str = "write_failed";
/// Reading the response failed mid-stream.
pub const ERR_READ_FAILED: &str = "read_failed";
/// The peer closed the stream before sending any response bytes.
pub const ERR_EOF: &str = "eof";
/// The response line did not parse as a JSON object.
pub const ERR_BAD_JSON: &str = "bad_json";
