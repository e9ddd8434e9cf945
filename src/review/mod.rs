//! Edit review workflow.
//!
//! One review = one proposed edit displayed on a [`ReviewSurface`] with a
//! [`ReviewContext`] attached. The [`ReviewSession`] sequences the user's
//! verdict: apply the patch, apply the full replacement, stage the file,
//! restore it, or reject the proposal. Every action issues at most one
//! RPC request and transitions the session state exactly once.
//!
//! ```text
//!            apply-patch ok / apply-full ok / restore ok / reject
//!   Open ──────────────────────────────────────────────────────► Closed
//!    │ ▲
//!    └─┘ stage (success or failure), any failed apply/restore
//! ```

pub mod context;
pub mod session;
pub mod surface;

pub use context::ReviewContext;
pub use session::{ReviewAction, ReviewSession, ReviewState};
pub use surface::{ReviewSurface, Severity};
