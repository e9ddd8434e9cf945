//! Review session state machine.
//!
//! Owns one [`ReviewContext`] and the surface it is displayed on. Each
//! action validates the context locally, issues at most one RPC request,
//! reports exactly one primary status message, and transitions state.
//! The surface close is a guarded `Open → Closing → Closed` transition,
//! so repeated or re-entrant triggers collapse to a single teardown.

// Rust guideline compliant 2026-02

use crate::rpc::{Request, ResponseEvent, RpcClient};

use super::context::ReviewContext;
use super::surface::{ReviewSurface, Severity};

/// Advisory shown when an apply-patch failure looks like the patch went
/// stale relative to the file on disk.
pub const STALE_PATCH_ADVISORY: &str =
    "patch no longer matches the current file content; regenerate the edit";

/// Lifecycle of one review surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// Diff displayed, actions available.
    Open,
    /// Teardown in progress; re-entrant triggers see this and back off.
    Closing,
    /// Terminal. The surface is gone.
    Closed,
}

/// A user verdict on the pending edit.
///
/// Interactive keystrokes and named command aliases both parse into this
/// enum and go through [`ReviewSession::dispatch`]: one implementation
/// per action, whichever way it was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// Apply the attached unified-diff patch.
    ApplyPatch,
    /// Apply the attached whole-file replacement.
    ApplyFull,
    /// Stage the file without closing the review.
    Stage,
    /// Restore the file from the index.
    Restore,
    /// Discard the proposal and close the surface.
    Reject,
}

impl ReviewAction {
    /// Parse a command alias or keystroke name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "a" | "apply" | "apply-patch" => Some(ReviewAction::ApplyPatch),
            "f" | "full" | "apply-full" => Some(ReviewAction::ApplyFull),
            "s" | "stage" => Some(ReviewAction::Stage),
            "r" | "restore" => Some(ReviewAction::Restore),
            "q" | "reject" | "close" | "quit" => Some(ReviewAction::Reject),
            _ => None,
        }
    }
}

/// One open review: context, surface, and the state between them.
#[derive(Debug)]
pub struct ReviewSession<S: ReviewSurface> {
    client: RpcClient,
    context: ReviewContext,
    surface: S,
    state: ReviewState,
}

impl<S: ReviewSurface> ReviewSession<S> {
    /// Open a review: preview the diff on the surface and return the
    /// session in [`ReviewState::Open`].
    pub fn open(
        client: RpcClient,
        context: ReviewContext,
        diff: &str,
        mut surface: S,
    ) -> Self {
        surface.preview(diff, &context);
        Self {
            client,
            context,
            surface,
            state: ReviewState::Open,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReviewState {
        self.state
    }

    /// The context bound to this review.
    pub fn context(&self) -> &ReviewContext {
        &self.context
    }

    /// The surface, for hosts that need to render through it.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Route an action to its single implementation.
    pub async fn dispatch(&mut self, action: ReviewAction) {
        match action {
            ReviewAction::ApplyPatch => self.apply_patch().await,
            ReviewAction::ApplyFull => self.apply_full().await,
            ReviewAction::Stage => self.stage().await,
            ReviewAction::Restore => self.restore().await,
            ReviewAction::Reject => self.reject(),
        }
    }

    /// Apply the attached patch. Success closes the review; failure
    /// reports and stays open, with the stale-patch advisory when the
    /// error text looks like a context conflict.
    pub async fn apply_patch(&mut self) {
        if !self.ready_for_request("apply-patch") {
            return;
        }
        let Some(patch) = self.context.patch.clone() else {
            self.surface
                .notify("apply-patch: no patch attached to this review", Severity::Error);
            return;
        };

        let request = Request::EditApply {
            root: self.context.root.clone(),
            file: self.context.file.clone(),
            patch,
            instruction: self.context.instruction.clone(),
            backup: true,
            stage: false,
        };
        let event = self.client.request(&request).await;

        if event.ok {
            self.surface
                .notify(&format!("applied {}", self.context.file), Severity::Info);
            self.close_surface();
        } else {
            self.surface.notify(&event.display_error(), Severity::Error);
            if is_stale_patch(&event) {
                self.surface.notify(STALE_PATCH_ADVISORY, Severity::Warn);
            }
        }
    }

    /// Apply the attached whole-file replacement. Success closes the
    /// review; failure reports and stays open.
    pub async fn apply_full(&mut self) {
        if !self.ready_for_request("apply-full") {
            return;
        }
        let Some(text) = self.context.full_replace.clone() else {
            self.surface.notify(
                "apply-full: no replacement attached to this review",
                Severity::Error,
            );
            return;
        };

        let request = Request::EditApplyFull {
            root: self.context.root.clone(),
            file: self.context.file.clone(),
            text,
            instruction: self.context.instruction.clone(),
            backup: true,
            stage: false,
        };
        let event = self.client.request(&request).await;

        if event.ok {
            self.surface
                .notify(&format!("replaced {}", self.context.file), Severity::Info);
            self.close_surface();
        } else {
            self.surface.notify(&event.display_error(), Severity::Error);
        }
    }

    /// Stage the file. Never closes the review, whichever way it goes.
    pub async fn stage(&mut self) {
        if !self.ready_for_request("stage") {
            return;
        }

        let request = Request::GitAdd {
            root: self.context.root.clone(),
            file: self.context.file.clone(),
        };
        let event = self.client.request(&request).await;

        if event.ok {
            self.surface
                .notify(&format!("staged {}", self.context.file), Severity::Info);
        } else {
            self.surface.notify(&event.display_error(), Severity::Error);
        }
    }

    /// Restore the file from the index. Success closes the review;
    /// failure reports and stays open.
    pub async fn restore(&mut self) {
        if !self.ready_for_request("restore") {
            return;
        }

        let request = Request::GitRestore {
            root: self.context.root.clone(),
            file: self.context.file.clone(),
        };
        let event = self.client.request(&request).await;

        if event.ok {
            self.surface
                .notify(&format!("restored {}", self.context.file), Severity::Info);
            self.close_surface();
        } else {
            self.surface.notify(&event.display_error(), Severity::Error);
        }
    }

    /// Discard the proposal. No request, always succeeds; a second
    /// invocation is a no-op.
    pub fn reject(&mut self) {
        if self.state != ReviewState::Open {
            return;
        }
        self.surface.notify("review closed", Severity::Info);
        self.close_surface();
    }

    /// Validate state and mandatory context fields before issuing a
    /// request. Missing fields report locally and block the action.
    fn ready_for_request(&mut self, action: &str) -> bool {
        if self.state != ReviewState::Open {
            log::debug!("[review] {action} ignored: session not open");
            return false;
        }
        if self.context.root.is_empty() {
            self.surface
                .notify(&format!("{action}: missing project root"), Severity::Error);
            return false;
        }
        if self.context.file.is_empty() {
            self.surface
                .notify(&format!("{action}: missing file"), Severity::Error);
            return false;
        }
        true
    }

    /// Tear the surface down exactly once.
    fn close_surface(&mut self) {
        if self.state != ReviewState::Open {
            return;
        }
        self.state = ReviewState::Closing;
        self.surface.close();
        self.state = ReviewState::Closed;
    }
}

/// Best-effort classifier for "the patch no longer fits the file".
///
/// The daemon reports `patch_apply_failed` with free-text details like
/// "Patch context mismatch" or "Patch delete mismatch"; there is no
/// structured subcode, so this stays a containment check over the code
/// and detail text.
fn is_stale_patch(event: &ResponseEvent) -> bool {
    let lower = |field: &Option<String>| {
        field.as_deref().unwrap_or("").to_ascii_lowercase()
    };
    let error = lower(&event.error);
    let detail = lower(&event.detail);
    error.contains("mismatch")
        || detail.contains("mismatch")
        || error.contains("context")
        || detail.contains("context")
}
