//! Per-review context data.

use crate::rpc::ResponseEvent;

/// The data bound to one review surface.
///
/// Created when a diff is first previewed and read-only afterwards; the
/// session consults it to validate and build requests. A context without
/// a `patch` cannot apply-patch, one without `full_replace` cannot
/// apply-full; the actions check before issuing anything.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewContext {
    /// Project root the daemon operates in.
    pub root: String,
    /// Target file, relative to `root`.
    pub file: String,
    /// Hunks-only unified diff proposed by the daemon.
    pub patch: Option<String>,
    /// Whole-file replacement proposed by the daemon.
    pub full_replace: Option<String>,
    /// Instruction the proposal was generated for.
    pub instruction: String,
}

impl ReviewContext {
    /// Create a context with no proposal payloads attached.
    pub fn new(
        root: impl Into<String>,
        file: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            file: file.into(),
            patch: None,
            full_replace: None,
            instruction: instruction.into(),
        }
    }

    /// Attach a patch proposal.
    pub fn with_patch(mut self, patch: impl Into<String>) -> Self {
        self.patch = Some(patch.into());
        self
    }

    /// Attach a full-replacement proposal.
    pub fn with_full_replace(mut self, text: impl Into<String>) -> Self {
        self.full_replace = Some(text.into());
        self
    }

    /// Build the context (and the diff to preview) from a successful
    /// `edit` response.
    ///
    /// Returns `None` when the event carries nothing previewable (no
    /// diff and no patch). The daemon's display diff is preferred; a
    /// hunks-only patch doubles as the preview when it is all we got.
    pub fn from_edit_response(
        root: impl Into<String>,
        instruction: impl Into<String>,
        event: &ResponseEvent,
    ) -> Option<(String, Self)> {
        if !event.ok {
            return None;
        }
        let file = event.file.clone()?;
        let diff = event
            .diff
            .clone()
            .or_else(|| event.patch.clone())?;

        let context = Self {
            root: root.into(),
            file,
            patch: event.patch.clone(),
            full_replace: event.full_replace.clone(),
            instruction: instruction.into(),
        };
        Some((diff, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edit_response_prefers_display_diff() {
        let event: ResponseEvent = serde_json::from_str(
            r#"{"type":"result","ok":true,"file":"a.py","patch":"@@ hunks","diff":"--- a/a.py\n+++ b/a.py\n@@ hunks"}"#,
        )
        .unwrap();

        let (diff, context) =
            ReviewContext::from_edit_response("/r", "fix it", &event).unwrap();
        assert!(diff.starts_with("--- a/a.py"));
        assert_eq!(context.file, "a.py");
        assert_eq!(context.patch.as_deref(), Some("@@ hunks"));
        assert!(context.full_replace.is_none());
        assert_eq!(context.instruction, "fix it");
    }

    #[test]
    fn test_from_edit_response_falls_back_to_patch() {
        let event: ResponseEvent = serde_json::from_str(
            r#"{"type":"result","ok":true,"file":"a.py","patch":"@@ hunks"}"#,
        )
        .unwrap();

        let (diff, _) =
            ReviewContext::from_edit_response("/r", "fix", &event).unwrap();
        assert_eq!(diff, "@@ hunks");
    }

    #[test]
    fn test_from_edit_response_rejects_failures_and_empty() {
        let failed: ResponseEvent =
            serde_json::from_str(r#"{"type":"result","ok":false,"error":"x"}"#)
                .unwrap();
        assert!(ReviewContext::from_edit_response("/r", "i", &failed).is_none());

        let empty: ResponseEvent =
            serde_json::from_str(r#"{"type":"result","ok":true,"file":"a.py"}"#)
                .unwrap();
        assert!(ReviewContext::from_edit_response("/r", "i", &empty).is_none());
    }
}
