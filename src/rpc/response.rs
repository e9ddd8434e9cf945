//! Response envelope for the daemon protocol.

use serde::{Deserialize, Serialize};

fn default_event_type() -> String {
    "result".to_string()
}

/// The single completion event of one request.
///
/// Either passed through verbatim from the daemon or synthesized locally
/// by the transport for connection-level failures. Payload fields are
/// command-specific; absent fields deserialize to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEvent {
    /// Event discriminator; `"result"` is the only tag the daemon emits.
    #[serde(rename = "type", default = "default_event_type")]
    pub event_type: String,

    /// Whether the request succeeded.
    #[serde(default)]
    pub ok: bool,

    /// Machine-readable error code on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human-readable failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Chat answer text (`chat`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    /// Plan steps (`plan`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,

    /// Proposed shell commands (`shell`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<String>>,

    /// Subset of `commands` rejected by the daemon's safety list (`shell`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked: Option<Vec<String>>,

    /// File the event refers to (`edit`, `edit_apply`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Display-ready unified diff with file headers (`edit`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,

    /// Hunks-only patch suitable for `edit_apply` (`edit`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,

    /// Whole-file replacement when the daemon fell back to a full
    /// rewrite; suitable for `edit_apply_full` (`edit`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_replace: Option<String>,

    /// The target file was written (`edit_apply`, `edit_apply_full`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub written: Option<bool>,

    /// The target file was staged after writing (`edit_apply`,
    /// `edit_apply_full`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staged: Option<bool>,

    /// Porcelain status lines (`git_status`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub porcelain: Option<Vec<String>>,

    /// Whether `root` is inside a git work tree (`git_status`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inside_git: Option<bool>,
}

impl ResponseEvent {
    /// A bare failure event with a machine code and no detail.
    pub fn local_failure(error: &str) -> Self {
        Self {
            event_type: default_event_type(),
            ok: false,
            error: Some(error.to_string()),
            detail: None,
            answer: None,
            steps: None,
            commands: None,
            blocked: None,
            file: None,
            diff: None,
            patch: None,
            full_replace: None,
            written: None,
            staged: None,
            porcelain: None,
            inside_git: None,
        }
    }

    /// A failure event carrying a human-readable detail string.
    pub fn local_failure_detail(error: &str, detail: impl Into<String>) -> Self {
        let mut event = Self::local_failure(error);
        event.detail = Some(detail.into());
        event
    }

    /// Render the failure as `<error>` or `<error>: <detail>`.
    ///
    /// Falls back to `"unknown_error"` when the peer reported `ok=false`
    /// without a code.
    pub fn display_error(&self) -> String {
        let code = self.error.as_deref().unwrap_or("unknown_error");
        match self.detail.as_deref() {
            Some(detail) if !detail.is_empty() => format!("{code}: {detail}"),
            _ => code.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_success_decodes() {
        let event: ResponseEvent =
            serde_json::from_str(r#"{"type":"result","ok":true}"#).unwrap();
        assert!(event.ok);
        assert_eq!(event.event_type, "result");
        assert!(event.error.is_none());
    }

    #[test]
    fn test_missing_type_and_ok_default() {
        let event: ResponseEvent = serde_json::from_str("{}").unwrap();
        assert_eq!(event.event_type, "result");
        assert!(!event.ok);
    }

    #[test]
    fn test_payload_fields_pass_through() {
        let event: ResponseEvent = serde_json::from_str(
            r#"{"type":"result","ok":true,"file":"a.py","patch":"@@","diff":"--- a\n","full_replace":"x"}"#,
        )
        .unwrap();
        assert_eq!(event.file.as_deref(), Some("a.py"));
        assert_eq!(event.patch.as_deref(), Some("@@"));
        assert_eq!(event.full_replace.as_deref(), Some("x"));
    }

    #[test]
    fn test_display_error_with_detail() {
        let event: ResponseEvent = serde_json::from_str(
            r#"{"type":"result","ok":false,"error":"mismatch","detail":"hunk 1"}"#,
        )
        .unwrap();
        assert_eq!(event.display_error(), "mismatch: hunk 1");
    }

    #[test]
    fn test_display_error_without_detail() {
        let event = ResponseEvent::local_failure("eof");
        assert_eq!(event.display_error(), "eof");
    }

    #[test]
    fn test_display_error_without_code() {
        let event: ResponseEvent =
            serde_json::from_str(r#"{"type":"result","ok":false}"#).unwrap();
        assert_eq!(event.display_error(), "unknown_error");
    }

    #[test]
    fn test_git_status_payload() {
        let event: ResponseEvent = serde_json::from_str(
            r#"{"type":"result","ok":true,"inside_git":true,"porcelain":[" M a.py","?? b.py"]}"#,
        )
        .unwrap();
        assert_eq!(event.inside_git, Some(true));
        assert_eq!(event.porcelain.as_ref().map(Vec::len), Some(2));
    }
}
