//! Request types for the daemon protocol.
//!
//! Each variant serializes to a JSON object whose `cmd` field is the
//! snake_case variant name, matching the daemon's dispatch table.

use serde::Serialize;

/// A single request to the daemon.
///
/// Serialized as exactly one line of JSON. String fields may contain
/// newlines (patch text routinely does); serde_json escapes them, so the
/// serialized form never contains a raw `\n`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Request {
    /// Liveness check. No payload.
    Ping,

    /// Free-form chat turn.
    Chat {
        /// User message text.
        text: String,
    },

    /// Ask the daemon for a step-by-step plan toward a goal.
    Plan {
        /// Project root the daemon should operate in.
        root: String,
        /// Goal description.
        goal: String,
    },

    /// Ask the daemon to propose shell commands for a task.
    Shell {
        /// Project root the daemon should operate in.
        root: String,
        /// Task description.
        task: String,
    },

    /// Request an AI-generated edit for one file. Returns a diff for
    /// preview plus the patch (or full replacement) needed to apply it.
    Edit {
        /// Project root the daemon should operate in.
        root: String,
        /// File path relative to `root`.
        file: String,
        /// Editing instruction.
        instruction: String,
    },

    /// Apply a previously previewed unified-diff patch.
    EditApply {
        /// Project root the daemon should operate in.
        root: String,
        /// File path relative to `root`.
        file: String,
        /// Hunks-only unified diff to apply.
        patch: String,
        /// Instruction the patch was generated for (guard input).
        instruction: String,
        /// Write a backup file before modifying the target.
        backup: bool,
        /// `git add` the file after a successful write.
        stage: bool,
    },

    /// Apply a previously previewed whole-file replacement.
    EditApplyFull {
        /// Project root the daemon should operate in.
        root: String,
        /// File path relative to `root`.
        file: String,
        /// Complete new file content.
        text: String,
        /// Instruction the replacement was generated for (guard input).
        instruction: String,
        /// Write a backup file before modifying the target.
        backup: bool,
        /// `git add` the file after a successful write.
        stage: bool,
    },

    /// Porcelain status of the project root.
    GitStatus {
        /// Project root the daemon should operate in.
        root: String,
    },

    /// Stage one file.
    GitAdd {
        /// Project root the daemon should operate in.
        root: String,
        /// File path relative to `root`.
        file: String,
    },

    /// Restore one file from the index, discarding working-tree changes.
    GitRestore {
        /// Project root the daemon should operate in.
        root: String,
        /// File path relative to `root`.
        file: String,
    },
}

impl Request {
    /// Serialize to one newline-terminated wire line.
    pub fn to_line(&self) -> Vec<u8> {
        let mut line =
            serde_json::to_vec(self).expect("JSON serialization cannot fail");
        line.push(b'\n');
        line
    }

    /// The wire command name, for logging.
    pub fn cmd(&self) -> &'static str {
        match self {
            Request::Ping => "ping",
            Request::Chat { .. } => "chat",
            Request::Plan { .. } => "plan",
            Request::Shell { .. } => "shell",
            Request::Edit { .. } => "edit",
            Request::EditApply { .. } => "edit_apply",
            Request::EditApplyFull { .. } => "edit_apply_full",
            Request::GitStatus { .. } => "git_status",
            Request::GitAdd { .. } => "git_add",
            Request::GitRestore { .. } => "git_restore",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn wire(req: &Request) -> Value {
        let line = req.to_line();
        assert_eq!(*line.last().unwrap(), b'\n');
        serde_json::from_slice(&line[..line.len() - 1]).unwrap()
    }

    #[test]
    fn test_ping_serializes_cmd_only() {
        assert_eq!(wire(&Request::Ping), json!({"cmd": "ping"}));
    }

    #[test]
    fn test_edit_apply_wire_shape() {
        let req = Request::EditApply {
            root: "/r".to_string(),
            file: "a.py".to_string(),
            patch: "@@ -1 +1 @@\n-x\n+y\n".to_string(),
            instruction: "x".to_string(),
            backup: true,
            stage: false,
        };
        let value = wire(&req);
        assert_eq!(value["cmd"], "edit_apply");
        assert_eq!(value["root"], "/r");
        assert_eq!(value["file"], "a.py");
        assert_eq!(value["backup"], true);
        assert_eq!(value["stage"], false);
    }

    #[test]
    fn test_edit_apply_full_uses_text_field() {
        let req = Request::EditApplyFull {
            root: "/r".to_string(),
            file: "a.py".to_string(),
            text: "new content\n".to_string(),
            instruction: "rewrite".to_string(),
            backup: true,
            stage: false,
        };
        let value = wire(&req);
        assert_eq!(value["cmd"], "edit_apply_full");
        assert_eq!(value["text"], "new content\n");
        assert!(value.get("patch").is_none());
    }

    #[test]
    fn test_line_never_contains_raw_newline_before_terminator() {
        let req = Request::EditApply {
            root: "/r".to_string(),
            file: "a.py".to_string(),
            patch: "@@ -1,2 +1,2 @@\n line\n-old\n+new\n".to_string(),
            instruction: "multi\nline".to_string(),
            backup: true,
            stage: false,
        };
        let line = req.to_line();
        let newlines = line.iter().filter(|&&b| b == b'\n').count();
        assert_eq!(newlines, 1, "only the terminator may be a raw newline");
    }

    #[test]
    fn test_cmd_names_match_wire_discriminator() {
        let reqs = [
            Request::Ping,
            Request::GitStatus { root: "/r".to_string() },
            Request::GitAdd { root: "/r".to_string(), file: "f".to_string() },
            Request::GitRestore { root: "/r".to_string(), file: "f".to_string() },
        ];
        for req in &reqs {
            assert_eq!(wire(req)["cmd"], req.cmd());
        }
    }
}
