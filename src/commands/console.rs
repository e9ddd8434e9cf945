//! Terminal rendition of the review surface.
//!
//! `sgc edit` previews the diff on stdout and reads verdicts from stdin
//! until the session closes. Single letters and the named aliases both
//! go through [`crate::review::ReviewAction::parse`], so the keystroke
//! path and the command path share one implementation.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::review::{
    ReviewAction, ReviewContext, ReviewSession, ReviewState, ReviewSurface,
    Severity,
};

/// Stdout-backed review surface.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    closed: bool,
}

impl ConsoleSurface {
    /// Create an open console surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ReviewSurface for ConsoleSurface {
    fn preview(&mut self, diff: &str, context: &ReviewContext) {
        println!("── proposed edit: {} ──", context.file);
        println!("{}", diff.trim_end());
        println!("──");
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => println!("[sg] {message}"),
            Severity::Warn => println!("[sg] warning: {message}"),
            Severity::Error => eprintln!("[sg] error: {message}"),
        }
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// Drive a console review session until it closes.
///
/// Reads one verdict per line; EOF on stdin rejects the pending edit.
pub async fn run_review_loop(
    mut session: ReviewSession<ConsoleSurface>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while session.state() == ReviewState::Open {
        print!("[a]pply  [f]ull  [s]tage  [r]estore  [q]uit > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            session.reject();
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match ReviewAction::parse(input) {
            Some(action) => session.dispatch(action).await,
            None => println!("unknown action: {input}"),
        }
    }

    Ok(())
}
