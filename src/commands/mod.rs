//! CLI subcommand implementations for sgc.
//!
//! Each one-shot command issues a single RPC and renders the result on
//! stdout; `edit` additionally opens the interactive review loop in
//! [`console`]. The binary in `main.rs` only parses arguments and
//! dispatches here.

use anyhow::{bail, Result};

use crate::review::{ReviewContext, ReviewSession};
use crate::rpc::{Request, RpcClient};

pub mod console;

/// Check that the daemon answers on its socket.
pub async fn ping(client: &RpcClient) -> Result<()> {
    let event = client.request(&Request::Ping).await;
    if event.ok {
        println!("daemon is up ({})", client.socket_path().display());
        Ok(())
    } else {
        bail!("daemon unreachable: {}", event.display_error())
    }
}

/// Send one chat message and print the answer.
pub async fn chat(client: &RpcClient, text: String) -> Result<()> {
    let event = client.request(&Request::Chat { text }).await;
    if !event.ok {
        bail!("{}", event.display_error());
    }
    println!("{}", event.answer.as_deref().unwrap_or(""));
    Ok(())
}

/// Ask for a plan and print the numbered steps.
pub async fn plan(client: &RpcClient, root: String, goal: String) -> Result<()> {
    let event = client.request(&Request::Plan { root, goal }).await;
    if !event.ok {
        bail!("{}", event.display_error());
    }
    for (index, step) in event.steps.unwrap_or_default().iter().enumerate() {
        println!("{}. {step}", index + 1);
    }
    Ok(())
}

/// Ask for shell commands and print them, flagging blocked ones.
pub async fn shell(client: &RpcClient, root: String, task: String) -> Result<()> {
    let event = client.request(&Request::Shell { root, task }).await;
    if !event.ok {
        bail!("{}", event.display_error());
    }
    let blocked = event.blocked.unwrap_or_default();
    for command in event.commands.unwrap_or_default() {
        if blocked.contains(&command) {
            println!("[blocked] {command}");
        } else {
            println!("{command}");
        }
    }
    Ok(())
}

/// Print porcelain status of the project root.
pub async fn status(client: &RpcClient, root: String) -> Result<()> {
    let event = client.request(&Request::GitStatus { root }).await;
    if !event.ok {
        bail!("{}", event.display_error());
    }
    if event.inside_git != Some(true) {
        println!("not inside a git work tree");
        return Ok(());
    }
    let lines = event.porcelain.unwrap_or_default();
    if lines.is_empty() {
        println!("clean");
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// Request an edit for one file, preview the proposed diff, and run the
/// interactive review loop until the session closes.
pub async fn edit(
    client: &RpcClient,
    root: String,
    file: String,
    instruction: String,
) -> Result<()> {
    let request = Request::Edit {
        root: root.clone(),
        file,
        instruction: instruction.clone(),
    };
    let event = client.request(&request).await;
    if !event.ok {
        bail!("edit failed: {}", event.display_error());
    }

    let Some((diff, context)) =
        ReviewContext::from_edit_response(root, instruction, &event)
    else {
        bail!("daemon returned no reviewable diff");
    };

    let session = ReviewSession::open(
        client.clone(),
        context,
        &diff,
        console::ConsoleSurface::new(),
    );
    console::run_review_loop(session).await
}
