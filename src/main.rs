//! sgc - terminal client for the ShellGeist daemon.
//!
//! Thin binary: parses arguments, resolves the socket endpoint once, and
//! dispatches into the `sg_client` library.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sg_client::{commands, Config, RpcClient};

#[derive(Parser)]
#[command(name = "sgc", version, about = "ShellGeist daemon client")]
struct Cli {
    /// Daemon socket path (overrides SHELLGEIST_SOCKET and the default).
    #[arg(long, global = true)]
    socket: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the daemon is reachable.
    Ping,
    /// Send a chat message and print the answer.
    Chat {
        /// Message text.
        text: String,
    },
    /// Ask for a step-by-step plan toward a goal.
    Plan {
        /// Project root.
        #[arg(long, default_value = ".")]
        root: String,
        /// Goal description.
        goal: String,
    },
    /// Ask for shell commands for a task.
    Shell {
        /// Project root.
        #[arg(long, default_value = ".")]
        root: String,
        /// Task description.
        task: String,
    },
    /// Show porcelain git status of a project root.
    Status {
        /// Project root.
        #[arg(long, default_value = ".")]
        root: String,
    },
    /// Request an edit for one file and review it interactively.
    Edit {
        /// Project root.
        #[arg(long, default_value = ".")]
        root: String,
        /// File path relative to the root.
        file: String,
        /// Editing instruction.
        instruction: String,
    },
}

/// Canonicalize a user-supplied root so the daemon sees an absolute path
/// regardless of where it was started.
fn absolute_root(root: &str) -> Result<String> {
    let canonical = std::fs::canonicalize(root)
        .with_context(|| format!("project root not found: {root}"))?;
    Ok(canonical.to_string_lossy().into_owned())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.socket.as_deref())?;
    let client = RpcClient::new(config.socket_path);

    match cli.command {
        Command::Ping => commands::ping(&client).await,
        Command::Chat { text } => commands::chat(&client, text).await,
        Command::Plan { root, goal } => {
            commands::plan(&client, absolute_root(&root)?, goal).await
        }
        Command::Shell { root, task } => {
            commands::shell(&client, absolute_root(&root)?, task).await
        }
        Command::Status { root } => {
            commands::status(&client, absolute_root(&root)?).await
        }
        Command::Edit {
            root,
            file,
            instruction,
        } => commands::edit(&client, absolute_root(&root)?, file, instruction).await,
    }
}
