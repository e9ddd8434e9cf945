//! Socket endpoint configuration.
//!
//! Resolution happens once at startup and the resolved value is threaded
//! into [`crate::rpc::RpcClient`]; there is no global mutable state.
//! Precedence: explicit path (CLI flag or embedding host) >
//! `SHELLGEIST_SOCKET` environment variable > the daemon's default
//! `~/.cache/shellgeist.sock`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the daemon socket path.
pub const SOCKET_ENV_VAR: &str = "SHELLGEIST_SOCKET";

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the daemon's Unix socket.
    pub socket_path: PathBuf,
}

impl Config {
    /// Resolve configuration from the environment, honoring an explicit
    /// override first.
    ///
    /// # Errors
    ///
    /// Fails only when no override is given and the home directory
    /// cannot be determined for the default path.
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        if let Some(raw) = explicit {
            return Ok(Self::with_socket_path(raw));
        }
        if let Ok(raw) = std::env::var(SOCKET_ENV_VAR) {
            if !raw.trim().is_empty() {
                return Ok(Self::with_socket_path(&raw));
            }
        }
        Ok(Self {
            socket_path: default_socket_path()?,
        })
    }

    /// Configuration pointing at an explicit socket path, tilde-expanded.
    pub fn with_socket_path(raw: &str) -> Self {
        Self {
            socket_path: expand_user_path(raw),
        }
    }
}

/// The daemon's default endpoint, `~/.cache/shellgeist.sock`.
fn default_socket_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".cache").join("shellgeist.sock"))
}

/// Expand a leading `~` in a user-supplied path.
fn expand_user_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}
