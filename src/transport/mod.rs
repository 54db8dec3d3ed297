//! Transports: the channel a command travels through to reach a target.
//!
//! A transport runs one command exactly once; retry policy lives with the
//! executor. `Err` means the command could not be run at all (resolution,
//! connection, authentication, spawn failure). A command that ran and exited
//! non-zero is `Ok` carrying that exit code, because "ran and failed" and
//! "could not run" call for different troubleshooting.

pub mod diagnostics;
pub mod process;
pub mod ssh;

pub use process::ProcessTransport;
pub use ssh::SshTransport;

use serde::Serialize;

use crate::config::TargetConfig;
use crate::error::{Error, Result};
use crate::exec::RemoteTarget;

/// Captured output of one command run.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    /// Returns true if the command exited 0.
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// A channel for running commands on a remote target.
pub trait Transport {
    /// Runs `command` on `target` once, capturing output and exit status.
    ///
    /// # Errors
    ///
    /// Returns an error when the command cannot be run at all; a run that
    /// completes with any exit code is `Ok`.
    fn execute(&self, target: &RemoteTarget, command: &str) -> Result<CommandOutput>;

    /// Human-readable description of the channel, for logs and diagnostics.
    fn describe(&self) -> String;
}

/// Builds the transport for a configured target: the tunnel command template
/// when one is set, otherwise a direct SSH connection to the target's host.
pub fn for_target(config: &TargetConfig) -> Result<Box<dyn Transport>> {
    if let Some(template) = &config.tunnel_command {
        return Ok(Box::new(ProcessTransport::new(template.clone())));
    }
    if config.host.is_some() {
        return Ok(Box::new(SshTransport::new(config.clone())));
    }
    Err(Error::InvalidTarget(
        "target has neither a host nor a tunnel_command; set one of them".to_string(),
    ))
}
