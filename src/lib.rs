//! Probex runs verification commands on remote targets with bounded retry
//! and waits for dependent resources to become observably ready.
//!
//! The two core pieces are [`exec::RemoteExecutor`], which re-runs a command
//! through a [`transport::Transport`] until it succeeds or a retry budget is
//! spent, and [`poll::wait_for`], which evaluates a readiness probe on a
//! fixed interval until it reports ready or a deadline passes. Both report
//! failure as an ordinary value so callers can decide what exhaustion means.

pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod poll;
pub mod transport;

use clap::{Parser, Subcommand};

use crate::cli::check::CheckCommand;
use crate::cli::completions::CompletionsCommand;
use crate::cli::config::ConfigCommand;
use crate::cli::run::RunCommand;
use crate::cli::wait::WaitCommand;

#[derive(Parser)]
#[command(name = "probex")]
#[command(version)]
#[command(about = "Run remote verification commands with bounded retry and poll for readiness", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a command on a target, retrying until it succeeds or attempts run out
    Run(RunCommand),
    /// Poll until an endpoint is ready or the deadline passes
    Wait(WaitCommand),
    /// Verify that configured targets are reachable end to end
    Check(CheckCommand),
    /// Manage targets and defaults
    Config(ConfigCommand),
    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
