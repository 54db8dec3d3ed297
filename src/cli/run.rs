//! Run a command on a configured target with bounded retry.

use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::exec::{CommandSpec, RemoteExecutor, RemoteTarget, RetryPolicy};
use crate::transport;

#[derive(Args)]
pub struct RunCommand {
    /// Name of a configured target
    pub target: String,

    /// Command to execute on the target
    pub command: String,

    /// Total attempts, counting the first (defaults to the configured value)
    #[arg(short, long)]
    pub attempts: Option<u32>,

    /// Seconds to pause before each retry (defaults to the configured value)
    #[arg(short, long)]
    pub delay_secs: Option<u64>,

    /// Require this substring on stdout for an attempt to count as success
    #[arg(long)]
    pub expect_substring: Option<String>,

    /// Exit code that counts as success
    #[arg(long, default_value = "0")]
    pub expect_exit_code: i32,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Use a specific configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl RunCommand {
    pub fn execute(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let target_config = config.get_target(&self.target).ok_or_else(|| {
            anyhow!(
                "Target '{}' is not configured.\n\n\
                 Add it with:\n  probex config add-target {} --host <hostname> --user <username>\n\n\
                 Or list existing targets with:\n  probex config list-targets",
                self.target,
                self.target
            )
        })?;

        let attempts = self.attempts.unwrap_or(config.defaults.retry.max_attempts);
        if attempts == 0 {
            return Err(anyhow!("--attempts must be at least 1"));
        }
        let policy = RetryPolicy::new(
            attempts,
            Duration::from_secs(self.delay_secs.unwrap_or(config.defaults.retry.delay_secs)),
        );

        let mut command = CommandSpec::new(&self.command).with_expected_exit_code(self.expect_exit_code);
        if let Some(marker) = &self.expect_substring {
            command = command.with_expected_substring(marker);
        }

        let transport = transport::for_target(target_config)?;
        let target = RemoteTarget::from_config(&self.target, target_config, transport.describe());

        let executor = RemoteExecutor::new(transport.as_ref());
        let result = executor.run(&target, &command, &policy);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if result.is_success() {
            println!(
                "✓ Succeeded on attempt {}/{}",
                result.attempts_used, policy.max_attempts
            );
            if !result.output.trim().is_empty() {
                println!("{}", result.output.trim_end());
            }
        } else {
            println!("✗ Failed after {} attempt(s)", result.attempts_used);
            if !result.output.trim().is_empty() {
                println!("{}", result.output.trim_end());
            }
        }

        if !result.is_success() {
            std::process::exit(1);
        }
        Ok(())
    }
}
