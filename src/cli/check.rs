//! Connectivity smoke test for configured targets.

use anyhow::{anyhow, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::exec::{CommandSpec, RemoteExecutor, RemoteTarget, RetryPolicy};
use crate::transport;

/// Marker echoed through the channel; seeing it come back proves the
/// transport carries commands and output end to end.
const CHECK_MARKER: &str = "probex-transport-ok";

#[derive(Args)]
pub struct CheckCommand {
    /// Name of a configured target; checks every target when omitted
    pub target: Option<String>,

    /// Total attempts per target
    #[arg(short, long, default_value = "1")]
    pub attempts: u32,

    /// Seconds to pause before each retry
    #[arg(short, long, default_value = "5")]
    pub delay_secs: u64,

    /// Use a specific configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl CheckCommand {
    pub fn execute(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        if config.is_empty() {
            println!("No targets configured.");
            println!();
            println!("Add one with:");
            println!("  probex config add-target <name> --host <hostname> --user <username>");
            return Ok(());
        }

        if self.attempts == 0 {
            return Err(anyhow!("--attempts must be at least 1"));
        }

        let names = match &self.target {
            Some(name) => {
                if config.get_target(name).is_none() {
                    return Err(anyhow!(
                        "Target '{}' not found.\n\nConfigured targets:\n{}",
                        name,
                        config
                            .target_names()
                            .iter()
                            .map(|n| format!("  • {}", n))
                            .collect::<Vec<_>>()
                            .join("\n")
                    ));
                }
                vec![name.clone()]
            }
            None => config.target_names(),
        };

        let policy = RetryPolicy::new(self.attempts, Duration::from_secs(self.delay_secs));
        let command = CommandSpec::new(format!("echo {}", CHECK_MARKER))
            .with_expected_substring(CHECK_MARKER);

        println!("Checking {} target(s)...", names.len());
        println!();

        let mut failures = 0;
        for name in &names {
            let target_config = match config.get_target(name) {
                Some(target_config) => target_config,
                None => continue,
            };

            let transport = match transport::for_target(target_config) {
                Ok(transport) => transport,
                Err(e) => {
                    println!("  {} {}: {}", style("✗").red(), name, e);
                    failures += 1;
                    continue;
                }
            };

            let target = RemoteTarget::from_config(name, target_config, transport.describe());
            let result = RemoteExecutor::new(transport.as_ref()).run(&target, &command, &policy);

            if result.is_success() {
                println!(
                    "  {} {} via {}",
                    style("✓").green(),
                    name,
                    transport.describe()
                );
            } else {
                println!(
                    "  {} {} ({} attempt(s) spent)",
                    style("✗").red(),
                    name,
                    result.attempts_used
                );
                failures += 1;
            }
        }

        println!();
        if failures == 0 {
            println!("{} All targets reachable", style("✓").green());
        } else {
            println!("{} {} target(s) unreachable", style("✗").red(), failures);
            std::process::exit(1);
        }
        Ok(())
    }
}
