//! Wait for a probed condition to become ready.

use anyhow::{anyhow, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::poll::{self, HttpProbe, PollSpec, ProbeOutcome, TcpProbe};

#[derive(Args)]
pub struct WaitCommand {
    /// URL to poll with short-timeout GET requests
    #[arg(long, required_unless_present = "tcp", conflicts_with = "tcp")]
    pub url: Option<String>,

    /// Require this substring in the response body
    #[arg(long, requires = "url")]
    pub contains: Option<String>,

    /// host:port to poll for TCP reachability
    #[arg(long)]
    pub tcp: Option<String>,

    /// Seconds between probe evaluations (defaults to the configured value)
    #[arg(short, long)]
    pub interval_secs: Option<u64>,

    /// Total seconds to keep polling (defaults to the configured value)
    #[arg(short, long)]
    pub deadline_secs: Option<u64>,

    /// Per-evaluation probe timeout in seconds
    #[arg(long, default_value = "5")]
    pub probe_timeout_secs: u64,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Use a specific configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl WaitCommand {
    pub fn execute(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let interval = self.interval_secs.unwrap_or(config.defaults.poll.interval_secs);
        if interval == 0 {
            return Err(anyhow!("--interval-secs must be at least 1"));
        }
        let spec = PollSpec::new(
            Duration::from_secs(interval),
            Duration::from_secs(
                self.deadline_secs.unwrap_or(config.defaults.poll.deadline_secs),
            ),
        );
        let probe_timeout = Duration::from_secs(self.probe_timeout_secs);

        let (label, probe): (String, Box<dyn FnMut() -> ProbeOutcome>) =
            if let Some(url) = &self.url {
                let mut http = HttpProbe::new(url.clone(), probe_timeout)?;
                if let Some(marker) = &self.contains {
                    http = http.with_marker(marker.clone());
                }
                (format!("GET {}", url), Box::new(move || http.check()))
            } else if let Some(addr) = &self.tcp {
                let tcp = TcpProbe::new(addr.clone(), probe_timeout);
                (format!("TCP {}", addr), Box::new(move || tcp.check()))
            } else {
                return Err(anyhow!(
                    "Specify what to wait for: --url <URL> or --tcp <host:port>"
                ));
            };

        let spinner = if self.json {
            None
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap(),
            );
            pb.set_message(format!("waiting for {}", label));
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        };

        let result = poll::wait_for(probe, &spec);

        if let Some(pb) = &spinner {
            pb.finish_and_clear();
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if result.is_ready() {
            println!(
                "✓ {} became ready after {:.1}s",
                label,
                result.elapsed.as_secs_f64()
            );
        } else {
            println!(
                "✗ {} still not ready after {:.1}s",
                label,
                result.elapsed.as_secs_f64()
            );
            if let Some(captured) = &result.captured {
                if !captured.is_empty() {
                    println!("Last response: {}", captured);
                }
            }
        }

        if !result.is_ready() {
            std::process::exit(1);
        }
        Ok(())
    }
}
