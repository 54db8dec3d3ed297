//! Manage targets and defaults.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, TargetConfig};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,

    /// Use a specific configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the full configuration
    Show,
    /// Print the configuration file path
    Path,
    /// List configured target names
    ListTargets,
    /// Add or update a target
    AddTarget {
        /// Target name
        name: String,
        /// Hostname or IP for direct SSH
        #[arg(long)]
        host: Option<String>,
        /// SSH username
        #[arg(long)]
        user: Option<String>,
        /// SSH port
        #[arg(long, default_value = "22")]
        port: u16,
        /// Zone or location label for tunnel templates
        #[arg(long)]
        zone: Option<String>,
        /// Path to an SSH private key
        #[arg(long)]
        ssh_key: Option<String>,
        /// Connection timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
        /// Tunnel command template with {name}, {zone} and {command} tokens
        #[arg(long)]
        tunnel_command: Option<String>,
    },
    /// Remove a target
    RemoveTarget {
        /// Target name
        name: String,
    },
    /// Show one target's settings
    ShowTarget {
        /// Target name
        name: String,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => Config::default_path()?,
        };

        match self.action {
            ConfigAction::Init { force } => {
                if path.exists() && !force {
                    return Err(anyhow!(
                        "Config file already exists at {}.\nUse --force to overwrite it.",
                        path.display()
                    ));
                }
                let config = example_config();
                config.save_to(&path)?;
                println!("Wrote example configuration to {}", path.display());
                println!();
                println!("Edit it to describe your targets, then verify with:");
                println!("  probex check");
                Ok(())
            }
            ConfigAction::Show => {
                let config = Config::load_from(&path)?;
                print!("{}", serde_yaml::to_string(&config)?);
                Ok(())
            }
            ConfigAction::Path => {
                println!("{}", path.display());
                Ok(())
            }
            ConfigAction::ListTargets => {
                let config = Config::load_from(&path)?;
                if config.is_empty() {
                    println!("No targets configured.");
                    return Ok(());
                }
                for name in config.target_names() {
                    if let Some(target) = config.get_target(&name) {
                        match &target.tunnel_command {
                            Some(template) => println!("{} (tunnel: {})", name, template),
                            None => println!("{} ({})", name, target.endpoint()),
                        }
                    }
                }
                Ok(())
            }
            ConfigAction::AddTarget {
                name,
                host,
                user,
                port,
                zone,
                ssh_key,
                timeout,
                tunnel_command,
            } => {
                if tunnel_command.is_none() && (host.is_none() || user.is_none()) {
                    return Err(anyhow!(
                        "A target needs either --host and --user for direct SSH,\n\
                         or --tunnel-command for a tunnel template."
                    ));
                }
                let target = TargetConfig {
                    host,
                    user,
                    port,
                    zone,
                    ssh_key,
                    timeout,
                    tunnel_command,
                };
                let mut config = Config::load_from(&path)?;
                config.set_target(&name, target);
                config.save_to(&path)?;
                println!("Added target '{}'", name);
                Ok(())
            }
            ConfigAction::RemoveTarget { name } => {
                let mut config = Config::load_from(&path)?;
                if config.remove_target(&name).is_none() {
                    return Err(anyhow!("Target '{}' not found", name));
                }
                config.save_to(&path)?;
                println!("Removed target '{}'", name);
                Ok(())
            }
            ConfigAction::ShowTarget { name } => {
                let config = Config::load_from(&path)?;
                let target = config
                    .get_target(&name)
                    .ok_or_else(|| anyhow!("Target '{}' not found", name))?;
                print!("{}", serde_yaml::to_string(target)?);
                Ok(())
            }
        }
    }
}

fn example_config() -> Config {
    let mut config = Config::default();
    config.set_target(
        "web-a",
        TargetConfig::direct("app.internal.example.com", "admin")
            .with_ssh_key("~/.ssh/deploy_ed25519"),
    );
    config.set_target(
        "mig-member",
        TargetConfig::tunneled("ssh -o BatchMode=yes -J bastion.example.com admin@{name} {command}")
            .with_zone("europe-west1-b"),
    );
    config
}
