//! Configuration management for targets and defaults.
//!
//! The configuration lives in a YAML file and names the targets commands can
//! run against, plus default retry and poll settings:
//!
//! ```yaml
//! targets:
//!   web-a:
//!     host: 203.0.113.7
//!     user: admin
//!     ssh_key: ~/.ssh/deploy_ed25519
//!   mig-member:
//!     zone: europe-west1-b
//!     tunnel_command: "cloudcli ssh {name} --zone {zone} --command {command}"
//! defaults:
//!   retry:
//!     max_attempts: 3
//!     delay_secs: 20
//!   poll:
//!     interval_secs: 5
//!     deadline_secs: 120
//! ```
//!
//! A target is reached either directly over SSH (`host` + `user`) or through
//! a tunnel command template; `{name}`, `{zone}` and `{command}` are
//! substituted when the template is spawned.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

fn default_ssh_port() -> u16 {
    22
}

fn default_timeout() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    20
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_poll_deadline_secs() -> u64 {
    120
}

/// How to reach one named target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Hostname or IP to SSH to; may be a locally forwarded tunnel endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// SSH username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// SSH port
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    /// Zone or location label, substituted into tunnel templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Path to an SSH private key; agent authentication is the fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Tunnel command template with `{name}`, `{zone}` and `{command}` tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tunnel_command: Option<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: None,
            user: None,
            port: default_ssh_port(),
            zone: None,
            ssh_key: None,
            timeout: default_timeout(),
            tunnel_command: None,
        }
    }
}

impl TargetConfig {
    /// A target reached directly over SSH.
    pub fn direct(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            user: Some(user.into()),
            ..Self::default()
        }
    }

    /// A target reached through a tunnel command template.
    pub fn tunneled(template: impl Into<String>) -> Self {
        Self {
            tunnel_command: Some(template.into()),
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn with_ssh_key(mut self, ssh_key: impl Into<String>) -> Self {
        self.ssh_key = Some(ssh_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns `user@host` with the port appended when it is not 22.
    pub fn endpoint(&self) -> String {
        let user = self.user.as_deref().unwrap_or("?");
        let host = self.host.as_deref().unwrap_or("?");
        if self.port == 22 {
            format!("{}@{}", user, host)
        } else {
            format!("{}@{}:{}", user, host, self.port)
        }
    }
}

/// Default retry settings applied when the command line does not override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryDefaults {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub delay_secs: u64,
}

impl Default for RetryDefaults {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_retry_delay_secs(),
        }
    }
}

/// Default poll settings applied when the command line does not override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollDefaults {
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_poll_deadline_secs")]
    pub deadline_secs: u64,
}

impl Default for PollDefaults {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
            deadline_secs: default_poll_deadline_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultSettings {
    #[serde(default)]
    pub retry: RetryDefaults,
    #[serde(default)]
    pub poll: PollDefaults,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
    #[serde(default)]
    pub defaults: DefaultSettings,
}

impl Config {
    /// Loads from the default location; missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Loads from a specific path; missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file {}: {}\n\n\
                 Suggestions:\n\
                 • Check the YAML syntax (indentation, missing colons)\n\
                 • Compare against the example from: probex config init\n\
                 • Move the file aside to start over",
                path.display(),
                e
            ))
        })
    }

    /// Saves to the default location, creating parent directories.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Saves to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let contents = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Default path: `<config dir>/probex/config.yml`.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        Ok(base.join("probex").join("config.yml"))
    }

    pub fn get_target(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.get(name)
    }

    pub fn set_target(&mut self, name: impl Into<String>, target: TargetConfig) {
        self.targets.insert(name.into(), target);
    }

    pub fn remove_target(&mut self, name: &str) -> Option<TargetConfig> {
        self.targets.remove(name)
    }

    /// Target names in sorted order, for stable listings.
    pub fn target_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.targets.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
