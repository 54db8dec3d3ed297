//! Direct SSH transport.
//!
//! Connects and authenticates per command, which keeps attempts independent
//! when the executor retries. The configured host may just as well be a
//! locally forwarded endpoint (for example `127.0.0.1:4222` opened by an
//! external tunnel process) as a directly routable machine.

use log::{debug, warn};
use ssh2::Session;
use std::io::Read;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::TargetConfig;
use crate::error::{Error, Result};
use crate::exec::RemoteTarget;
use crate::transport::{CommandOutput, Transport};

pub struct SshTransport {
    config: TargetConfig,
}

impl SshTransport {
    pub fn new(config: TargetConfig) -> Self {
        Self { config }
    }

    fn connect(&self) -> Result<Session> {
        let host = self.config.host.as_deref().ok_or_else(|| {
            Error::InvalidTarget("ssh transport requires a host".to_string())
        })?;

        let addr = format!("{}:{}", host, self.config.port);
        let socket_addr = addr
            .to_socket_addrs()
            .map_err(|e| Error::Transport(format!("Failed to resolve {}: {}", addr, e)))?
            .next()
            .ok_or_else(|| Error::Transport(format!("No addresses found for {}", addr)))?;

        debug!("Connecting to {}", socket_addr);
        let tcp =
            TcpStream::connect_timeout(&socket_addr, Duration::from_secs(self.config.timeout))
                .map_err(|e| Error::Transport(format!("Failed to connect to {}: {}", addr, e)))?;

        tcp.set_read_timeout(Some(Duration::from_secs(self.config.timeout)))?;
        tcp.set_write_timeout(Some(Duration::from_secs(self.config.timeout)))?;

        let mut sess = Session::new()
            .map_err(|e| Error::Transport(format!("Failed to create SSH session: {}", e)))?;
        sess.set_tcp_stream(tcp);
        sess.handshake()
            .map_err(|e| Error::Transport(format!("SSH handshake with {} failed: {}", addr, e)))?;

        self.authenticate(&sess)?;
        Ok(sess)
    }

    /// Tries the configured key file first, then falls back to the agent.
    fn authenticate(&self, sess: &Session) -> Result<()> {
        let user = self.config.user.as_deref().ok_or_else(|| {
            Error::InvalidTarget("ssh transport requires a user".to_string())
        })?;

        if let Some(ssh_key) = &self.config.ssh_key {
            let expanded = expand_path(ssh_key);
            if expanded.exists() {
                match sess.userauth_pubkey_file(user, None, &expanded, None) {
                    Ok(()) => {
                        debug!("Authenticated as {} with key {}", user, expanded.display());
                        return Ok(());
                    }
                    Err(e) => {
                        warn!(
                            "Key authentication with {} failed ({}), trying agent",
                            expanded.display(),
                            e
                        );
                    }
                }
            } else {
                warn!("Configured SSH key {} does not exist", expanded.display());
            }
        }

        sess.userauth_agent(user).map_err(|e| {
            Error::Transport(format!("SSH authentication for {} failed: {}", user, e))
        })?;
        debug!("Authenticated as {} via agent", user);
        Ok(())
    }
}

impl Transport for SshTransport {
    fn execute(&self, _target: &RemoteTarget, command: &str) -> Result<CommandOutput> {
        debug!("Running over SSH: {}", command);
        let sess = self.connect()?;

        let mut channel = sess
            .channel_session()
            .map_err(|e| Error::Transport(format!("Failed to open channel: {}", e)))?;
        channel
            .exec(command)
            .map_err(|e| Error::Transport(format!("Failed to execute command: {}", e)))?;

        let mut stdout = String::new();
        channel.read_to_string(&mut stdout).map_err(Error::Io)?;

        let mut stderr = String::new();
        channel
            .stderr()
            .read_to_string(&mut stderr)
            .map_err(Error::Io)?;

        channel
            .wait_close()
            .map_err(|e| Error::Transport(format!("Failed to close channel: {}", e)))?;
        let exit_code = channel
            .exit_status()
            .map_err(|e| Error::Transport(format!("Failed to get exit status: {}", e)))?;

        Ok(CommandOutput {
            stdout,
            stderr,
            exit_code,
        })
    }

    fn describe(&self) -> String {
        format!("ssh {}", self.config.endpoint())
    }
}

/// Expands a leading `~/` to the user's home directory.
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
