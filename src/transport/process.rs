//! Subprocess transport for tunnel-style channels.
//!
//! Cloud providers reach instances without a direct network path through
//! their own CLIs: a bastion hop, an identity-aware tunnel. This transport
//! spawns a configured command template with the target substituted in, so
//! any such CLI can carry the command without this crate learning provider
//! semantics.
//!
//! Template rules: the template splits on whitespace into argv tokens, so no
//! shell is involved. `{name}` and `{zone}` substitute inside tokens. A
//! token that is exactly `{command}` becomes the command text as a single
//! argument, preserving its internal spaces and quotes.

use log::debug;
use std::process::Command;

use crate::error::{Error, Result};
use crate::exec::RemoteTarget;
use crate::transport::{CommandOutput, Transport};

pub struct ProcessTransport {
    template: String,
}

impl ProcessTransport {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Renders the template into argv for one target and command.
    fn render(&self, target: &RemoteTarget, command: &str) -> Result<Vec<String>> {
        if !self.template.contains("{command}") {
            return Err(Error::Config(
                "tunnel command template must contain a {command} token".to_string(),
            ));
        }

        let mut argv = Vec::new();
        for token in self.template.split_whitespace() {
            if token == "{command}" {
                argv.push(command.to_string());
                continue;
            }
            let mut rendered = token.replace("{name}", &target.name);
            if rendered.contains("{zone}") {
                match &target.zone {
                    Some(zone) => rendered = rendered.replace("{zone}", zone),
                    None => {
                        return Err(Error::InvalidTarget(format!(
                            "tunnel command needs {{zone}} but target '{}' has no zone",
                            target.name
                        )));
                    }
                }
            }
            argv.push(rendered);
        }

        if argv.is_empty() {
            return Err(Error::Config(
                "tunnel command template is empty".to_string(),
            ));
        }
        Ok(argv)
    }
}

impl Transport for ProcessTransport {
    fn execute(&self, target: &RemoteTarget, command: &str) -> Result<CommandOutput> {
        let argv = self.render(target, command)?;
        debug!("Spawning tunnel command: {:?}", argv);

        let output = Command::new(&argv[0])
            .args(&argv[1..])
            .output()
            .map_err(|e| Error::Transport(format!("Failed to spawn '{}': {}", argv[0], e)))?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    fn describe(&self) -> String {
        format!("tunnel via `{}`", self.template)
    }
}
