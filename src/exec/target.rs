//! Remote target identity.

use serde::Serialize;

use crate::config::TargetConfig;

/// Identifies where a command runs.
///
/// The name and zone are opaque to the executor; transports interpret them,
/// for example by substituting them into a tunnel command template. The
/// transport field is a human-readable description of the channel, carried
/// for log lines and diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteTarget {
    /// Target name: an instance name, host alias, or configuration key
    pub name: String,
    /// Zone or location of the target, if it has one
    pub zone: Option<String>,
    /// Description of the channel used to reach the target
    pub transport: String,
}

impl RemoteTarget {
    /// Creates a target with the given name, no zone, and a direct channel.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zone: None,
            transport: "direct".to_string(),
        }
    }

    /// Builds the identity for a configured target.
    pub fn from_config(
        name: impl Into<String>,
        config: &TargetConfig,
        transport: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            zone: config.zone.clone(),
            transport: transport.into(),
        }
    }

    /// Builder method to set the zone.
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Builder method to set the transport description.
    pub fn with_transport(mut self, transport: impl Into<String>) -> Self {
        self.transport = transport.into();
        self
    }

    /// Returns `name` or `name (zone)` for log lines.
    pub fn qualified_name(&self) -> String {
        match &self.zone {
            Some(zone) => format!("{} ({})", self.name, zone),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_target_has_no_zone() {
        let target = RemoteTarget::new("web-a");
        assert_eq!(target.name, "web-a");
        assert!(target.zone.is_none());
        assert_eq!(target.qualified_name(), "web-a");
    }

    #[test]
    fn test_qualified_name_includes_zone() {
        let target = RemoteTarget::new("web-a").with_zone("europe-west1-b");
        assert_eq!(target.qualified_name(), "web-a (europe-west1-b)");
    }

    #[test]
    fn test_from_config_carries_zone() {
        let config = TargetConfig::tunneled("gateway exec {name} -- {command}").with_zone("us-east1");
        let target = RemoteTarget::from_config("mig-member", &config, "tunnel");
        assert_eq!(target.zone.as_deref(), Some("us-east1"));
        assert_eq!(target.transport, "tunnel");
    }
}
