//! Tunnel configuration: TOML file with per-field defaults.

use crate::policy::{ForwardPolicy, DEFAULT_MIN_PORT, DEFAULT_RESERVED_PORTS};
use portway_proto::{ProtoError, ProtoResult};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Top-level config file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub forward: ForwardSection,
}

/// `[forward]` section of the config TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ForwardSection {
    #[serde(default = "default_reserved_ports")]
    pub reserved_ports: Vec<u16>,
    #[serde(default = "default_min_port")]
    pub min_port: u16,
}

impl Default for ForwardSection {
    fn default() -> Self {
        Self {
            reserved_ports: default_reserved_ports(),
            min_port: default_min_port(),
        }
    }
}

fn default_reserved_ports() -> Vec<u16> {
    DEFAULT_RESERVED_PORTS.to_vec()
}

fn default_min_port() -> u16 {
    DEFAULT_MIN_PORT
}

impl ForwardSection {
    /// Resolve this section into the runtime policy.
    pub fn policy(&self) -> ForwardPolicy {
        ForwardPolicy::new(self.reserved_ports.clone(), self.min_port)
    }
}

impl ConfigFile {
    /// Load config from a TOML file; `None` or a missing file yields
    /// defaults.
    pub fn load(config_path: Option<&Path>) -> ProtoResult<Self> {
        let Some(path) = config_path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        info!(path = %path.display(), "loading config file");
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ProtoError::Other(format!("config parse error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_canonical_policy() {
        let config = ConfigFile::load(None).unwrap();
        let policy = config.forward.policy();
        assert!(!policy.allows(22));
        assert!(!policy.allows(1024));
        assert!(policy.allows(8080));
        assert!(policy.allows(0));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = ConfigFile::load(Some(Path::new("/nonexistent/portway.toml"))).unwrap();
        assert_eq!(config.forward.reserved_ports, vec![22, 80, 443]);
        assert_eq!(config.forward.min_port, 1024);
    }

    #[test]
    fn custom_section_parses() {
        let config: ConfigFile = toml::from_str(
            "[forward]\nreserved_ports = [9999]\nmin_port = 2000\n",
        )
        .unwrap();
        let policy = config.forward.policy();
        assert!(!policy.allows(9999));
        assert!(!policy.allows(2000));
        assert!(policy.allows(2001));
        // 22 is no longer reserved but still below the floor.
        assert!(!policy.allows(22));
    }

    #[test]
    fn empty_file_uses_field_defaults() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(config.forward.min_port, DEFAULT_MIN_PORT);
    }
}
