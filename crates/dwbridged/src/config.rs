//! Daemon configuration file

use std::path::Path;

use anyhow::{Context, Result};
use dw_bridge::BridgeConfig;
use dw_sim::SimConfig;
use serde::{Deserialize, Serialize};

/// Complete daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Profile to create and configure at start-up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub simulator: SimConfig,
}

impl DaemonConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        // The simulated host answers on the same channels the bridge uses
        config.simulator.endpoints = config.bridge.host.clone();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_are_optional() {
        let config: DaemonConfig = toml::from_str(
            r#"
            profile = "demo"

            [bridge]
            package_name = "com.acme.picker"
            "#,
        )
        .unwrap();

        assert_eq!(config.profile.as_deref(), Some("demo"));
        assert_eq!(config.bridge.package_name, "com.acme.picker");
        assert_eq!(config.simulator, SimConfig::default());
    }
}
