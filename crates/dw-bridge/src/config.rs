//! Bridge configuration
//!
//! Names of the host channels, the application's own identity and the intent
//! output settings written into the host profile. Loaded from TOML; every
//! field has a default so an empty file is a valid configuration.

use std::path::Path;

use dw_core::message::names;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Package name the host profile is associated with
    #[serde(default = "default_package_name")]
    pub package_name: String,
    /// Action the host service delivers decodes on
    #[serde(default = "default_scan_action")]
    pub scan_action: String,
    /// How the host delivers decodes to the application
    #[serde(default)]
    pub intent_delivery: IntentDelivery,
    /// Ask the host to report results for profile commands
    #[serde(default)]
    pub request_acknowledgements: bool,
    /// Host service channel names
    #[serde(default)]
    pub host: HostEndpoints,
    /// In-process bus settings
    #[serde(default)]
    pub bus: BusConfig,
}

fn default_package_name() -> String {
    "com.example.scanner".to_string()
}

fn default_scan_action() -> String {
    "com.example.scanner.SCAN".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            package_name: default_package_name(),
            scan_action: default_scan_action(),
            intent_delivery: IntentDelivery::default(),
            request_acknowledgements: false,
            host: HostEndpoints::default(),
            bus: BusConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

// =============================================================================
// Host channels
// =============================================================================

/// Well-known channel names of the host service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEndpoints {
    /// Inbox action commands are addressed to
    #[serde(default = "default_inbox_action")]
    pub inbox_action: String,
    /// Action command results are broadcast on
    #[serde(default = "default_result_action")]
    pub result_action: String,
    /// Category attached to command results
    #[serde(default = "default_result_category")]
    pub result_category: String,
}

fn default_inbox_action() -> String {
    names::HOST_INBOX_ACTION.to_string()
}

fn default_result_action() -> String {
    names::HOST_RESULT_ACTION.to_string()
}

fn default_result_category() -> String {
    names::DEFAULT_CATEGORY.to_string()
}

impl Default for HostEndpoints {
    fn default() -> Self {
        Self {
            inbox_action: default_inbox_action(),
            result_action: default_result_action(),
            result_category: default_result_category(),
        }
    }
}

// =============================================================================
// Intent output
// =============================================================================

/// Intent output delivery mode, written to the profile as its decimal code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentDelivery {
    StartActivity,
    StartService,
    #[default]
    Broadcast,
}

impl IntentDelivery {
    /// Code used in the `intent_delivery` profile parameter
    pub fn code(&self) -> &'static str {
        match self {
            Self::StartActivity => "0",
            Self::StartService => "1",
            Self::Broadcast => "2",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::StartActivity),
            "1" => Some(Self::StartService),
            "2" => Some(Self::Broadcast),
            _ => None,
        }
    }
}

// =============================================================================
// Bus
// =============================================================================

/// In-process bus configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusConfig {
    /// Messages buffered per listener before it lags
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Simulated delivery latency in milliseconds
    #[serde(default)]
    pub latency_ms: u64,
}

fn default_capacity() -> usize {
    256
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            latency_ms: 0,
        }
    }
}
