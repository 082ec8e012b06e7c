//! Simulator configuration

use dw_bridge::HostEndpoints;
use serde::{Deserialize, Serialize};

/// Simulated host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Version reported by GET_VERSION_INFO
    #[serde(default = "default_version")]
    pub version: String,
    /// Scanners reported by ENUMERATE_SCANNERS
    #[serde(default = "default_scanners")]
    pub scanners: Vec<ScannerDef>,
    /// Channel names the host listens and answers on
    #[serde(default)]
    pub endpoints: HostEndpoints,
}

fn default_version() -> String {
    "11.4.28".to_string()
}

fn default_scanners() -> Vec<ScannerDef> {
    vec![ScannerDef {
        name: "2D Barcode Imager".to_string(),
        identifier: "INTERNAL_IMAGER".to_string(),
    }]
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            scanners: default_scanners(),
            endpoints: HostEndpoints::default(),
        }
    }
}

/// An attached scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerDef {
    pub name: String,
    pub identifier: String,
}
