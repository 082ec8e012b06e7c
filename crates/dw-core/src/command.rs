//! Registry of host API commands
//!
//! Each command is sent as a single extra on the host inbox message, keyed by
//! its wire key (`com.symbol.datawedge.api.<NAME>`). The set of known commands
//! is fixed; any other key coming from the UI layer is carried through as
//! [`CommandName::Custom`].

use std::fmt;

use crate::parameter::ParameterValue;

/// Common prefix of every host API command key
pub const COMMAND_KEY_PREFIX: &str = "com.symbol.datawedge.api.";

/// Parameter shape a command expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterShape {
    /// A single string parameter
    Text,
    /// A nested bundle
    Tree,
}

/// Known host commands
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandName {
    CreateProfile,
    SetConfig,
    SoftScanTrigger,
    ScannerInputPlugin,
    SwitchToProfile,
    GetActiveProfile,
    EnumerateScanners,
    GetVersionInfo,
    /// Any other key, passed through untouched
    Custom(String),
}

impl CommandName {
    /// All registered (non-custom) commands
    pub const KNOWN: [CommandName; 8] = [
        CommandName::CreateProfile,
        CommandName::SetConfig,
        CommandName::SoftScanTrigger,
        CommandName::ScannerInputPlugin,
        CommandName::SwitchToProfile,
        CommandName::GetActiveProfile,
        CommandName::EnumerateScanners,
        CommandName::GetVersionInfo,
    ];

    /// Command name without the API prefix (e.g. `SET_CONFIG`)
    pub fn short_name(&self) -> &str {
        match self {
            Self::CreateProfile => "CREATE_PROFILE",
            Self::SetConfig => "SET_CONFIG",
            Self::SoftScanTrigger => "SOFT_SCAN_TRIGGER",
            Self::ScannerInputPlugin => "SCANNER_INPUT_PLUGIN",
            Self::SwitchToProfile => "SWITCH_TO_PROFILE",
            Self::GetActiveProfile => "GET_ACTIVE_PROFILE",
            Self::EnumerateScanners => "ENUMERATE_SCANNERS",
            Self::GetVersionInfo => "GET_VERSION_INFO",
            Self::Custom(key) => key.strip_prefix(COMMAND_KEY_PREFIX).unwrap_or(key),
        }
    }

    /// Full wire key used as the extra name on the inbox message
    pub fn key(&self) -> String {
        match self {
            Self::Custom(key) => key.clone(),
            known => format!("{}{}", COMMAND_KEY_PREFIX, known.short_name()),
        }
    }

    /// Resolve a wire key against the registry
    pub fn from_key(key: &str) -> Self {
        key.strip_prefix(COMMAND_KEY_PREFIX)
            .and_then(|short| {
                Self::KNOWN
                    .iter()
                    .find(|known| known.short_name() == short)
                    .cloned()
            })
            .unwrap_or_else(|| Self::Custom(key.to_string()))
    }

    /// Expected parameter shape, `None` for custom commands
    pub fn expected_shape(&self) -> Option<ParameterShape> {
        match self {
            Self::SetConfig => Some(ParameterShape::Tree),
            Self::Custom(_) => None,
            _ => Some(ParameterShape::Text),
        }
    }

    /// Whether `parameter` has the shape this command expects
    pub fn accepts(&self, parameter: &ParameterValue) -> bool {
        match self.expected_shape() {
            Some(ParameterShape::Text) => matches!(parameter, ParameterValue::Text(_)),
            Some(ParameterShape::Tree) => matches!(parameter, ParameterValue::Map(_)),
            None => true,
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A command ready to dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: CommandName,
    pub parameter: ParameterValue,
}

impl Command {
    pub fn new(name: CommandName, parameter: impl Into<ParameterValue>) -> Self {
        Self {
            name,
            parameter: parameter.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_round_trip() {
        for command in CommandName::KNOWN.iter() {
            assert_eq!(&CommandName::from_key(&command.key()), command);
        }
        assert_eq!(
            CommandName::SetConfig.key(),
            "com.symbol.datawedge.api.SET_CONFIG"
        );
    }

    #[test]
    fn test_unknown_key_is_custom() {
        let name = CommandName::from_key("com.symbol.datawedge.api.RESET_DEFAULT_PROFILE");
        assert_eq!(
            name,
            CommandName::Custom("com.symbol.datawedge.api.RESET_DEFAULT_PROFILE".into())
        );
        assert_eq!(name.short_name(), "RESET_DEFAULT_PROFILE");
        assert_eq!(name.key(), "com.symbol.datawedge.api.RESET_DEFAULT_PROFILE");
        assert!(name.expected_shape().is_none());
    }

    #[test]
    fn test_shape_check() {
        assert!(CommandName::SoftScanTrigger.accepts(&"TOGGLE_SCANNING".into()));
        assert!(!CommandName::SoftScanTrigger.accepts(&ParameterValue::empty_map()));
        assert!(CommandName::SetConfig.accepts(&ParameterValue::empty_map()));
        assert!(!CommandName::SetConfig.accepts(&"profile".into()));
    }
}
