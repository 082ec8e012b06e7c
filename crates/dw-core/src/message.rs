//! Broadcast message envelope exchanged with the host service
//!
//! Messages mirror the platform's broadcast intents: an action naming the
//! addressed channel, a set of categories and a bundle of extras.

use serde::{Deserialize, Serialize};

use crate::parameter::{ParameterSet, ParameterValue};

/// Well-known action, category and extra names used by the host service
pub mod names {
    /// Inbox action the host service listens on for commands
    pub const HOST_INBOX_ACTION: &str = "com.symbol.datawedge.api.ACTION";
    /// Action the host service uses for command results
    pub const HOST_RESULT_ACTION: &str = "com.symbol.datawedge.api.RESULT_ACTION";
    /// Category attached to command results
    pub const DEFAULT_CATEGORY: &str = "android.intent.category.DEFAULT";
    /// Extra asking the host to report a command result
    pub const EXTRA_SEND_RESULT: &str = "SEND_RESULT";
    /// Decoded payload of a scan
    pub const EXTRA_SCAN_DATA: &str = "com.symbol.datawedge.data_string";
    /// Symbology of a scan
    pub const EXTRA_SCAN_LABEL_TYPE: &str = "com.symbol.datawedge.label_type";
}

/// A single broadcast message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostMessage {
    pub action: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub extras: ParameterSet,
}

impl HostMessage {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn extra(&self, key: &str) -> Option<&ParameterValue> {
        self.extras.get(key)
    }

    /// String extra, `None` if absent or not a string
    pub fn text_extra(&self, key: &str) -> Option<&str> {
        self.extra(key).and_then(ParameterValue::as_text)
    }
}

/// Registration filter, matched the way the platform matches intent filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentFilter {
    pub actions: Vec<String>,
    pub categories: Vec<String>,
}

impl IntentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn add_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// A message matches when its action is registered and every one of its
    /// categories is registered too.
    pub fn matches(&self, message: &HostMessage) -> bool {
        self.actions.iter().any(|a| *a == message.action)
            && message
                .categories
                .iter()
                .all(|c| self.categories.iter().any(|own| own == c))
    }
}
