//! Parameter trees handed to the host scanning service
//!
//! The host API accepts loosely typed nested bundles: string-keyed maps whose
//! values are strings, lists or further maps. [`ParameterValue`] makes that
//! structure explicit so every tree can be serialized.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A string-keyed parameter map (flat or nested)
pub type ParameterSet = BTreeMap<String, ParameterValue>;

/// A single node of a parameter tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// Scalar value. The host API encodes booleans and numbers as strings.
    Text(String),
    /// Ordered list (e.g. `APP_LIST`, `ACTIVITY_LIST`)
    List(Vec<ParameterValue>),
    /// Nested bundle (e.g. `PLUGIN_CONFIG`, `PARAM_LIST`)
    Map(ParameterSet),
}

impl ParameterValue {
    /// An empty nested bundle
    pub fn empty_map() -> Self {
        Self::Map(ParameterSet::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ParameterValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ParameterSet> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a map
    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Short name of the variant, used in log output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Convert to a JSON value (strings, arrays and objects only)
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(ParameterValue::to_json).collect())
            }
            Self::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<ParameterValue>> for ParameterValue {
    fn from(items: Vec<ParameterValue>) -> Self {
        Self::List(items)
    }
}

impl From<ParameterSet> for ParameterValue {
    fn from(map: ParameterSet) -> Self {
        Self::Map(map)
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}
