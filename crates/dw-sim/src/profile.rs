//! Profile state kept by the simulated host

use std::collections::BTreeMap;

use dw_bridge::profile::keys;
use dw_bridge::IntentDelivery;
use dw_core::{ParameterSet, ParameterValue};

/// Application bound to a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppBinding {
    pub package_name: String,
    pub activities: Vec<String>,
}

/// A profile as the host stores it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileState {
    pub name: String,
    pub enabled: bool,
    /// Plugin parameters by plugin name (`BARCODE`, `INTENT`, ...)
    pub plugins: BTreeMap<String, ParameterSet>,
    pub apps: Vec<AppBinding>,
}

impl ProfileState {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: false,
            plugins: BTreeMap::new(),
            apps: Vec::new(),
        }
    }

    pub fn plugin(&self, name: &str) -> Option<&ParameterSet> {
        self.plugins.get(name)
    }

    /// Action decodes are broadcast on, if intent output is enabled with
    /// broadcast delivery
    pub fn intent_route(&self) -> Option<&str> {
        let params = self.plugin("INTENT")?;
        let text = |key: &str| params.get(key).and_then(ParameterValue::as_text);

        let enabled = text(keys::INTENT_OUTPUT_ENABLED) == Some("true");
        let broadcast = text(keys::INTENT_DELIVERY).and_then(IntentDelivery::from_code)
            == Some(IntentDelivery::Broadcast);
        if self.enabled && enabled && broadcast {
            text(keys::INTENT_ACTION)
        } else {
            None
        }
    }

    pub fn is_bound_to(&self, package_name: &str) -> bool {
        self.apps.iter().any(|a| a.package_name == package_name)
    }

    /// Apply the body of a SET_CONFIG bundle (everything except the mode)
    ///
    /// Returns the host's result code on rejection.
    pub fn apply(&mut self, bundle: &ParameterSet) -> Result<(), &'static str> {
        if let Some(enabled) = bundle.get(keys::PROFILE_ENABLED) {
            self.enabled = enabled.as_text() == Some("true");
        }

        if let Some(plugin) = bundle.get(keys::PLUGIN_CONFIG) {
            let plugin = plugin.as_map().ok_or("PLUGIN_BUNDLE_INVALID")?;
            let name = plugin
                .get(keys::PLUGIN_NAME)
                .and_then(ParameterValue::as_text)
                .ok_or("PLUGIN_NAME_EMPTY")?;
            let reset = plugin
                .get(keys::RESET_CONFIG)
                .and_then(ParameterValue::as_text)
                .map_or(true, |r| r == "true");
            let params = match plugin.get(keys::PARAM_LIST) {
                Some(ParameterValue::Map(params)) => params.clone(),
                Some(_) => return Err("PARAM_LIST_INVALID"),
                None => ParameterSet::new(),
            };

            let entry = self.plugins.entry(name.to_string()).or_default();
            if reset {
                entry.clear();
            }
            entry.extend(params);
        }

        if let Some(apps) = bundle.get(keys::APP_LIST) {
            let apps = apps.as_list().ok_or("APP_LIST_INVALID")?;
            self.apps = apps
                .iter()
                .map(parse_app)
                .collect::<Option<Vec<_>>>()
                .ok_or("APP_LIST_INVALID")?;
        }

        Ok(())
    }
}

fn parse_app(value: &ParameterValue) -> Option<AppBinding> {
    let package_name = value.get(keys::PACKAGE_NAME)?.as_text()?.to_string();
    let activities = match value.get(keys::ACTIVITY_LIST) {
        Some(list) => list
            .as_list()?
            .iter()
            .map(|a| a.as_text().map(str::to_string))
            .collect::<Option<Vec<_>>>()?,
        None => vec!["*".to_string()],
    };
    Some(AppBinding {
        package_name,
        activities,
    })
}
