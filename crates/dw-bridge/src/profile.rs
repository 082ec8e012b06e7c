//! Profile configurator
//!
//! Registers the application with the host service under a named profile.
//! Some host versions accept only one plugin per `SET_CONFIG`, so the barcode
//! and intent-output plugins go out as two commands against the same profile.
//!
//! Nothing here waits for the host: commands are sent back to back and
//! partial failure cannot be detected by the caller. With acknowledgements
//! enabled the host's results show up on the event stream, but the sequence
//! itself still does not wait for them.

use dw_core::{Command, CommandName, ParameterSet, ParameterValue};
use tracing::info;

use crate::config::{BridgeConfig, IntentDelivery};
use crate::error::ProfileError;
use crate::sender::CommandSender;

/// Bundle keys of a `SET_CONFIG` payload
pub mod keys {
    pub const PROFILE_NAME: &str = "PROFILE_NAME";
    pub const PROFILE_ENABLED: &str = "PROFILE_ENABLED";
    pub const CONFIG_MODE: &str = "CONFIG_MODE";
    pub const PLUGIN_CONFIG: &str = "PLUGIN_CONFIG";
    pub const PLUGIN_NAME: &str = "PLUGIN_NAME";
    pub const RESET_CONFIG: &str = "RESET_CONFIG";
    pub const PARAM_LIST: &str = "PARAM_LIST";
    pub const APP_LIST: &str = "APP_LIST";
    pub const PACKAGE_NAME: &str = "PACKAGE_NAME";
    pub const ACTIVITY_LIST: &str = "ACTIVITY_LIST";
    pub const INTENT_OUTPUT_ENABLED: &str = "intent_output_enabled";
    pub const INTENT_ACTION: &str = "intent_action";
    pub const INTENT_DELIVERY: &str = "intent_delivery";
}

/// How the host applies a `SET_CONFIG`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigMode {
    #[default]
    Update,
    CreateIfNotExist,
    Overwrite,
}

impl ConfigMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "UPDATE",
            Self::CreateIfNotExist => "CREATE_IF_NOT_EXIST",
            Self::Overwrite => "OVERWRITE",
        }
    }

    pub fn parse(mode: &str) -> Option<Self> {
        match mode {
            "UPDATE" => Some(Self::Update),
            "CREATE_IF_NOT_EXIST" => Some(Self::CreateIfNotExist),
            "OVERWRITE" => Some(Self::Overwrite),
            _ => None,
        }
    }
}

/// One plugin subsection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub plugin_name: String,
    pub reset_config: bool,
    pub params: ParameterSet,
}

impl PluginConfig {
    /// Barcode input plugin reset to defaults
    pub fn barcode_reset() -> Self {
        Self {
            plugin_name: "BARCODE".to_string(),
            reset_config: true,
            params: ParameterSet::new(),
        }
    }

    /// Intent output plugin delivering decodes on `action`
    pub fn intent_output(action: &str, delivery: IntentDelivery) -> Self {
        let mut params = ParameterSet::new();
        params.insert(keys::INTENT_OUTPUT_ENABLED.into(), "true".into());
        params.insert(keys::INTENT_ACTION.into(), action.into());
        params.insert(keys::INTENT_DELIVERY.into(), delivery.code().into());
        Self {
            plugin_name: "INTENT".to_string(),
            reset_config: true,
            params,
        }
    }

    pub fn to_parameter(&self) -> ParameterValue {
        let mut bundle = ParameterSet::new();
        bundle.insert(keys::PLUGIN_NAME.into(), self.plugin_name.as_str().into());
        bundle.insert(keys::RESET_CONFIG.into(), self.reset_config.into());
        bundle.insert(keys::PARAM_LIST.into(), self.params.clone().into());
        bundle.into()
    }
}

/// Association of the profile with an application package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppAssociation {
    pub package_name: String,
    pub activities: Vec<String>,
}

impl AppAssociation {
    /// Every activity of `package_name`
    pub fn all_activities(package_name: &str) -> Self {
        Self {
            package_name: package_name.to_string(),
            activities: vec!["*".to_string()],
        }
    }

    pub fn to_parameter(&self) -> ParameterValue {
        let mut bundle = ParameterSet::new();
        bundle.insert(keys::PACKAGE_NAME.into(), self.package_name.as_str().into());
        bundle.insert(
            keys::ACTIVITY_LIST.into(),
            self.activities
                .iter()
                .map(|a| ParameterValue::from(a.as_str()))
                .collect::<Vec<_>>()
                .into(),
        );
        bundle.into()
    }
}

/// Profile payload, built up one plugin at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    pub name: String,
    pub enabled: bool,
    pub config_mode: ConfigMode,
    pub plugin: Option<PluginConfig>,
    pub apps: Vec<AppAssociation>,
}

impl ProfileConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            config_mode: ConfigMode::Update,
            plugin: None,
            apps: Vec::new(),
        }
    }

    pub fn with_plugin(mut self, plugin: PluginConfig) -> Self {
        self.plugin = Some(plugin);
        self
    }

    pub fn with_app(mut self, app: AppAssociation) -> Self {
        self.apps.push(app);
        self
    }

    /// Remove the plugin subsection, keeping identity and app list
    pub fn take_plugin(&mut self) -> Option<PluginConfig> {
        self.plugin.take()
    }

    /// Build the `SET_CONFIG` bundle
    pub fn to_set_config(&self) -> Result<ParameterValue, ProfileError> {
        let plugin = self
            .plugin
            .as_ref()
            .ok_or_else(|| ProfileError::MissingPlugin(self.name.clone()))?;

        let mut bundle = ParameterSet::new();
        bundle.insert(keys::PROFILE_NAME.into(), self.name.as_str().into());
        bundle.insert(keys::PROFILE_ENABLED.into(), self.enabled.into());
        bundle.insert(keys::CONFIG_MODE.into(), self.config_mode.as_str().into());
        bundle.insert(keys::PLUGIN_CONFIG.into(), plugin.to_parameter());
        if !self.apps.is_empty() {
            bundle.insert(
                keys::APP_LIST.into(),
                self.apps
                    .iter()
                    .map(AppAssociation::to_parameter)
                    .collect::<Vec<_>>()
                    .into(),
            );
        }
        Ok(bundle.into())
    }
}

/// One step of the configuration sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileStep {
    /// Create the profile by name
    Create(String),
    /// Apply a `SET_CONFIG` payload
    SetConfig(ParameterValue),
    /// Local edit: the plugin subsection was dropped from the payload
    RemovePlugin,
}

impl ProfileStep {
    /// Outbound command for this step, `None` for local edits
    pub fn command(&self) -> Option<Command> {
        match self {
            Self::Create(name) => Some(Command::new(CommandName::CreateProfile, name.as_str())),
            Self::SetConfig(payload) => Some(Command::new(CommandName::SetConfig, payload.clone())),
            Self::RemovePlugin => None,
        }
    }
}

/// Issues the profile configuration sequence
#[derive(Clone)]
pub struct ProfileConfigurator {
    sender: CommandSender,
    scan_action: String,
    delivery: IntentDelivery,
    request_ack: bool,
}

impl ProfileConfigurator {
    pub fn new(sender: CommandSender, config: &BridgeConfig) -> Self {
        Self {
            sender,
            scan_action: config.scan_action.clone(),
            delivery: config.intent_delivery,
            request_ack: config.request_acknowledgements,
        }
    }

    /// Attach `SEND_RESULT` to every command of the sequence
    pub fn with_acknowledgements(mut self, request_ack: bool) -> Self {
        self.request_ack = request_ack;
        self
    }

    /// The four steps for `profile_name`, without sending anything
    pub fn plan(
        &self,
        profile_name: &str,
        package_name: &str,
    ) -> Result<Vec<ProfileStep>, ProfileError> {
        let mut profile = ProfileConfig::new(profile_name)
            .with_plugin(PluginConfig::barcode_reset())
            .with_app(AppAssociation::all_activities(package_name));

        let mut steps = vec![
            ProfileStep::Create(profile_name.to_string()),
            ProfileStep::SetConfig(profile.to_set_config()?),
        ];

        profile.take_plugin();
        steps.push(ProfileStep::RemovePlugin);

        let profile = profile.with_plugin(PluginConfig::intent_output(
            &self.scan_action,
            self.delivery,
        ));
        steps.push(ProfileStep::SetConfig(profile.to_set_config()?));

        Ok(steps)
    }

    /// Create and configure `profile_name` for `package_name`
    pub async fn configure(
        &self,
        profile_name: &str,
        package_name: &str,
    ) -> Result<(), ProfileError> {
        let steps = self.plan(profile_name, package_name)?;
        for step in &steps {
            if let Some(command) = step.command() {
                self.sender.send_command(command, self.request_ack).await;
            }
        }

        info!(
            profile = %profile_name,
            package = %package_name,
            request_ack = self.request_ack,
            "Profile configuration sent"
        );
        Ok(())
    }
}
