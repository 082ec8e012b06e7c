//! Simulated host service

use std::collections::BTreeMap;
use std::sync::Arc;

use dw_bridge::profile::keys;
use dw_bridge::{ConfigMode, HostTransport, IntentBus};
use dw_core::message::names;
use dw_core::{CommandName, HostMessage, ParameterSet, ParameterValue};
use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::profile::ProfileState;

/// Extra carrying a caller-chosen id echoed back in results
pub const EXTRA_COMMAND_IDENTIFIER: &str = "COMMAND_IDENTIFIER";

/// Prefix of query reply extras (`...RESULT_GET_ACTIVE_PROFILE`)
const RESULT_KEY_PREFIX: &str = "com.symbol.datawedge.api.RESULT_";

#[derive(Debug, Default)]
struct HostState {
    profiles: BTreeMap<String, ProfileState>,
    active_profile: Option<String>,
    scanner_enabled: bool,
    /// Decode delivered on the next soft trigger
    pending_scan: Option<(String, String)>,
}

/// Outcome of one command: reply extras for queries, or a failure code
type CommandOutcome = Result<Option<(String, ParameterValue)>, &'static str>;

/// The simulated service, listening on an [`IntentBus`]
pub struct SimulatedHost {
    bus: Arc<IntentBus>,
    state: Arc<RwLock<HostState>>,
    processed: watch::Receiver<u64>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedHost {
    /// Start listening on `bus`
    ///
    /// Commands published after this returns are processed in order.
    pub fn spawn(bus: Arc<IntentBus>, config: SimConfig) -> Self {
        let state = Arc::new(RwLock::new(HostState {
            scanner_enabled: true,
            ..Default::default()
        }));
        let (processed_tx, processed) = watch::channel(0u64);

        let incoming = bus.subscribe();
        let worker = Worker {
            bus: bus.clone(),
            state: state.clone(),
            config,
            processed: processed_tx,
        };
        let handle = tokio::spawn(worker.run(incoming));

        info!("Simulated host service started");
        Self {
            bus,
            state,
            processed,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Deliver a decode through the profile's intent output
    ///
    /// Uses the active profile if it routes decodes, else the first enabled
    /// profile that does. Returns whether the decode was broadcast.
    pub fn emit_scan(&self, data: &str, symbology: &str) -> bool {
        let action = {
            let state = self.state.read();
            if !state.scanner_enabled {
                debug!("Scanner input disabled; decode dropped");
                return false;
            }
            route(&state)
        };

        let Some(action) = action else {
            debug!("No profile routes decodes; decode dropped");
            return false;
        };

        let message = HostMessage::new(&action)
            .with_extra(names::EXTRA_SCAN_DATA, data)
            .with_extra(names::EXTRA_SCAN_LABEL_TYPE, symbology);
        self.bus.publish(message);
        debug!(%action, %symbology, "Decode delivered");
        true
    }

    /// Queue the decode produced by the next soft scan trigger
    pub fn queue_scan(&self, data: &str, symbology: &str) {
        self.state.write().pending_scan = Some((data.to_string(), symbology.to_string()));
    }

    pub fn profile(&self, name: &str) -> Option<ProfileState> {
        self.state.read().profiles.get(name).cloned()
    }

    pub fn profiles(&self) -> Vec<ProfileState> {
        self.state.read().profiles.values().cloned().collect()
    }

    pub fn active_profile(&self) -> Option<String> {
        self.state.read().active_profile.clone()
    }

    pub fn scanner_enabled(&self) -> bool {
        self.state.read().scanner_enabled
    }

    /// Number of inbox messages handled so far
    pub fn processed(&self) -> u64 {
        *self.processed.borrow()
    }

    /// Wait until at least `count` inbox messages have been handled
    pub async fn wait_processed(&self, count: u64) {
        let mut processed = self.processed.clone();
        // Only fails if the worker is gone, in which case nothing will change
        let _ = processed.wait_for(|n| *n >= count).await;
    }

    /// Stop listening
    pub async fn shutdown(&self) {
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
            info!("Simulated host service stopped");
        }
    }
}

impl Drop for SimulatedHost {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
    }
}

fn route(state: &HostState) -> Option<String> {
    let active = state
        .active_profile
        .as_ref()
        .and_then(|name| state.profiles.get(name))
        .and_then(ProfileState::intent_route);

    active
        .or_else(|| state.profiles.values().find_map(ProfileState::intent_route))
        .map(str::to_string)
}

struct Worker {
    bus: Arc<IntentBus>,
    state: Arc<RwLock<HostState>>,
    config: SimConfig,
    processed: watch::Sender<u64>,
}

impl Worker {
    async fn run(self, mut incoming: broadcast::Receiver<HostMessage>) {
        loop {
            match incoming.recv().await {
                Ok(message) => {
                    if message.action != self.config.endpoints.inbox_action {
                        continue;
                    }
                    self.handle_message(&message);
                    self.processed.send_modify(|n| *n += 1);
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "Simulated host lagged; commands lost");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    fn handle_message(&self, message: &HostMessage) {
        let send_result = message.text_extra(names::EXTRA_SEND_RESULT) == Some("true");
        let identifier = message.text_extra(EXTRA_COMMAND_IDENTIFIER);

        for (key, parameter) in &message.extras {
            if key == names::EXTRA_SEND_RESULT || key == EXTRA_COMMAND_IDENTIFIER {
                continue;
            }

            let command = CommandName::from_key(key);
            let outcome = self.execute(&command, parameter);
            match &outcome {
                Ok(_) => debug!(%command, "Host command applied"),
                Err(code) => warn!(%command, %code, "Host command rejected"),
            }

            let mut reply = HostMessage::new(&self.config.endpoints.result_action)
                .with_category(&self.config.endpoints.result_category);
            let mut publish = false;

            if let Ok(Some((result_key, value))) = &outcome {
                reply = reply.with_extra(result_key.as_str(), value.clone());
                publish = true;
            }
            if send_result {
                reply = reply
                    .with_extra("COMMAND", key.as_str())
                    .with_extra("RESULT", if outcome.is_ok() { "SUCCESS" } else { "FAILURE" });
                if let Some(id) = identifier {
                    reply = reply.with_extra(EXTRA_COMMAND_IDENTIFIER, id);
                }
                if let Err(code) = outcome {
                    let mut info = ParameterSet::new();
                    info.insert("RESULT_CODE".into(), code.into());
                    reply = reply.with_extra("RESULT_INFO", info);
                }
                publish = true;
            }

            if publish {
                self.bus.publish(reply);
            }
        }
    }

    fn execute(&self, command: &CommandName, parameter: &ParameterValue) -> CommandOutcome {
        let text = parameter.as_text();
        let mut state = self.state.write();

        match command {
            CommandName::CreateProfile => {
                let name = text.filter(|n| !n.is_empty()).ok_or("PROFILE_NAME_EMPTY")?;
                if state.profiles.contains_key(name) {
                    return Err("PROFILE_ALREADY_EXISTS");
                }
                state
                    .profiles
                    .insert(name.to_string(), ProfileState::new(name));
                Ok(None)
            }
            CommandName::SetConfig => {
                let bundle = parameter.as_map().ok_or("BUNDLE_INVALID")?;
                let name = bundle
                    .get(keys::PROFILE_NAME)
                    .and_then(ParameterValue::as_text)
                    .filter(|n| !n.is_empty())
                    .ok_or("PROFILE_NAME_EMPTY")?;
                let mode = match bundle.get(keys::CONFIG_MODE) {
                    None => ConfigMode::default(),
                    Some(raw) => raw
                        .as_text()
                        .and_then(ConfigMode::parse)
                        .ok_or("CONFIG_MODE_INVALID")?,
                };

                let mut profile = match (mode, state.profiles.get(name)) {
                    (ConfigMode::Overwrite, _) | (ConfigMode::CreateIfNotExist, None) => {
                        ProfileState::new(name)
                    }
                    (ConfigMode::Update | ConfigMode::CreateIfNotExist, Some(existing)) => {
                        existing.clone()
                    }
                    (ConfigMode::Update, None) => return Err("PROFILE_NOT_FOUND"),
                };
                profile.apply(bundle)?;
                state.profiles.insert(name.to_string(), profile);
                Ok(None)
            }
            CommandName::SwitchToProfile => {
                let name = text.ok_or("PARAMETER_INVALID")?;
                if !state.profiles.contains_key(name) {
                    return Err("PROFILE_NOT_FOUND");
                }
                state.active_profile = Some(name.to_string());
                Ok(None)
            }
            CommandName::GetActiveProfile => {
                let active = state.active_profile.clone().unwrap_or_default();
                Ok(Some(result_extra(command, active.into())))
            }
            CommandName::EnumerateScanners => {
                let scanners = self
                    .config
                    .scanners
                    .iter()
                    .enumerate()
                    .map(|(index, scanner)| {
                        let mut entry = ParameterSet::new();
                        entry.insert("SCANNER_NAME".into(), scanner.name.as_str().into());
                        entry.insert("SCANNER_INDEX".into(), index.to_string().into());
                        entry.insert(
                            "SCANNER_IDENTIFIER".into(),
                            scanner.identifier.as_str().into(),
                        );
                        entry.insert("SCANNER_CONNECTION_STATE".into(), "true".into());
                        ParameterValue::Map(entry)
                    })
                    .collect::<Vec<_>>();
                Ok(Some(result_extra(command, scanners.into())))
            }
            CommandName::GetVersionInfo => {
                let mut info = ParameterSet::new();
                info.insert("DATAWEDGE".into(), self.config.version.as_str().into());
                Ok(Some(result_extra(command, info.into())))
            }
            CommandName::SoftScanTrigger => match text {
                Some("START_SCANNING") | Some("TOGGLE_SCANNING") => {
                    let pending = state.pending_scan.take();
                    let action = if state.scanner_enabled {
                        route(&state)
                    } else {
                        None
                    };
                    if let (Some((data, symbology)), Some(action)) = (pending, action) {
                        self.bus.publish(
                            HostMessage::new(&action)
                                .with_extra(names::EXTRA_SCAN_DATA, data)
                                .with_extra(names::EXTRA_SCAN_LABEL_TYPE, symbology),
                        );
                    }
                    Ok(None)
                }
                Some("STOP_SCANNING") => Ok(None),
                _ => Err("PARAMETER_INVALID"),
            },
            CommandName::ScannerInputPlugin => match text {
                Some("ENABLE_PLUGIN") => {
                    state.scanner_enabled = true;
                    Ok(None)
                }
                Some("DISABLE_PLUGIN") => {
                    state.scanner_enabled = false;
                    Ok(None)
                }
                _ => Err("PARAMETER_INVALID"),
            },
            CommandName::Custom(_) => Err("COMMAND_NOT_SUPPORTED"),
        }
    }
}

fn result_extra(command: &CommandName, value: ParameterValue) -> (String, ParameterValue) {
    (format!("{}{}", RESULT_KEY_PREFIX, command.short_name()), value)
}
