//! UI-facing surface of the bridge
//!
//! Exactly two primitives reach the UI layer: method invocation by name on the
//! command channel, and the scan event stream.

use std::pin::Pin;
use std::sync::Arc;

use futures::{future, Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::BridgeConfig;
use crate::error::MethodError;
use crate::profile::ProfileConfigurator;
use crate::receiver::{BridgeEvent, EventReceiver, EventStream};
use crate::sender::CommandSender;
use crate::transport::HostTransport;

/// Methods the command channel understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeMethod {
    SendCommandString,
    CreateProfile,
}

impl BridgeMethod {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sendDataWedgeCommandStringParameter" => Some(Self::SendCommandString),
            "createDataWedgeProfile" => Some(Self::CreateProfile),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SendCommandString => "sendDataWedgeCommandStringParameter",
            Self::CreateProfile => "createDataWedgeProfile",
        }
    }
}

/// Outcome of a method call
///
/// `Accepted` only means the command left the bridge; the host never confirms
/// synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodResponse {
    Accepted,
    NotImplemented,
}

#[derive(Debug, Deserialize)]
struct CommandStringArgs {
    command: String,
    parameter: String,
}

/// Scan events as UI-layer JSON objects `{scanData, symbology, dateTime}`
pub type ScanEventStream = Pin<Box<dyn Stream<Item = Value> + Send>>;

/// Dispatches UI method calls and exposes the scan stream
pub struct BridgeFacade {
    sender: CommandSender,
    configurator: ProfileConfigurator,
    receiver: EventReceiver,
    package_name: String,
}

impl BridgeFacade {
    pub fn new(transport: Arc<dyn HostTransport>, config: &BridgeConfig) -> Self {
        let sender = CommandSender::new(transport.clone(), config.host.clone());
        let configurator = ProfileConfigurator::new(sender.clone(), config);
        let receiver = EventReceiver::new(transport, config);

        Self {
            sender,
            configurator,
            receiver,
            package_name: config.package_name.clone(),
        }
    }

    pub fn sender(&self) -> &CommandSender {
        &self.sender
    }

    pub fn configurator(&self) -> &ProfileConfigurator {
        &self.configurator
    }

    pub fn receiver(&self) -> &EventReceiver {
        &self.receiver
    }

    /// Invoke a command-channel method by name
    ///
    /// Unknown names answer [`MethodResponse::NotImplemented`].
    pub async fn invoke_command(
        &self,
        method: &str,
        arguments: &Value,
    ) -> Result<MethodResponse, MethodError> {
        let Some(known) = BridgeMethod::from_name(method) else {
            debug!(%method, "Method not implemented");
            return Ok(MethodResponse::NotImplemented);
        };

        match known {
            BridgeMethod::SendCommandString => {
                let args = parse_command_args(arguments)?;
                self.sender
                    .send_text(&args.command, &args.parameter, false)
                    .await;
            }
            BridgeMethod::CreateProfile => {
                let profile_name = arguments.as_str().ok_or_else(|| invalid(
                    known,
                    "expected the profile name as a string".to_string(),
                ))?;
                self.configurator
                    .configure(profile_name, &self.package_name)
                    .await
                    .map_err(|e| invalid(known, e.to_string()))?;
            }
        }

        Ok(MethodResponse::Accepted)
    }

    /// Subscribe to decodes
    ///
    /// Host notifications other than decodes are dropped here.
    pub async fn subscribe_scans(&self) -> ScanEventStream {
        let events: EventStream = self.receiver.subscribe().await;
        events
            .filter_map(|event| {
                future::ready(match event {
                    BridgeEvent::Scan(scan) => Some(scan.to_value()),
                    BridgeEvent::HostNotification(message) => {
                        debug!(action = %message.action, "Unhandled host notification");
                        None
                    }
                })
            })
            .boxed()
    }

    /// Cancel the scan subscription; a no-op when not subscribed
    pub async fn unsubscribe_scans(&self) {
        self.receiver.unsubscribe().await
    }
}

fn invalid(method: BridgeMethod, reason: String) -> MethodError {
    warn!(method = method.name(), %reason, "Rejected method arguments");
    MethodError::InvalidArguments {
        method: method.name().to_string(),
        reason,
    }
}

/// Arguments arrive either as a JSON object or as a string holding one
fn parse_command_args(arguments: &Value) -> Result<CommandStringArgs, MethodError> {
    let parsed = match arguments {
        Value::String(raw) => serde_json::from_str(raw),
        other => CommandStringArgs::deserialize(other),
    };
    parsed.map_err(|e| invalid(BridgeMethod::SendCommandString, e.to_string()))
}
