//! Command sender
//!
//! Builds one inbox message per command and hands it to the transport. There
//! is no synchronous response: the host replies, if at all, on the result
//! action, which the event receiver picks up.

use std::sync::Arc;

use dw_core::message::names;
use dw_core::{Command, CommandName, HostMessage, ParameterValue};
use tracing::{debug, warn};

use crate::config::HostEndpoints;
use crate::transport::HostTransport;

/// Sends commands to the host inbox
#[derive(Clone)]
pub struct CommandSender {
    transport: Arc<dyn HostTransport>,
    endpoints: HostEndpoints,
}

impl CommandSender {
    pub fn new(transport: Arc<dyn HostTransport>, endpoints: HostEndpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Build the inbox message for a command
    ///
    /// The command's wire key maps to the parameter; `request_ack` adds the
    /// `SEND_RESULT` flag.
    pub fn build_message(
        &self,
        command: &CommandName,
        parameter: ParameterValue,
        request_ack: bool,
    ) -> HostMessage {
        let mut message =
            HostMessage::new(&self.endpoints.inbox_action).with_extra(command.key(), parameter);
        if request_ack {
            message = message.with_extra(names::EXTRA_SEND_RESULT, "true");
        }
        message
    }

    /// Send a command, fire-and-forget
    ///
    /// Never fails locally: transport errors and malformed parameters are
    /// logged, and the host ignores or rejects bad requests out-of-band.
    pub async fn send(&self, command: CommandName, parameter: ParameterValue, request_ack: bool) {
        if !command.accepts(&parameter) {
            warn!(
                %command,
                kind = parameter.kind(),
                "Parameter shape does not match command; sending anyway"
            );
        }

        let message = self.build_message(&command, parameter, request_ack);
        match self.transport.send(message).await {
            Ok(()) => debug!(%command, request_ack, "Command sent"),
            Err(e) => warn!(%command, error = %e, "Command dropped by transport"),
        }
    }

    pub async fn send_command(&self, command: Command, request_ack: bool) {
        self.send(command.name, command.parameter, request_ack).await
    }

    /// Send a string parameter under a raw wire key
    pub async fn send_text(&self, key: &str, parameter: &str, request_ack: bool) {
        self.send(CommandName::from_key(key), parameter.into(), request_ack)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BusConfig;
    use crate::transport::IntentBus;

    fn sender() -> (Arc<IntentBus>, CommandSender) {
        let bus = Arc::new(IntentBus::new(&BusConfig::default()));
        let sender = CommandSender::new(bus.clone(), HostEndpoints::default());
        (bus, sender)
    }

    #[tokio::test]
    async fn test_send_text_addresses_host_inbox() {
        let (bus, sender) = sender();
        let mut rx = bus.subscribe();

        sender
            .send_text(
                "com.symbol.datawedge.api.SOFT_SCAN_TRIGGER",
                "TOGGLE_SCANNING",
                false,
            )
            .await;

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.action, "com.symbol.datawedge.api.ACTION");
        assert_eq!(
            msg.text_extra("com.symbol.datawedge.api.SOFT_SCAN_TRIGGER"),
            Some("TOGGLE_SCANNING")
        );
        assert!(msg.extra(names::EXTRA_SEND_RESULT).is_none());
        assert_eq!(msg.extras.len(), 1);
    }

    #[tokio::test]
    async fn test_request_ack_sets_flag() {
        let (bus, sender) = sender();
        let mut rx = bus.subscribe();

        sender
            .send(CommandName::GetActiveProfile, "".into(), true)
            .await;

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.text_extra(names::EXTRA_SEND_RESULT), Some("true"));
    }

    #[tokio::test]
    async fn test_mismatched_shape_is_still_sent() {
        let (bus, sender) = sender();
        let mut rx = bus.subscribe();

        sender
            .send(CommandName::SetConfig, "not-a-bundle".into(), false)
            .await;

        let msg = rx.recv().await.unwrap();
        assert_eq!(
            msg.text_extra("com.symbol.datawedge.api.SET_CONFIG"),
            Some("not-a-bundle")
        );
    }

    #[tokio::test]
    async fn test_closed_transport_is_silent() {
        let (bus, sender) = sender();
        bus.set_connected(false);

        // Must not panic or return an error
        sender
            .send_command(Command::new(CommandName::CreateProfile, "p"), false)
            .await;
    }
}
