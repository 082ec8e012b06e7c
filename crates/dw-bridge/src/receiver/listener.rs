//! Registration lifecycle and message decoding

use std::sync::Arc;

use dw_core::message::names;
use dw_core::{HostMessage, IntentFilter, ScanRecord};
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{BridgeEvent, EventStream};
use crate::config::BridgeConfig;
use crate::transport::HostTransport;

/// A live listener registration on the transport
struct Registration {
    id: String,
    handle: JoinHandle<()>,
}

/// Subscribes to scan and command-result notifications
///
/// Holds at most one registration. States: unsubscribed (no registration)
/// and subscribed.
pub struct EventReceiver {
    transport: Arc<dyn HostTransport>,
    filter: IntentFilter,
    scan_action: String,
    registration: Mutex<Option<Registration>>,
}

impl EventReceiver {
    pub fn new(transport: Arc<dyn HostTransport>, config: &BridgeConfig) -> Self {
        let filter = IntentFilter::new()
            .add_action(&config.scan_action)
            .add_action(&config.host.result_action)
            .add_category(&config.host.result_category);

        Self {
            transport,
            filter,
            scan_action: config.scan_action.clone(),
            registration: Mutex::new(None),
        }
    }

    /// Filter registered on subscribe
    pub fn filter(&self) -> &IntentFilter {
        &self.filter
    }

    pub fn is_subscribed(&self) -> bool {
        self.registration.lock().is_some()
    }

    /// Register with the transport and return the event stream
    ///
    /// Messages published after this returns are delivered in order. A
    /// previous registration is released first: its stream ends and its
    /// transport listener is gone when this returns.
    pub async fn subscribe(&self) -> EventStream {
        let previous = self.registration.lock().take();
        if let Some(previous) = previous {
            warn!(
                registration_id = %previous.id,
                "Subscribed while already subscribed; releasing previous registration"
            );
            Self::release(previous).await;
        }

        let incoming = self.transport.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4().to_string();

        let handle = tokio::spawn(Self::listen(
            incoming,
            tx,
            self.filter.clone(),
            self.scan_action.clone(),
        ));

        let displaced = self.registration.lock().replace(Registration {
            id: id.clone(),
            handle,
        });
        if let Some(displaced) = displaced {
            // Concurrent subscribe won the slot first
            displaced.handle.abort();
        }

        info!(registration_id = %id, actions = ?self.filter.actions, "Event receiver subscribed");
        EventStream::new(id, rx)
    }

    /// Release the registration
    ///
    /// The transport listener is gone when this returns. Calling it while
    /// unsubscribed does nothing.
    pub async fn unsubscribe(&self) {
        let registration = self.registration.lock().take();
        let Some(registration) = registration else {
            debug!("Unsubscribe without registration; ignoring");
            return;
        };

        let id = registration.id.clone();
        Self::release(registration).await;
        info!(registration_id = %id, "Event receiver unsubscribed");
    }

    async fn release(registration: Registration) {
        registration.handle.abort();
        // Wait for the task to drop its transport receiver
        let _ = registration.handle.await;
    }

    async fn listen(
        mut incoming: broadcast::Receiver<HostMessage>,
        tx: mpsc::UnboundedSender<BridgeEvent>,
        filter: IntentFilter,
        scan_action: String,
    ) {
        loop {
            match incoming.recv().await {
                Ok(message) => {
                    if !filter.matches(&message) {
                        continue;
                    }
                    let event = decode(message, &scan_action);
                    if tx.send(event).is_err() {
                        debug!("Event stream dropped by consumer");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "Event receiver lagged; notifications lost");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("Transport closed");
                    break;
                }
            }
        }
    }
}

impl Drop for EventReceiver {
    fn drop(&mut self) {
        if let Some(registration) = self.registration.lock().take() {
            registration.handle.abort();
        }
    }
}

/// Turn a matching message into an event
///
/// Decodes are stamped with the receipt time. Missing scan extras become
/// empty strings.
fn decode(message: HostMessage, scan_action: &str) -> BridgeEvent {
    if message.action != scan_action {
        return BridgeEvent::HostNotification(message);
    }

    let data = message.text_extra(names::EXTRA_SCAN_DATA).unwrap_or_default();
    let symbology = message
        .text_extra(names::EXTRA_SCAN_LABEL_TYPE)
        .unwrap_or_default();
    debug!(%symbology, len = data.len(), "Decode received");
    BridgeEvent::Scan(ScanRecord::captured_now(data, symbology))
}
