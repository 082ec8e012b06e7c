//! In-process broadcast bus

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dw_core::HostMessage;
use tokio::sync::broadcast;

use super::{HostTransport, TransportError};
use crate::config::BusConfig;

/// Broadcast bus shared by the bridge and the host service
///
/// Every published message is delivered to every registered listener in
/// publication order, like a platform broadcast.
pub struct IntentBus {
    config: BusConfig,
    connected: AtomicBool,
    tx: broadcast::Sender<HostMessage>,
}

impl IntentBus {
    pub fn new(config: &BusConfig) -> Self {
        let (tx, _) = broadcast::channel(config.capacity.max(1));
        Self {
            config: config.clone(),
            connected: AtomicBool::new(true),
            tx,
        }
    }

    /// Publish a message synchronously, returning how many listeners got it
    ///
    /// Used by the host side to deliver notifications.
    pub fn publish(&self, message: HostMessage) -> usize {
        if !self.connected.load(Ordering::SeqCst) {
            return 0;
        }
        match self.tx.send(message) {
            Ok(n) => n,
            Err(broadcast::error::SendError(message)) => {
                tracing::debug!(action = %message.action, "No listeners for broadcast");
                0
            }
        }
    }

    /// Set connection state
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

#[async_trait]
impl HostTransport for IntentBus {
    async fn send(&self, message: HostMessage) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectionClosed);
        }

        // Simulate delivery latency
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        let action = message.action.clone();
        let delivered = self.publish(message);
        tracing::debug!(%action, delivered, "Bus: published message");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<HostMessage> {
        self.tx.subscribe()
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_reaches_every_listener_in_order() {
        let bus = IntentBus::new(&BusConfig::default());
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.send(HostMessage::new("first")).await.unwrap();
        bus.send(HostMessage::new("second")).await.unwrap();

        for rx in [&mut a, &mut b] {
            assert_eq!(rx.recv().await.unwrap().action, "first");
            assert_eq!(rx.recv().await.unwrap().action, "second");
        }
    }

    #[tokio::test]
    async fn test_send_without_listeners_is_silent() {
        let bus = IntentBus::new(&BusConfig::default());
        assert!(bus.send(HostMessage::new("nobody")).await.is_ok());
        assert_eq!(bus.publish(HostMessage::new("nobody")), 0);
    }

    #[tokio::test]
    async fn test_disconnected_bus_rejects_send() {
        let bus = IntentBus::new(&BusConfig::default());
        let _rx = bus.subscribe();
        bus.set_connected(false);

        assert!(!bus.is_connected().await);
        assert!(matches!(
            bus.send(HostMessage::new("x")).await,
            Err(TransportError::ConnectionClosed)
        ));
        assert_eq!(bus.publish(HostMessage::new("x")), 0);
    }

    #[test]
    fn test_listener_count_tracks_receivers() {
        let bus = IntentBus::new(&BusConfig::default());
        let rx = bus.subscribe();
        assert_eq!(bus.listener_count(), 1);
        drop(rx);
        assert_eq!(bus.listener_count(), 0);
    }
}
