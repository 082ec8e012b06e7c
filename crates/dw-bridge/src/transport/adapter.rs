//! Transport adapter trait

use async_trait::async_trait;
use dw_core::HostMessage;
use tokio::sync::broadcast;

use super::TransportError;

/// Delivery-agnostic interface to the host service's broadcast channel
///
/// Sending is fire-and-forget: a successful return only means the message was
/// handed to the delivery mechanism, never that the host acted on it.
#[async_trait]
pub trait HostTransport: Send + Sync {
    /// Publish one message
    async fn send(&self, message: HostMessage) -> Result<(), TransportError>;

    /// Register a listener for every broadcast published on the transport
    ///
    /// Dropping the receiver releases the registration.
    fn subscribe(&self) -> broadcast::Receiver<HostMessage>;

    /// Check if the transport accepts messages
    async fn is_connected(&self) -> bool;

    /// Number of live listener registrations
    fn listener_count(&self) -> usize;
}
