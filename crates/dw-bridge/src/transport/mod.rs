//! Transport layer between the bridge and the host service
//!
//! The host service is only reachable through broadcast messages. This module
//! abstracts that delivery mechanism:
//! - [`HostTransport`] is the seam every bridge component talks to
//! - [`IntentBus`] is an in-process broadcast bus used by the daemon, the
//!   simulated host and tests
//!
//! # Example
//!
//! ```ignore
//! use dw_bridge::transport::{create_transport, HostTransport};
//!
//! let transport = create_transport(&config.bus);
//! transport.send(HostMessage::new(names::HOST_INBOX_ACTION)).await?;
//! ```

mod adapter;
pub mod bus;
pub mod error;

pub use adapter::HostTransport;
pub use bus::IntentBus;
pub use error::TransportError;

use std::sync::Arc;

use crate::config::BusConfig;

/// Create the in-process bus described by `config`
pub fn create_transport(config: &BusConfig) -> Arc<IntentBus> {
    Arc::new(IntentBus::new(config))
}
