//! dw-bridge - Command/event bridge for the DataWedge host service
//!
//! Fronts a broadcast-driven host scanning service with two narrow channels
//! for a UI layer: a command channel and a scan event stream.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      BridgeFacade                           │
//! │  invoke_command(name, args)          subscribe_scans()      │
//! │                                                             │
//! │  ┌────────────────────┐          ┌──────────────────────┐   │
//! │  │ ProfileConfigurator│          │    EventReceiver     │   │
//! │  │ (SET_CONFIG steps) │          │ (filter + decode)    │   │
//! │  └─────────┬──────────┘          └──────────▲───────────┘   │
//! │            │                                │               │
//! │  ┌─────────▼──────────┐                     │               │
//! │  │   CommandSender    │                     │               │
//! │  └─────────┬──────────┘                     │               │
//! │            │                                │               │
//! │       ┌────▼────────────────────────────────┴───┐           │
//! │       │             HostTransport               │           │
//! │       │      (IntentBus / platform bus)         │           │
//! │       └─────────────────────────────────────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host never answers synchronously. Callers cannot distinguish a
//! command the host accepted from one it ignored.

pub mod config;
pub mod error;
pub mod facade;
pub mod profile;
pub mod receiver;
pub mod sender;
pub mod transport;

pub use config::{BridgeConfig, BusConfig, HostEndpoints, IntentDelivery};
pub use error::{ConfigError, MethodError, ProfileError};
pub use facade::{BridgeFacade, BridgeMethod, MethodResponse, ScanEventStream};
pub use profile::{
    AppAssociation, ConfigMode, PluginConfig, ProfileConfig, ProfileConfigurator, ProfileStep,
};
pub use receiver::{BridgeEvent, EventReceiver, EventStream};
pub use sender::CommandSender;
pub use transport::{create_transport, HostTransport, IntentBus, TransportError};

// Re-export for convenience
pub use dw_core::{
    Command, CommandName, HostMessage, IntentFilter, ParameterSet, ParameterValue, ScanRecord,
};
