//! dw-sim - Simulated DataWedge host service
//!
//! Stands in for the closed host scanning service on an in-process
//! [`IntentBus`](dw_bridge::IntentBus): it consumes commands from the host
//! inbox, keeps profile state, answers queries and result requests on the
//! result action, and delivers decodes through the intent output configured
//! in a profile.
//!
//! # Modules
//!
//! - [`config`] - Simulator settings (version, attached scanners)
//! - [`profile`] - Profile state kept by the host
//! - [`host`] - The simulated service itself

pub mod config;
pub mod host;
pub mod profile;

pub use config::{ScannerDef, SimConfig};
pub use host::SimulatedHost;
pub use profile::{AppBinding, ProfileState};
