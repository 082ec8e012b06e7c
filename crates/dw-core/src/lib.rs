//! dw-core - Core types for the DataWedge command/event bridge
//!
//! This crate holds the data shared by every layer of the bridge: the
//! parameter tree handed to the host scanning service, the broadcast message
//! envelope, the registry of known host commands and the scan record
//! produced on every decode.

pub mod command;
pub mod error;
pub mod message;
pub mod models;
pub mod parameter;

pub use command::{Command, CommandName, ParameterShape, COMMAND_KEY_PREFIX};
pub use error::{CoreError, CoreResult};
pub use message::{HostMessage, IntentFilter};
pub use models::*;
pub use parameter::{ParameterSet, ParameterValue};
