//! Integration tests for the DataWedge bridge
//!
//! These tests run the bridge and the simulated host service on one
//! in-process bus:
//! - Bridge facade (command channel and scan stream)
//! - Profile configuration as applied by the host
//! - Command results flowing back through the event receiver
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dw-tests
//! ```
//!
//! # Test Structure
//!
//! - `bridge_e2e_test.rs` - Facade against the simulated host
//! - `receiver_test.rs` - Event receiver lifecycle and ordering

use std::sync::Arc;
use std::time::Duration;

use dw_bridge::{BridgeConfig, BridgeFacade, IntentBus};
use dw_sim::{SimConfig, SimulatedHost};
use futures::{Stream, StreamExt};

/// Upper bound for any single wait in the tests
pub const WAIT: Duration = Duration::from_secs(2);

/// Bridge and simulated host sharing one bus
pub struct Harness {
    pub config: BridgeConfig,
    pub bus: Arc<IntentBus>,
    pub host: SimulatedHost,
    pub facade: BridgeFacade,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(BridgeConfig {
            package_name: "com.example.app".to_string(),
            scan_action: "com.example.app.SCAN".to_string(),
            ..Default::default()
        })
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        let bus = Arc::new(IntentBus::new(&config.bus));
        let host = SimulatedHost::spawn(
            bus.clone(),
            SimConfig {
                endpoints: config.host.clone(),
                ..Default::default()
            },
        );
        let facade = BridgeFacade::new(bus.clone(), &config);
        Self {
            config,
            bus,
            host,
            facade,
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Next stream item, panicking after [`WAIT`]
pub async fn next_within<S>(stream: &mut S) -> Option<S::Item>
where
    S: Stream + Unpin,
{
    tokio::time::timeout(WAIT, stream.next())
        .await
        .expect("timed out waiting for stream item")
}
