//! dwbridged - DataWedge bridge daemon
//!
//! Runs the command/event bridge against the simulated host service and
//! serves the UI-facing surface as JSON lines:
//!
//! ```text
//! stdin:  {"method": "createDataWedgeProfile", "arguments": "demo"}
//! stdin:  {"simulateScan": {"data": "0123456789", "symbology": "EAN13"}}
//! stdout: {"response": "accepted"}
//! stdout: {"scan": {"scanData": "0123456789", "symbology": "EAN13", "dateTime": "..."}}
//! ```
//!
//! Logs go to stderr so stdout stays machine readable.

mod config;
mod stdio;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dw_bridge::{create_transport, BridgeFacade, BridgeMethod};
use dw_sim::SimulatedHost;
use futures::StreamExt;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::DaemonConfig;
use crate::stdio::{method_reply, parse_request, scan_line, Request};

#[derive(Parser, Debug)]
#[command(name = "dwbridged")]
#[command(author, version, about = "DataWedge command/event bridge daemon")]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, env = "DWBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Create and configure this profile at start-up
    #[arg(short, long)]
    profile: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "dwbridged=debug,dw_bridge=debug,dw_sim=debug"
    } else {
        "dwbridged=info,dw_bridge=info,dw_sim=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting dwbridged");

    let config = match &args.config {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            DaemonConfig::load(path)?
        }
        None => {
            info!("No config file provided, using defaults");
            DaemonConfig::default()
        }
    };

    let bus = create_transport(&config.bridge.bus);
    let host = SimulatedHost::spawn(bus.clone(), config.simulator.clone());
    let facade = BridgeFacade::new(bus, &config.bridge);

    // Forward decodes to stdout
    let mut scans = facade.subscribe_scans().await;
    let forwarder = tokio::spawn(async move {
        while let Some(event) = scans.next().await {
            println!("{}", scan_line(event));
        }
    });

    if let Some(profile) = args.profile.or(config.profile) {
        let result = facade
            .invoke_command(BridgeMethod::CreateProfile.name(), &json!(profile))
            .await;
        info!(%profile, reply = %method_reply(&result), "Start-up profile configured");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match parse_request(line) {
            Ok(Request::Call { method, arguments }) => {
                method_reply(&facade.invoke_command(&method, &arguments).await)
            }
            Ok(Request::SimulateScan { simulate_scan }) => {
                let delivered = host.emit_scan(&simulate_scan.data, &simulate_scan.symbology);
                json!({ "simulated": delivered })
            }
            Err(e) => {
                warn!(error = %e, "Unreadable request");
                json!({ "error": format!("Invalid request: {}", e) })
            }
        };
        println!("{}", reply);
    }

    info!("stdin closed, shutting down");
    facade.unsubscribe_scans().await;
    let _ = forwarder.await;
    host.shutdown().await;

    Ok(())
}
