//! End-to-end tests: bridge facade against the simulated host service
//!
//! Run with: cargo test -p dw-tests --test bridge_e2e_test

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use dw_bridge::profile::keys;
use dw_bridge::{BridgeEvent, HostTransport, MethodResponse, ParameterValue};
use dw_core::message::names;
use dw_core::SCAN_TIMESTAMP_FORMAT;
use dw_tests::{next_within, Harness};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const SET_CONFIG: &str = "com.symbol.datawedge.api.SET_CONFIG";
const CREATE_PROFILE: &str = "com.symbol.datawedge.api.CREATE_PROFILE";

async fn create_profile(harness: &Harness, name: &str) {
    let response = harness
        .facade
        .invoke_command("createDataWedgeProfile", &json!(name))
        .await
        .unwrap();
    assert_eq!(response, MethodResponse::Accepted);
    harness.host.wait_processed(3).await;
}

// =============================================================================
// Command channel
// =============================================================================

#[tokio::test]
async fn test_unknown_method_reaches_nobody() {
    let harness = Harness::new();
    let mut tap = harness.bus.subscribe();

    let response = harness
        .facade
        .invoke_command("doSomethingUnknown", &json!({"x": 1}))
        .await
        .unwrap();

    assert_eq!(response, MethodResponse::NotImplemented);
    assert!(tap.try_recv().is_err());
    assert_eq!(harness.host.processed(), 0);
}

#[tokio::test]
async fn test_configure_emits_ordered_messages() {
    let harness = Harness::new();
    let mut tap = harness.bus.subscribe();

    harness
        .facade
        .configurator()
        .configure("myProfile", "com.example.app")
        .await
        .unwrap();

    let mut commands = Vec::new();
    while commands.len() < 3 {
        let msg = tokio::time::timeout(dw_tests::WAIT, tap.recv())
            .await
            .unwrap()
            .unwrap();
        if msg.action == names::HOST_INBOX_ACTION {
            commands.push(msg);
        }
    }

    assert_eq!(commands[0].text_extra(CREATE_PROFILE), Some("myProfile"));

    let first = commands[1].extra(SET_CONFIG).unwrap().as_map().unwrap();
    let second = commands[2].extra(SET_CONFIG).unwrap().as_map().unwrap();
    for payload in [first, second] {
        for key in [keys::PROFILE_NAME, keys::PROFILE_ENABLED, keys::CONFIG_MODE] {
            assert!(payload.contains_key(key), "missing {}", key);
        }
        assert_eq!(payload[keys::CONFIG_MODE], ParameterValue::from("UPDATE"));
    }

    let mut first_rest = first.clone();
    let mut second_rest = second.clone();
    let first_plugin = first_rest.remove(keys::PLUGIN_CONFIG).unwrap();
    let second_plugin = second_rest.remove(keys::PLUGIN_CONFIG).unwrap();
    assert_eq!(first_rest, second_rest);
    assert_eq!(
        first_plugin.get(keys::PLUGIN_NAME),
        Some(&ParameterValue::from("BARCODE"))
    );
    assert_eq!(
        second_plugin.get(keys::PLUGIN_NAME),
        Some(&ParameterValue::from("INTENT"))
    );
}

#[tokio::test]
async fn test_created_profile_is_applied_by_host() {
    let harness = Harness::new();
    create_profile(&harness, "myProfile").await;

    let profile = harness.host.profile("myProfile").expect("profile created");
    assert!(profile.enabled);
    assert!(profile.is_bound_to("com.example.app"));
    assert!(profile.plugin("BARCODE").is_some());
    assert_eq!(profile.intent_route(), Some("com.example.app.SCAN"));
}

#[tokio::test]
async fn test_acknowledged_configuration_reports_results_in_order() {
    let harness = Harness::new();
    let mut events = harness.facade.receiver().subscribe().await;

    harness
        .facade
        .configurator()
        .clone()
        .with_acknowledgements(true)
        .configure("acked", "com.example.app")
        .await
        .unwrap();

    let mut seen = Vec::new();
    for _ in 0..3 {
        match next_within(&mut events).await {
            Some(BridgeEvent::HostNotification(msg)) => {
                assert_eq!(msg.text_extra("RESULT"), Some("SUCCESS"));
                seen.push(msg.text_extra("COMMAND").unwrap_or_default().to_string());
            }
            other => panic!("expected a command result, got {:?}", other),
        }
    }
    assert_eq!(seen, vec![CREATE_PROFILE, SET_CONFIG, SET_CONFIG]);
}

#[tokio::test]
async fn test_soft_trigger_through_command_string() {
    let harness = Harness::new();
    create_profile(&harness, "trigger").await;
    let mut scans = harness.facade.subscribe_scans().await;

    harness.host.queue_scan("ABC-123", "LABEL-TYPE-CODE128");
    harness
        .facade
        .invoke_command(
            "sendDataWedgeCommandStringParameter",
            &json!({
                "command": "com.symbol.datawedge.api.SOFT_SCAN_TRIGGER",
                "parameter": "START_SCANNING"
            }),
        )
        .await
        .unwrap();

    let event = next_within(&mut scans).await.unwrap();
    assert_eq!(event["scanData"], "ABC-123");
    assert_eq!(event["symbology"], "LABEL-TYPE-CODE128");
}

// =============================================================================
// Event channel
// =============================================================================

#[tokio::test]
async fn test_single_scan_produces_single_event() {
    let harness = Harness::new();
    create_profile(&harness, "scan").await;
    let mut scans = harness.facade.subscribe_scans().await;

    let before = Local::now().naive_local();
    assert!(harness.host.emit_scan("0123456789", "EAN13"));

    let event = next_within(&mut scans).await.unwrap();
    let object = event.as_object().unwrap();
    assert_eq!(object.len(), 3);
    assert_eq!(event["scanData"], "0123456789");
    assert_eq!(event["symbology"], "EAN13");

    let stamped = NaiveDateTime::parse_from_str(
        event["dateTime"].as_str().unwrap(),
        SCAN_TIMESTAMP_FORMAT,
    )
    .unwrap();
    let drift = (stamped - before).num_seconds().abs();
    assert!(drift <= 5, "timestamp {} too far from now", stamped);

    // Exactly one event
    assert!(
        tokio::time::timeout(Duration::from_millis(200), futures::StreamExt::next(&mut scans))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_unsubscribe_stops_delivery() {
    let harness = Harness::new();
    create_profile(&harness, "stop").await;
    let mut scans = harness.facade.subscribe_scans().await;
    let listeners = harness.bus.listener_count();

    harness.facade.unsubscribe_scans().await;
    assert_eq!(harness.bus.listener_count(), listeners - 1);

    harness.host.emit_scan("late", "EAN13");
    assert_eq!(next_within(&mut scans).await, None::<Value>);

    // Second unsubscribe is harmless
    harness.facade.unsubscribe_scans().await;
}

#[tokio::test]
async fn test_scan_without_intent_profile_is_not_delivered() {
    let harness = Harness::new();
    let mut scans = harness.facade.subscribe_scans().await;

    assert!(!harness.host.emit_scan("0123", "EAN8"));
    assert!(
        tokio::time::timeout(Duration::from_millis(200), futures::StreamExt::next(&mut scans))
            .await
            .is_err()
    );
}
