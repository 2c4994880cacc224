//! Integration tests for channel polling behavior
//!
//! Exercises the poll cycle against the mock observation source: fresh and
//! stale publishing, fetch-failure recovery, and fetch independence.

mod common;

use common::*;
use lacrosse_alerts_rust::channels::{Channel, ChannelKind, ChannelValue};
use lacrosse_alerts_rust::config::{UnitSystem, DEFAULT_STALE_AFTER};
use lacrosse_alerts_rust::mock::MockObservationSource;
use std::sync::Arc;

fn channel(kind: ChannelKind, source: Arc<MockObservationSource>) -> Channel {
    Channel::new(
        kind,
        "lacrosse-3F44",
        source,
        UnitSystem::Metric,
        DEFAULT_STALE_AFTER,
    )
}

#[tokio::test]
async fn fresh_observation_is_published() {
    let source = mock_source_with(observation_aged(
        60,
        serde_json::json!({"ambient_temp": 21.5}),
    ))
    .await;
    let mut ambient = channel(ChannelKind::AmbientTemp, source);

    ambient.poll().await;

    assert_eq!(ambient.state(), Some(&ChannelValue::Number(21.5)));
}

#[tokio::test]
async fn stale_observation_publishes_absent() {
    let source = mock_source_with(observation_aged(
        1000,
        serde_json::json!({"ambient_temp": 21.5}),
    ))
    .await;
    let mut ambient = channel(ChannelKind::AmbientTemp, source);

    ambient.poll().await;

    assert!(ambient.state().is_none());
    assert_eq!(ambient.state_json(), serde_json::Value::Null);
}

#[tokio::test]
async fn fetch_failure_keeps_previous_value() {
    let source = mock_source_with(observation_aged(
        60,
        serde_json::json!({"ambient_temp": 21.5}),
    ))
    .await;
    let mut ambient = channel(ChannelKind::AmbientTemp, Arc::clone(&source));

    ambient.poll().await;
    assert_eq!(ambient.state(), Some(&ChannelValue::Number(21.5)));

    // Source goes away; the channel holds its last reading and poll()
    // completes without an error escaping.
    source.simulate_failures(true).await;
    ambient.poll().await;

    assert_eq!(ambient.state(), Some(&ChannelValue::Number(21.5)));
}

#[tokio::test]
async fn recovery_after_failure_updates_value() {
    let source = mock_source_with(observation_aged(
        60,
        serde_json::json!({"ambient_temp": 21.5}),
    ))
    .await;
    let mut ambient = channel(ChannelKind::AmbientTemp, Arc::clone(&source));

    source.simulate_failures(true).await;
    ambient.poll().await;
    assert!(ambient.state().is_none());

    source.simulate_failures(false).await;
    source
        .set_observation(observation_aged(30, serde_json::json!({"ambient_temp": 19.0})))
        .await;
    ambient.poll().await;

    assert_eq!(ambient.state(), Some(&ChannelValue::Number(19.0)));
}

#[tokio::test]
async fn consecutive_in_window_polls_both_publish() {
    // Two records captured 14 minutes apart, each within the window at
    // its own poll time.
    let source = mock_source_with(observation_aged(
        840,
        serde_json::json!({"humidity": 45.0}),
    ))
    .await;
    let mut humidity = channel(ChannelKind::Humidity, Arc::clone(&source));

    humidity.poll().await;
    assert_eq!(humidity.state(), Some(&ChannelValue::Number(45.0)));

    source
        .set_observation(observation_aged(30, serde_json::json!({"humidity": 47.0})))
        .await;
    humidity.poll().await;

    assert_eq!(humidity.state(), Some(&ChannelValue::Number(47.0)));
}

#[tokio::test]
async fn value_goes_absent_when_record_ages_out() {
    let source = mock_source_with(observation_aged(
        60,
        serde_json::json!({"probe_temp": 22.4}),
    ))
    .await;
    let mut probe = channel(ChannelKind::ProbeTemp, Arc::clone(&source));

    probe.poll().await;
    assert_eq!(probe.state(), Some(&ChannelValue::Number(22.4)));

    // Same station, but the feed is now replaying an old record.
    source
        .set_observation(observation_aged(2000, serde_json::json!({"probe_temp": 22.4})))
        .await;
    probe.poll().await;

    assert!(probe.state().is_none());
}

#[tokio::test]
async fn last_seen_publishes_regardless_of_age() {
    let captured = chrono::Utc::now().timestamp() - 86_400;
    let source = mock_source_with(observation_at(captured, serde_json::json!({}))).await;
    let mut last_seen = channel(ChannelKind::LastSeen, source);

    last_seen.poll().await;

    match last_seen.state() {
        Some(ChannelValue::Timestamp(t)) => assert_eq!(t.timestamp(), captured),
        other => panic!("expected timestamp, got {other:?}"),
    }
}

#[tokio::test]
async fn each_channel_fetches_independently() {
    let source = mock_source_with(observation_aged(
        60,
        serde_json::json!({"ambient_temp": 21.5, "humidity": 45.0}),
    ))
    .await;

    let mut ambient = channel(ChannelKind::AmbientTemp, Arc::clone(&source));
    let mut humidity = channel(ChannelKind::Humidity, Arc::clone(&source));

    ambient.poll().await;
    humidity.poll().await;

    assert_eq!(source.fetch_count().await, 2);
}

#[tokio::test]
async fn concurrent_polls_publish_independently() {
    let source = mock_source_with(observation_aged(
        60,
        serde_json::json!({"ambient_temp": 21.5, "humidity": 45.0}),
    ))
    .await;
    let mut ambient = channel(ChannelKind::AmbientTemp, Arc::clone(&source));
    let mut humidity = channel(ChannelKind::Humidity, Arc::clone(&source));

    // Two channels polled in the same tick each issue their own fetch
    // and own their own published value.
    futures::future::join(ambient.poll(), humidity.poll()).await;

    assert_eq!(ambient.state(), Some(&ChannelValue::Number(21.5)));
    assert_eq!(humidity.state(), Some(&ChannelValue::Number(45.0)));
    assert_eq!(source.fetch_count().await, 2);
}

#[test]
fn poll_completes_on_a_current_thread_executor() {
    // Hosts with a single-threaded scheduler can await poll() directly.
    tokio_test::block_on(async {
        let source = mock_source_with(observation_aged(
            60,
            serde_json::json!({"linkquality": 78.0}),
        ))
        .await;
        let mut signal = channel(ChannelKind::LinkQuality, source);

        signal.poll().await;

        assert_eq!(signal.state(), Some(&ChannelValue::Number(78.0)));
    });
}

#[tokio::test]
async fn low_battery_cycle_through_states() {
    let source = mock_source_with(observation_aged(60, serde_json::json!({"lowbattery": 0})))
        .await;
    let mut battery = channel(ChannelKind::LowBattery, Arc::clone(&source));

    battery.poll().await;
    assert_eq!(battery.state(), Some(&ChannelValue::Bool(false)));

    source
        .set_observation(observation_aged(60, serde_json::json!({"lowbattery": 1})))
        .await;
    battery.poll().await;
    assert_eq!(battery.state(), Some(&ChannelValue::Bool(true)));

    // Field dropped from the payload: absent, never false.
    source
        .set_observation(observation_aged(60, serde_json::json!({})))
        .await;
    battery.poll().await;
    assert!(battery.state().is_none());
}
