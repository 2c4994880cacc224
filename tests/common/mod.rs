//! Common test utilities and fixtures
//!
//! Observation builders and mock source setup shared by the integration
//! test suite.

use chrono::Utc;
use lacrosse_alerts_rust::client::Observation;
use lacrosse_alerts_rust::mock::MockObservationSource;
use std::sync::Arc;

/// Build an observation with an explicit capture timestamp
#[allow(dead_code)]
pub fn observation_at(utctime: i64, fields: serde_json::Value) -> Observation {
    let mut value = serde_json::json!({ "utctime": utctime });
    value
        .as_object_mut()
        .unwrap()
        .extend(fields.as_object().unwrap().clone());
    serde_json::from_value(value).unwrap()
}

/// Build an observation captured `age_secs` seconds ago
pub fn observation_aged(age_secs: i64, fields: serde_json::Value) -> Observation {
    observation_at(Utc::now().timestamp() - age_secs, fields)
}

/// Mock source for the standard test device, preloaded with one observation
#[allow(dead_code)]
pub async fn mock_source_with(observation: Observation) -> Arc<MockObservationSource> {
    let source = Arc::new(MockObservationSource::new("3F44"));
    source.set_observation(observation).await;
    source
}
