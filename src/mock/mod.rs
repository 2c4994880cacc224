//! Mock implementations for testing
//!
//! Provides an in-memory observation source so channels and adapters can
//! be exercised without a network.

use crate::client::{Observation, ObservationSource};
use crate::error::{LacrosseError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock observation source for testing
pub struct MockObservationSource {
    device_id: String,

    /// Observation returned on the next fetch
    observation: Arc<RwLock<Option<Observation>>>,

    /// When set, every fetch fails with a connection error
    simulate_failures: Arc<RwLock<bool>>,

    /// Number of fetches issued, for verification
    fetch_count: Arc<RwLock<usize>>,
}

impl MockObservationSource {
    /// Create a new mock source for a device id
    pub fn new<S: Into<String>>(device_id: S) -> Self {
        Self {
            device_id: device_id.into(),
            observation: Arc::new(RwLock::new(None)),
            simulate_failures: Arc::new(RwLock::new(false)),
            fetch_count: Arc::new(RwLock::new(0)),
        }
    }

    /// Set the observation returned by subsequent fetches
    pub fn with_observation(self, observation: Observation) -> Self {
        // Not yet shared at construction time, so the lock is free.
        *self
            .observation
            .try_write()
            .expect("mock source lock free at construction") = Some(observation);
        self
    }

    /// Replace the observation returned by subsequent fetches
    pub async fn set_observation(&self, observation: Observation) {
        *self.observation.write().await = Some(observation);
    }

    /// Enable or disable failure simulation
    pub async fn simulate_failures(&self, enabled: bool) {
        *self.simulate_failures.write().await = enabled;
    }

    /// Number of fetches issued so far
    pub async fn fetch_count(&self) -> usize {
        *self.fetch_count.read().await
    }
}

#[async_trait]
impl ObservationSource for MockObservationSource {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    async fn latest_observation(&self) -> Result<Observation> {
        *self.fetch_count.write().await += 1;

        if *self.simulate_failures.read().await {
            return Err(LacrosseError::connection("Simulated connection failure"));
        }

        self.observation.read().await.clone().ok_or_else(|| {
            LacrosseError::not_found(format!("No observations for device {}", self.device_id))
        })
    }
}
