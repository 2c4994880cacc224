//! Per-device wiring: one adapter aggregates the six measurement channels
//! of one weather station under one logical identity.

use crate::channels::{Channel, ChannelKind};
use crate::client::{create_source, ObservationSource};
use crate::config::{AdapterConfig, DeviceConfig};
use crate::error::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Manufacturer string published with every device
pub const MANUFACTURER: &str = "La Crosse Technology";

/// Resolved identity of one weather station
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    /// Device serial
    pub device_id: String,

    /// Display name
    pub name: String,

    /// Model label from the feed, `None` when the initial fetch failed
    pub model: Option<String>,

    /// Manufacturer string
    pub manufacturer: &'static str,
}

/// One configured weather station and its measurement channels
pub struct DeviceAdapter {
    identity: DeviceIdentity,
    source: Arc<dyn ObservationSource>,
    channels: Vec<Channel>,
}

impl DeviceAdapter {
    /// Build the adapter for one configured device
    ///
    /// Constructs the HTTP observation source and attempts one initial
    /// fetch to resolve device metadata. A metadata fetch failure is
    /// logged and swallowed: the channels still poll independently later.
    pub async fn build(config: &AdapterConfig, device: &DeviceConfig) -> Result<Self> {
        let source = create_source(config, device)?;
        Ok(Self::build_with_source(config, device, source).await)
    }

    /// Build the adapter on an existing source handle
    pub async fn build_with_source(
        config: &AdapterConfig,
        device: &DeviceConfig,
        source: Arc<dyn ObservationSource>,
    ) -> Self {
        let name = device.display_name();

        let model = match source.latest_observation().await {
            Ok(observation) => observation.device_type,
            Err(e) => {
                warn!(
                    device_id = %device.id,
                    error = %e,
                    "Initial metadata fetch failed, device model left unset"
                );
                None
            }
        };

        let channels = ChannelKind::ALL
            .iter()
            .map(|kind| {
                Channel::new(
                    *kind,
                    &name,
                    Arc::clone(&source),
                    config.unit,
                    device.stale_after,
                )
            })
            .collect();

        info!(
            device_id = %device.id,
            name = %name,
            model = model.as_deref().unwrap_or("unknown"),
            "Device adapter ready"
        );

        Self {
            identity: DeviceIdentity {
                device_id: device.id.clone(),
                name,
                model,
                manufacturer: MANUFACTURER,
            },
            source,
            channels,
        }
    }

    /// Build adapters for every configured device
    pub async fn build_all(config: &AdapterConfig) -> Result<Vec<Self>> {
        let mut adapters = Vec::with_capacity(config.devices.len());
        for device in &config.devices {
            adapters.push(Self::build(config, device).await?);
        }
        Ok(adapters)
    }

    /// Resolved device identity
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Shared observation source handle
    pub fn source(&self) -> &Arc<dyn ObservationSource> {
        &self.source
    }

    /// Measurement channels, in [`ChannelKind::ALL`] order
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Mutable channel access for the host's polling scheduler
    pub fn channels_mut(&mut self) -> &mut [Channel] {
        &mut self.channels
    }

    /// Consume the adapter, handing the channels to the host
    pub fn into_channels(self) -> Vec<Channel> {
        self.channels
    }

    /// Device registry entry for the host platform
    pub fn device_info(&self) -> serde_json::Value {
        serde_json::json!({
            "identifiers": [self.identity.device_id],
            "name": self.identity.name,
            "model": self.identity.model,
            "manufacturer": self.identity.manufacturer,
        })
    }

    /// Poll every channel once, sequentially
    ///
    /// Convenience for hosts without a per-entity scheduler; each channel
    /// still issues its own independent fetch.
    pub async fn poll_all(&mut self) {
        for channel in &mut self.channels {
            channel.poll().await;
        }
    }
}
