//! Measurement channels for one weather station
//!
//! Each physical quantity is one [`Channel`] value parameterized by
//! [`ChannelKind`]; there is no per-quantity type. All channels of a device
//! share one observation source handle but fetch independently, so two
//! channels polled in the same scheduler tick may reflect two different
//! underlying observations.

use crate::client::{ObservationField, ObservationSource};
use crate::config::UnitSystem;
use crate::freshness::fresh_field;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The six published measurements of a weather station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    AmbientTemp,
    ProbeTemp,
    Humidity,
    LowBattery,
    LinkQuality,
    LastSeen,
}

impl ChannelKind {
    /// All channel kinds, in the order they are published for a device
    pub const ALL: [ChannelKind; 6] = [
        ChannelKind::AmbientTemp,
        ChannelKind::ProbeTemp,
        ChannelKind::Humidity,
        ChannelKind::LowBattery,
        ChannelKind::LinkQuality,
        ChannelKind::LastSeen,
    ];

    /// Observation field backing this channel, `None` for the last-seen
    /// channel which reads the capture timestamp itself
    pub fn field(&self) -> Option<ObservationField> {
        match self {
            Self::AmbientTemp => Some(ObservationField::AmbientTemp),
            Self::ProbeTemp => Some(ObservationField::ProbeTemp),
            Self::Humidity => Some(ObservationField::Humidity),
            Self::LowBattery => Some(ObservationField::LowBattery),
            Self::LinkQuality => Some(ObservationField::LinkQuality),
            Self::LastSeen => None,
        }
    }

    /// Human-readable label, appended to the device display name
    pub fn label(&self) -> &'static str {
        match self {
            Self::AmbientTemp => "Ambient Temperature",
            Self::ProbeTemp => "Probe Temperature",
            Self::Humidity => "Humidity",
            Self::LowBattery => "Battery Low",
            Self::LinkQuality => "Signal Strength",
            Self::LastSeen => "Last Seen",
        }
    }

    /// Identifier slug, appended to the device id
    pub fn slug(&self) -> &'static str {
        match self {
            Self::AmbientTemp => "ambient_temp",
            Self::ProbeTemp => "probe_temp",
            Self::Humidity => "humidity",
            Self::LowBattery => "lowbattery",
            Self::LinkQuality => "linkquality",
            Self::LastSeen => "last_seen",
        }
    }

    /// Frontend icon
    pub fn icon(&self) -> &'static str {
        match self {
            Self::AmbientTemp | Self::ProbeTemp => "mdi:thermometer",
            Self::Humidity => "mdi:water-percent",
            Self::LowBattery => "mdi:battery-alert",
            Self::LinkQuality => "mdi:signal",
            Self::LastSeen => "mdi:clock-outline",
        }
    }
}

/// A well-typed published value
///
/// A channel's state is `Option<ChannelValue>`; `None` is the absent
/// marker meaning "no current reliable value", distinct from zero or
/// `false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChannelValue {
    Number(f64),
    Bool(bool),
    Timestamp(DateTime<Local>),
}

impl fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

/// One published measurement of one device
pub struct Channel {
    kind: ChannelKind,
    device_id: String,
    name: String,
    unique_id: String,
    source: Arc<dyn ObservationSource>,
    unit: UnitSystem,
    stale_after: Duration,
    last_value: Option<ChannelValue>,
}

impl Channel {
    /// Create a channel bound to a shared observation source
    pub fn new(
        kind: ChannelKind,
        display_name: &str,
        source: Arc<dyn ObservationSource>,
        unit: UnitSystem,
        stale_after: Duration,
    ) -> Self {
        let device_id = source.device_id().to_string();
        Self {
            kind,
            name: format!("{} {}", display_name, kind.label()),
            unique_id: format!("{}_{}", device_id, kind.slug()),
            device_id,
            source,
            unit,
            stale_after,
            last_value: None,
        }
    }

    /// Channel kind
    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// Device serial this channel belongs to
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Display name, "<device name> <label>"
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable identifier, "<device id>_<slug>"
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Unit string, `None` for unit-less channels
    pub fn unit_of_measurement(&self) -> Option<&'static str> {
        match self.kind {
            ChannelKind::AmbientTemp | ChannelKind::ProbeTemp => {
                Some(self.unit.temperature_unit())
            }
            ChannelKind::Humidity => Some("%"),
            ChannelKind::LinkQuality => Some("dB"),
            ChannelKind::LowBattery | ChannelKind::LastSeen => None,
        }
    }

    /// Frontend icon
    pub fn icon(&self) -> &'static str {
        self.kind.icon()
    }

    /// Last published value, `None` when absent
    pub fn state(&self) -> Option<&ChannelValue> {
        self.last_value.as_ref()
    }

    /// Last published value as JSON, `Null` when absent
    pub fn state_json(&self) -> serde_json::Value {
        self.last_value
            .as_ref()
            .and_then(|v| serde_json::to_value(v).ok())
            .unwrap_or(serde_json::Value::Null)
    }

    /// Fetch the latest observation and republish this channel's value
    ///
    /// A fetch failure keeps the previous value and is logged; it never
    /// escapes to the caller, so the host scheduler keeps the channel
    /// registered and simply tries again next cycle.
    pub async fn poll(&mut self) {
        match self.source.latest_observation().await {
            Ok(observation) => {
                self.last_value = self.translate(&observation, Utc::now());
            }
            Err(e) => {
                tracing::warn!(
                    device_id = %self.device_id,
                    channel = %self.unique_id,
                    error = %e,
                    "Observation fetch failed, keeping previous value"
                );
            }
        }
    }

    /// Translate one observation into this channel's published value
    fn translate(
        &self,
        observation: &crate::client::Observation,
        now: DateTime<Utc>,
    ) -> Option<ChannelValue> {
        match self.kind {
            // Reports exactly how old the record is, so the staleness
            // filter does not apply to it.
            ChannelKind::LastSeen => Some(ChannelValue::Timestamp(
                observation.captured_at().with_timezone(&Local),
            )),
            ChannelKind::LowBattery => {
                fresh_field(observation, ObservationField::LowBattery, now, self.stale_after)
                    .map(|raw| ChannelValue::Bool(raw == 1.0))
            }
            kind => {
                let field = kind.field()?;
                fresh_field(observation, field, now, self.stale_after).map(ChannelValue::Number)
            }
        }
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("kind", &self.kind)
            .field("unique_id", &self.unique_id)
            .field("last_value", &self.last_value)
            .finish()
    }
}
