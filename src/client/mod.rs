//! Observation source implementations for the La Crosse Alerts feed

pub mod http_client;

use crate::config::{AdapterConfig, DeviceConfig};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// Value-bearing fields of an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationField {
    AmbientTemp,
    ProbeTemp,
    Humidity,
    LowBattery,
    LinkQuality,
}

impl ObservationField {
    /// Wire key of this field in the feed payload
    pub fn key(&self) -> &'static str {
        match self {
            Self::AmbientTemp => "ambient_temp",
            Self::ProbeTemp => "probe_temp",
            Self::Humidity => "humidity",
            Self::LowBattery => "lowbattery",
            Self::LinkQuality => "linkquality",
        }
    }
}

/// One timestamped reading batch from a weather station
///
/// The feed occasionally encodes numeric fields as strings, so all numeric
/// fields accept both representations. Fields absent from the payload
/// deserialize to `None` rather than failing the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Capture timestamp, seconds since epoch, UTC
    #[serde(deserialize_with = "flexible_i64")]
    pub utctime: i64,

    /// Ambient temperature in the requested unit
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub ambient_temp: Option<f64>,

    /// Probe temperature in the requested unit
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub probe_temp: Option<f64>,

    /// Relative humidity in percent
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub humidity: Option<f64>,

    /// Low-battery indicator, 1 = low
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub lowbattery: Option<f64>,

    /// Link quality in dB
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub linkquality: Option<f64>,

    /// Device type label reported by the feed (e.g. "TX60")
    #[serde(default)]
    pub device_type: Option<String>,
}

impl Observation {
    /// Capture time as a UTC datetime
    ///
    /// A timestamp outside chrono's representable range clamps to the
    /// epoch, so a garbage `utctime` reads as maximally stale rather
    /// than fresh.
    pub fn captured_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.utctime, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Raw value of a field, `None` when the feed omitted it
    pub fn field(&self, field: ObservationField) -> Option<f64> {
        match field {
            ObservationField::AmbientTemp => self.ambient_temp,
            ObservationField::ProbeTemp => self.probe_temp,
            ObservationField::Humidity => self.humidity,
            ObservationField::LowBattery => self.lowbattery,
            ObservationField::LinkQuality => self.linkquality,
        }
    }
}

/// Trait for observation source implementations
///
/// One handle is bound to one device (plus unit preference and timezone)
/// at construction and shared read-only by all of that device's channels.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Device serial this source is bound to
    fn device_id(&self) -> &str;

    /// Fetch the single most recent observation for the device
    async fn latest_observation(&self) -> Result<Observation>;
}

/// Create the observation source for a configured device
pub fn create_source(
    config: &AdapterConfig,
    device: &DeviceConfig,
) -> Result<Arc<dyn ObservationSource>> {
    let client = http_client::LacrosseHttpClient::new(config, device)?;
    Ok(Arc::new(client))
}

fn flexible_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    json_to_i64(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected integer, got {value}")))
}

fn flexible_opt_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => Ok(json_to_f64(&v)),
    }
}

fn json_to_i64(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_to_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
