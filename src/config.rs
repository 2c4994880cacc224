//! Configuration for the La Crosse Alerts adapter
//!
//! All defaults that the original integration hardcoded (metric units,
//! station-local timezone index, staleness window) are explicit
//! configuration fields here.

use crate::error::{LacrosseError, Result};
use serde::{Deserialize, Serialize};
use std::{env, time::Duration};
use url::Url;

/// Default feed endpoint for La Crosse Alerts Mobile devices
pub const DEFAULT_BASE_URL: &str = "http://decent-destiny-704.appspot.com/laxservices/";

/// Vendor timezone index for the station-local default
pub const DEFAULT_TIMEZONE: i32 = 17;

/// Readings older than this are withheld as unreliable
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(900);

/// Unit preference sent to the feed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Celsius / metric (wire code 1)
    Metric,
    /// Fahrenheit / imperial (wire code 0)
    Imperial,
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self::Metric
    }
}

impl UnitSystem {
    /// Wire code the feed expects in the `metric` query parameter
    pub fn wire_code(&self) -> u8 {
        match self {
            Self::Metric => 1,
            Self::Imperial => 0,
        }
    }

    /// Temperature unit string for this preference
    pub fn temperature_unit(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }
}

/// Adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Feed base URL
    pub base_url: Url,

    /// HTTP request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Maximum number of request retries
    pub max_retries: u32,

    /// Unit preference for all devices
    #[serde(default)]
    pub unit: UnitSystem,

    /// Configured weather stations
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

/// Per-device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device serial as registered with the alerts service
    pub id: String,

    /// Display name, defaults to "lacrosse-<id>"
    #[serde(default)]
    pub name: Option<String>,

    /// Vendor timezone index forwarded to the feed
    #[serde(default = "default_timezone")]
    pub timezone: i32,

    /// Staleness window for this device's readings
    #[serde(default = "default_stale_after", with = "humantime_serde")]
    pub stale_after: Duration,
}

fn default_timezone() -> i32 {
    DEFAULT_TIMEZONE
}

fn default_stale_after() -> Duration {
    DEFAULT_STALE_AFTER
}

impl DeviceConfig {
    /// Create a device entry with defaults for everything but the id
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            name: None,
            timezone: DEFAULT_TIMEZONE,
            stale_after: DEFAULT_STALE_AFTER,
        }
    }

    /// Display name, falling back to "lacrosse-<id>"
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("lacrosse-{}", self.id))
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            unit: UnitSystem::default(),
            devices: Vec::new(),
        }
    }
}

impl AdapterConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("LACROSSE_URL") {
            config.base_url = url
                .parse()
                .map_err(|e| LacrosseError::config(format!("Invalid LACROSSE_URL: {e}")))?;
        }

        if let Ok(timeout) = env::var("LACROSSE_TIMEOUT") {
            config.timeout = Duration::from_secs(
                timeout
                    .parse()
                    .map_err(|e| LacrosseError::config(format!("Invalid LACROSSE_TIMEOUT: {e}")))?,
            );
        }

        if let Ok(unit) = env::var("LACROSSE_UNIT") {
            config.unit = match unit.to_lowercase().as_str() {
                "metric" | "celsius" => UnitSystem::Metric,
                "imperial" | "fahrenheit" => UnitSystem::Imperial,
                _ => {
                    return Err(LacrosseError::config(format!(
                        "Invalid LACROSSE_UNIT: {unit}. Use 'metric' or 'imperial'"
                    )))
                }
            };
        }

        if let Ok(device_id) = env::var("LACROSSE_DEVICE_ID") {
            let mut device = DeviceConfig::new(device_id);

            if let Ok(name) = env::var("LACROSSE_DEVICE_NAME") {
                device.name = Some(name);
            }

            if let Ok(tz) = env::var("LACROSSE_TIMEZONE") {
                device.timezone = tz.parse().map_err(|e| {
                    LacrosseError::config(format!("Invalid LACROSSE_TIMEZONE: {e}"))
                })?;
            }

            if let Ok(secs) = env::var("LACROSSE_STALE_AFTER") {
                device.stale_after = Duration::from_secs(secs.parse().map_err(|e| {
                    LacrosseError::config(format!("Invalid LACROSSE_STALE_AFTER: {e}"))
                })?);
            }

            config.devices.push(device);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(LacrosseError::config("max_retries must be at least 1"));
        }

        for device in &self.devices {
            if device.id.is_empty() {
                return Err(LacrosseError::config("Device id cannot be empty"));
            }
            if device.stale_after.is_zero() {
                return Err(LacrosseError::config(format!(
                    "Device {}: stale_after must be non-zero",
                    device.id
                )));
            }
        }

        Ok(())
    }
}
