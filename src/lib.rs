//! Async adapter for La Crosse Alerts Mobile weather stations
//!
//! This crate polls the La Crosse Alerts Mobile feed for one or more
//! weather stations and exposes each measurement (ambient and probe
//! temperature, humidity, low-battery flag, signal strength, last-seen
//! time) as an independently-updating channel. Readings older than the
//! staleness window (15 minutes by default) are withheld rather than
//! republished, so a silent station never keeps reporting its last
//! numbers as current.
//!
//! # Example
//!
//! ```rust,no_run
//! use lacrosse_alerts_rust::{AdapterConfig, DeviceAdapter, DeviceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = AdapterConfig::default();
//!     config.devices.push(DeviceConfig::new("3F44"));
//!
//!     for mut adapter in DeviceAdapter::build_all(&config).await? {
//!         adapter.poll_all().await;
//!         for channel in adapter.channels() {
//!             println!("{}: {:?}", channel.name(), channel.state());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod channels;
pub mod client;
pub mod config;
pub mod error;
pub mod freshness;
pub mod logging;

pub mod mock;

// Re-export main types
pub use crate::{
    adapter::{DeviceAdapter, DeviceIdentity},
    channels::{Channel, ChannelKind, ChannelValue},
    config::{AdapterConfig, DeviceConfig, UnitSystem},
    error::{LacrosseError, Result},
};
