//! HTTP observation source for the La Crosse Alerts Mobile feed
//!
//! Fetches `device_info.php` for one device and returns the most recent
//! observation record. Retries with linear backoff; any timeout beyond
//! that is the HTTP client's own request timeout.

use crate::client::{Observation, ObservationSource};
use crate::config::{AdapterConfig, DeviceConfig, UnitSystem};
use crate::error::{LacrosseError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Feed payload wrapper, one device report per request
#[derive(Debug, Deserialize)]
struct DeviceFeed {
    #[serde(default)]
    device0: Option<DeviceReport>,
}

/// Per-device block of the feed payload
#[derive(Debug, Deserialize)]
struct DeviceReport {
    #[serde(default)]
    device_type: Option<String>,
    #[serde(default)]
    obs: Vec<Observation>,
}

/// HTTP client bound to one weather station
pub struct LacrosseHttpClient {
    /// HTTP client instance
    client: Client,

    /// Feed base URL
    base_url: Url,

    /// Device serial
    device_id: String,

    /// Unit preference forwarded to the feed
    unit: UnitSystem,

    /// Vendor timezone index forwarded to the feed
    timezone: i32,

    /// Maximum number of request retries
    max_retries: u32,
}

impl LacrosseHttpClient {
    /// Create a new HTTP source for one configured device
    pub fn new(config: &AdapterConfig, device: &DeviceConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(format!(
                "lacrosse-alerts-rust/{}",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| LacrosseError::connection(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            device_id: device.id.clone(),
            unit: config.unit,
            timezone: device.timezone,
            max_retries: config.max_retries,
        })
    }

    /// Build the device_info query URL
    fn feed_url(&self) -> Result<Url> {
        let mut url = self
            .base_url
            .join("device_info.php")
            .map_err(|e| LacrosseError::connection(format!("Invalid feed URL: {e}")))?;

        url.query_pairs_mut()
            .append_pair("deviceid", &self.device_id)
            .append_pair("metric", &self.unit.wire_code().to_string())
            .append_pair("tz", &self.timezone.to_string());

        Ok(url)
    }

    /// Execute HTTP request with retry logic
    async fn execute_request(&self, url: Url) -> Result<reqwest::Response> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            debug!("Feed request attempt {attempt} to {url}");

            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        debug!("Feed request successful: {}", response.status());
                        return Ok(response);
                    }
                    let status = response.status();
                    let response_text = response.text().await.unwrap_or_default();
                    let error_msg = format!("HTTP error {status}: {response_text}");

                    last_error = Some(match status.as_u16() {
                        404 => LacrosseError::not_found(format!(
                            "Device {} not known to the feed",
                            self.device_id
                        )),
                        500..=599 => {
                            LacrosseError::connection(format!("Feed server error: {error_msg}"))
                        }
                        _ => LacrosseError::connection(error_msg),
                    });
                }
                Err(e) => {
                    let error_msg = format!("Feed request failed: {e}");
                    last_error = Some(if e.is_timeout() {
                        LacrosseError::timeout(error_msg)
                    } else if e.is_connect() {
                        LacrosseError::connection(error_msg)
                    } else {
                        LacrosseError::Http(e)
                    });
                }
            }

            if attempt < self.max_retries {
                let delay = Duration::from_millis(100 * u64::from(attempt));
                debug!("Retrying feed request in {delay:?}");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| LacrosseError::connection("All retry attempts failed")))
    }
}

#[async_trait]
impl ObservationSource for LacrosseHttpClient {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    async fn latest_observation(&self) -> Result<Observation> {
        let url = self.feed_url()?;
        let response = self.execute_request(url).await?;

        let text = response
            .text()
            .await
            .map_err(|e| LacrosseError::connection(format!("Failed to read feed response: {e}")))?;

        let feed: DeviceFeed = serde_json::from_str(&text)
            .map_err(|e| LacrosseError::parse(format!("Malformed feed payload: {e}")))?;

        let report = feed.device0.ok_or_else(|| {
            LacrosseError::not_found(format!("No report for device {}", self.device_id))
        })?;

        // Records arrive most-recent first; only the head is consumed.
        let mut observation = report.obs.into_iter().next().ok_or_else(|| {
            LacrosseError::not_found(format!("No observations for device {}", self.device_id))
        })?;

        if observation.device_type.is_none() {
            observation.device_type = report.device_type;
        }

        debug!(
            device_id = %self.device_id,
            utctime = observation.utctime,
            "Fetched latest observation"
        );

        Ok(observation)
    }
}
