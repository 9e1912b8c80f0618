//! Station list HTTP client.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::StationError;

/// Default base URL for the reservation service.
const DEFAULT_BASE_URL: &str = "https://kyfw.12306.cn/otn";

/// Path of the script that embeds the full station list.
const STATION_LIST_PATH: &str = "/resources/js/framework/station_name.js";

/// One raw station entry, as published in the station list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StationRecord {
    pub code: String,
    pub name: String,
    pub pinyin: String,
    pub abbreviation: String,
}

/// Configuration for the station list client.
#[derive(Debug, Clone)]
pub struct StationClientConfig {
    /// Base URL for the service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StationClientConfig {
    /// Create a config pointing at the production service.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for StationClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the published station list.
#[derive(Debug, Clone)]
pub struct StationClient {
    http: reqwest::Client,
    base_url: String,
}

impl StationClient {
    /// Create a new station list client.
    pub fn new(config: StationClientConfig) -> Result<Self, StationError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch and decode all stations.
    pub async fn fetch_all(&self) -> Result<Vec<StationRecord>, StationError> {
        let url = format!("{}{}", self.base_url, STATION_LIST_PATH);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let records = parse_station_script(&body)?;
        debug!(count = records.len(), "Fetched station list");
        Ok(records)
    }
}

/// Decode the station list script.
///
/// The payload looks like
/// `var station_names ='@bjb|北京北|VAP|beijingbei|bjb|0@bjd|北京东|BOP|beijingdong|bjd|1';`
/// where each `@`-separated entry holds a sort key, the name, the telecode,
/// the romanized name, the abbreviation and an index.
pub fn parse_station_script(script: &str) -> Result<Vec<StationRecord>, StationError> {
    let parts: Vec<&str> = script.split('\'').collect();
    if parts.len() != 3 {
        return Err(StationError::Format {
            message: format!("expected 3 quote-separated parts, found {}", parts.len()),
        });
    }

    parts[1]
        .split('@')
        .skip(1)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let fields: Vec<&str> = entry.split('|').collect();
            if fields.len() < 5 {
                return Err(StationError::Format {
                    message: format!("station entry has {} fields: {entry}", fields.len()),
                });
            }
            Ok(StationRecord {
                name: fields[1].to_string(),
                code: fields[2].to_string(),
                pinyin: fields[3].to_string(),
                abbreviation: fields[4].to_string(),
            })
        })
        .collect()
}
