//! Reservation service HTTP client.
//!
//! Provides async methods for the direct-route query and the stop-list
//! lookup, and converts their responses to domain types.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{TrainRun, format_query_date};
use crate::planner::{RouteQuery, RouteRequest, SearchError, StopEntry, StopListProvider};
use crate::stations::StationDirectory;

use super::convert::{convert_query, convert_stop_list};
use super::error::RailError;
use super::types::{Envelope, StopListData, TrainRow};

/// Default base URL for the reservation service.
const DEFAULT_BASE_URL: &str = "https://kyfw.12306.cn/otn";

/// Fare class a direct-route query is priced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pricing {
    #[default]
    Adult,
    Student,
}

impl Pricing {
    /// The `purpose_codes` query parameter for this fare class.
    pub fn purpose_code(self) -> &'static str {
        match self {
            Pricing::Adult => "ADULT",
            Pricing::Student => "0X00",
        }
    }
}

/// Configuration for the reservation service client.
#[derive(Debug, Clone)]
pub struct RailConfig {
    /// Base URL for the API (defaults to the production service)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Fare class used for direct-route queries
    pub pricing: Pricing,
}

impl RailConfig {
    /// Create a config pointing at the production service.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            pricing: Pricing::Adult,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the fare class.
    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }
}

impl Default for RailConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reservation service client.
///
/// Holds the station directory so that telecodes in responses can be turned
/// into full stations.
#[derive(Debug, Clone)]
pub struct RailClient {
    http: reqwest::Client,
    base_url: String,
    pricing: Pricing,
    directory: Arc<StationDirectory>,
}

impl RailClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RailConfig, directory: Arc<StationDirectory>) -> Result<Self, RailError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            pricing: config.pricing,
            directory,
        })
    }

    /// The station directory used to resolve telecodes.
    pub fn directory(&self) -> &StationDirectory {
        &self.directory
    }

    /// Query direct trains for `request`.
    ///
    /// Rows that cannot be converted are skipped. Exactness flags in the
    /// request are applied here, since the service always matches by city.
    pub async fn query_trains(&self, request: &RouteRequest) -> Result<Vec<TrainRun>, RailError> {
        let params = [
            ("leftTicketDTO.train_date", format_query_date(request.date)),
            (
                "leftTicketDTO.from_station",
                request.origin.code().as_str().to_string(),
            ),
            (
                "leftTicketDTO.to_station",
                request.destination.code().as_str().to_string(),
            ),
            ("purpose_codes", self.pricing.purpose_code().to_string()),
        ];

        let rows: Vec<TrainRow> = self.get_envelope("/leftTicket/query", &params).await?;
        let trains = convert_query(&rows, request, &self.directory);

        debug!(
            from = %request.origin,
            to = %request.destination,
            date = %request.date,
            rows = rows.len(),
            trains = trains.len(),
            "Queried direct trains"
        );
        Ok(trains)
    }

    /// Fetch the full stop list of the train behind `run`.
    ///
    /// The service keys schedules by their start date, which is why the
    /// run's schedule date is sent rather than its departure date.
    pub async fn fetch_stop_list(&self, run: &TrainRun) -> Result<Vec<StopEntry>, RailError> {
        let params = [
            ("train_no", run.id.as_str().to_string()),
            (
                "from_station_telecode",
                run.departure_station.code().as_str().to_string(),
            ),
            (
                "to_station_telecode",
                run.destination_station.code().as_str().to_string(),
            ),
            ("depart_date", format_query_date(run.schedule_date)),
        ];

        let data: StopListData = self.get_envelope("/czxx/queryByTrainNo", &params).await?;
        let stops = convert_stop_list(&data.data);

        debug!(train = %run.name, stops = stops.len(), "Fetched stop list");
        Ok(stops)
    }

    /// GET `path` and unwrap the common response envelope.
    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, RailError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http.get(&url).query(params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RailError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_envelope(&body)
    }
}

/// Decode a response body into its payload.
fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, RailError> {
    if body.trim() == "-1" {
        return Err(RailError::InvalidParameters);
    }

    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| RailError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })?;

    if !envelope.status {
        return Err(RailError::from_messages(envelope.messages));
    }

    envelope.data.ok_or(RailError::MissingData)
}

impl RouteQuery for RailClient {
    async fn direct_trains(&self, request: &RouteRequest) -> Result<Vec<TrainRun>, SearchError> {
        self.query_trains(request)
            .await
            .map_err(|e| SearchError::query_failed(request, e))
    }
}

impl StopListProvider for RailClient {
    async fn stop_list(&self, run: &TrainRun) -> Result<Vec<StopEntry>, SearchError> {
        self.fetch_stop_list(run)
            .await
            .map_err(|e| SearchError::stop_list_failed(run, e))
    }
}
