//! Caching layer for reservation service responses.
//!
//! Backtracking revisits the same (departure, station, date) queries, and
//! timetables do not change within a session. Caching the converted query
//! results and stop lists keeps a search from hitting the service twice for
//! the same question.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{StationCode, TrainId, TrainRun};
use crate::planner::{RouteQuery, RouteRequest, SearchError, StopEntry, StopListProvider};
use crate::rail::RailClient;

/// Cache key for stop lists: (train id, schedule date, from, to).
type StopKey = (TrainId, NaiveDate, StationCode, StationCode);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per table.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 2000,
        }
    }
}

/// Cache for direct-route queries and stop lists.
pub struct RailCache {
    /// Direct trains, keyed by the full request including exactness flags.
    trains: MokaCache<RouteRequest, Arc<Vec<TrainRun>>>,

    /// Stop lists, keyed by train and schedule date.
    stops: MokaCache<StopKey, Arc<Vec<StopEntry>>>,
}

impl RailCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let trains = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let stops = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { trains, stops }
    }

    fn stop_key(run: &TrainRun) -> StopKey {
        (
            run.id.clone(),
            run.schedule_date,
            run.departure_station.code(),
            run.destination_station.code(),
        )
    }

    pub async fn get_trains(&self, request: &RouteRequest) -> Option<Arc<Vec<TrainRun>>> {
        self.trains.get(request).await
    }

    pub async fn insert_trains(&self, request: RouteRequest, trains: Arc<Vec<TrainRun>>) {
        self.trains.insert(request, trains).await;
    }

    pub async fn get_stops(&self, run: &TrainRun) -> Option<Arc<Vec<StopEntry>>> {
        self.stops.get(&Self::stop_key(run)).await
    }

    pub async fn insert_stops(&self, run: &TrainRun, stops: Arc<Vec<StopEntry>>) {
        self.stops.insert(Self::stop_key(run), stops).await;
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.trains.invalidate_all();
        self.stops.invalidate_all();
    }
}

/// Reservation service client with caching.
///
/// Wraps any route and stop-list source; in production that is a
/// [`RailClient`]. Failed lookups are not cached.
pub struct CachedRailClient<C = RailClient> {
    client: C,
    cache: RailCache,
}

impl<C> CachedRailClient<C> {
    /// Create a new cached client.
    pub fn new(client: C, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: RailCache::new(cache_config),
        }
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}

impl<C: RouteQuery> RouteQuery for CachedRailClient<C> {
    async fn direct_trains(&self, request: &RouteRequest) -> Result<Vec<TrainRun>, SearchError> {
        if let Some(cached) = self.cache.get_trains(request).await {
            debug!(
                from = %request.origin,
                to = %request.destination,
                date = %request.date,
                "Query cache hit"
            );
            return Ok(cached.as_ref().clone());
        }

        let trains = self.client.direct_trains(request).await?;
        self.cache
            .insert_trains(request.clone(), Arc::new(trains.clone()))
            .await;
        Ok(trains)
    }
}

impl<C: StopListProvider> StopListProvider for CachedRailClient<C> {
    async fn stop_list(&self, run: &TrainRun) -> Result<Vec<StopEntry>, SearchError> {
        if let Some(cached) = self.cache.get_stops(run).await {
            debug!(train = %run.name, "Stop list cache hit");
            return Ok(cached.as_ref().clone());
        }

        let stops = self.client.stop_list(run).await?;
        self.cache.insert_stops(run, Arc::new(stops.clone())).await;
        Ok(stops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Station;
    use std::sync::Mutex;

    fn station(code: &str) -> Station {
        Station::new(StationCode::parse(code).unwrap(), code, "", "")
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn request(to: &str, exact: bool) -> RouteRequest {
        RouteRequest::new(station("AAA"), station(to), date(), false, exact)
    }

    fn run() -> TrainRun {
        TrainRun {
            id: TrainId::new("5l000D220200").unwrap(),
            name: "D2202".to_string(),
            departure_station: station("AAA"),
            destination_station: station("BBB"),
            departure_time: date().and_hms_opt(8, 0, 0).unwrap(),
            duration: chrono::Duration::minutes(60),
            schedule_date: date(),
            purchasable: true,
            tickets: Vec::new(),
        }
    }

    /// Source that counts calls and can be told to fail.
    struct Counting {
        calls: Mutex<usize>,
        fail: bool,
    }

    impl Counting {
        fn new(fail: bool) -> Self {
            Self {
                calls: Mutex::new(0),
                fail,
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl RouteQuery for Counting {
        async fn direct_trains(
            &self,
            request: &RouteRequest,
        ) -> Result<Vec<TrainRun>, SearchError> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(SearchError::query_failed(request, "timeout"));
            }
            Ok(vec![run()])
        }
    }

    impl StopListProvider for Counting {
        async fn stop_list(&self, _run: &TrainRun) -> Result<Vec<StopEntry>, SearchError> {
            *self.calls.lock().unwrap() += 1;
            Ok(vec![StopEntry {
                station_name: "AAA".to_string(),
                on_path: true,
            }])
        }
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(600));
        assert_eq!(config.max_capacity, 2000);
    }

    #[tokio::test]
    async fn repeated_query_is_served_from_cache() {
        let cached = CachedRailClient::new(Counting::new(false), &CacheConfig::default());

        let first = cached.direct_trains(&request("BBB", false)).await.unwrap();
        let second = cached.direct_trains(&request("BBB", false)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.client().calls(), 1);
    }

    #[tokio::test]
    async fn key_includes_exactness_and_destination() {
        let cached = CachedRailClient::new(Counting::new(false), &CacheConfig::default());

        cached.direct_trains(&request("BBB", false)).await.unwrap();
        cached.direct_trains(&request("BBB", true)).await.unwrap();
        cached.direct_trains(&request("CCC", false)).await.unwrap();

        assert_eq!(cached.client().calls(), 3);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cached = CachedRailClient::new(Counting::new(true), &CacheConfig::default());

        assert!(cached.direct_trains(&request("BBB", false)).await.is_err());
        assert!(cached.direct_trains(&request("BBB", false)).await.is_err());
        assert_eq!(cached.client().calls(), 2);
    }

    #[tokio::test]
    async fn stop_lists_are_cached() {
        let cached = CachedRailClient::new(Counting::new(false), &CacheConfig::default());

        let first = cached.stop_list(&run()).await.unwrap();
        let second = cached.stop_list(&run()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.client().calls(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cached = CachedRailClient::new(Counting::new(false), &CacheConfig::default());

        cached.direct_trains(&request("BBB", false)).await.unwrap();
        cached.invalidate_cache();
        cached.direct_trains(&request("BBB", false)).await.unwrap();

        assert_eq!(cached.client().calls(), 2);
    }
}
