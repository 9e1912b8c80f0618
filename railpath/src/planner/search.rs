//! Recursive itinerary search with backtracking.
//!
//! Starting from a hypothesis train that is known to run from the origin to
//! the destination, the planner looks for alternative ways through the
//! stations that train stops at: at each hop it queries direct trains from
//! the current station to every remaining station, asks the selection
//! policy to pick one, and recurses from wherever that train arrives. When a
//! pick leads nowhere it is dropped and the policy is asked again.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::{Itinerary, Station, TrainRun};
use crate::stations::StationDirectory;

use super::candidates::CandidateMap;
use super::config::SearchConfig;
use super::policy::{CandidateFilter, Selection, SelectionPolicy};
use super::substations::{StopListProvider, resolve_substations};

/// Error from itinerary search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// A direct-route query failed
    #[error("query {origin} -> {destination} on {date} failed: {message}")]
    QueryFailed {
        origin: String,
        destination: String,
        date: NaiveDate,
        message: String,
    },

    /// Fetching a train's stop list failed
    #[error("failed to fetch stop list for {train}: {message}")]
    StopListFailed { train: String, message: String },

    /// A collaborator returned data that breaks its contract
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// A station name could not be resolved
    #[error("unknown station: {0}")]
    UnknownStation(String),

    /// The selection policy picked an index outside the candidate list
    #[error("selection {index} is out of range for {count} candidates")]
    InvalidSelection { index: usize, count: usize },

    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
}

impl SearchError {
    /// Wrap a transport failure for `request`.
    pub fn query_failed(request: &RouteRequest, err: impl std::fmt::Display) -> Self {
        SearchError::QueryFailed {
            origin: request.origin.name().to_string(),
            destination: request.destination.name().to_string(),
            date: request.date,
            message: err.to_string(),
        }
    }

    /// Wrap a transport failure while fetching the stop list of `run`.
    pub fn stop_list_failed(run: &TrainRun, err: impl std::fmt::Display) -> Self {
        SearchError::StopListFailed {
            train: run.name.clone(),
            message: err.to_string(),
        }
    }
}

/// One direct-route query.
///
/// With `exact_origin` off the service may return trains leaving from
/// another station in the origin's city; likewise for `exact_destination`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteRequest {
    pub origin: Station,
    pub destination: Station,
    pub date: NaiveDate,
    pub exact_origin: bool,
    pub exact_destination: bool,
}

impl RouteRequest {
    pub fn new(
        origin: Station,
        destination: Station,
        date: NaiveDate,
        exact_origin: bool,
        exact_destination: bool,
    ) -> Self {
        Self {
            origin,
            destination,
            date,
            exact_origin,
            exact_destination,
        }
    }
}

/// Source of direct trains between two stations.
///
/// This abstraction allows the planner to be tested with mock data.
#[allow(async_fn_in_trait)]
pub trait RouteQuery {
    /// Direct trains matching `request`, in the order the service lists them.
    async fn direct_trains(&self, request: &RouteRequest) -> Result<Vec<TrainRun>, SearchError>;
}

/// How a search ended.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// A complete itinerary from the origin to the destination.
    Found(Itinerary),
    /// Every candidate was exhausted or declined.
    NoPath,
    /// The selection policy stopped the search.
    Aborted,
}

impl SearchOutcome {
    /// The itinerary, if one was found.
    pub fn itinerary(&self) -> Option<&Itinerary> {
        match self {
            SearchOutcome::Found(itinerary) => Some(itinerary),
            _ => None,
        }
    }

    pub fn into_itinerary(self) -> Option<Itinerary> {
        match self {
            SearchOutcome::Found(itinerary) => Some(itinerary),
            _ => None,
        }
    }
}

/// Itinerary planner.
pub struct Planner<'a, Q, S> {
    query: &'a Q,
    stops: &'a S,
    directory: &'a StationDirectory,
    config: &'a SearchConfig,
    filter: Option<&'a dyn CandidateFilter>,
}

impl<'a, Q: RouteQuery, S: StopListProvider> Planner<'a, Q, S> {
    /// Create a new planner.
    pub fn new(
        query: &'a Q,
        stops: &'a S,
        directory: &'a StationDirectory,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            query,
            stops,
            directory,
            config,
            filter: None,
        }
    }

    /// Only offer trains accepted by `filter`.
    pub fn with_filter(mut self, filter: &'a dyn CandidateFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Search for an itinerary through the stations `hypothesis` stops at.
    ///
    /// `hypothesis` anchors the search: it fixes the origin, the first
    /// departure date and the set of stations a change may happen at. It is
    /// not itself part of the result unless the policy picks it again.
    pub async fn search<P>(
        &self,
        hypothesis: &TrainRun,
        policy: &mut P,
    ) -> Result<SearchOutcome, SearchError>
    where
        P: SelectionPolicy + ?Sized,
    {
        self.config.validate()?;

        let substations =
            resolve_substations(self.stops, self.directory, self.config, hypothesis).await?;
        info!(
            train = %hypothesis.name,
            from = %hypothesis.departure_station,
            to = %hypothesis.destination_station,
            substations = substations.len(),
            "Starting itinerary search"
        );

        let mut legs = vec![hypothesis.clone()];
        let outcome = self.extend(&mut legs, &substations, policy).await?;

        match &outcome {
            SearchOutcome::Found(itinerary) => info!(
                legs = itinerary.leg_count(),
                arrival = %itinerary.arrival_time(),
                "Itinerary found"
            ),
            SearchOutcome::NoPath => info!("No itinerary found"),
            SearchOutcome::Aborted => info!("Search aborted"),
        }
        Ok(outcome)
    }

    /// Extend `legs` towards the last station of `remaining`.
    ///
    /// `legs[0]` is the hypothesis; every later entry is a chosen leg.
    /// `remaining` is never empty and always ends at the destination.
    async fn extend<P>(
        &self,
        legs: &mut Vec<TrainRun>,
        remaining: &[Station],
        policy: &mut P,
    ) -> Result<SearchOutcome, SearchError>
    where
        P: SelectionPolicy + ?Sized,
    {
        let mut candidates = self.collect_candidates(legs, remaining).await?;

        loop {
            if candidates.is_empty() {
                debug!(depth = legs.len() - 1, "No candidates at this hop");
                return Ok(SearchOutcome::NoPath);
            }

            let idx = match policy.select(candidates.trains()) {
                Selection::Pick(idx) => idx,
                Selection::Decline => {
                    debug!(depth = legs.len() - 1, "Candidates declined");
                    return Ok(SearchOutcome::NoPath);
                }
                Selection::Abort => return Ok(SearchOutcome::Aborted),
            };

            let Some((train, reach)) = candidates.get(idx) else {
                return Err(SearchError::InvalidSelection {
                    index: idx,
                    count: candidates.len(),
                });
            };

            let Some(pos) = remaining.iter().position(|s| s == reach) else {
                return Err(SearchError::ContractViolation(format!(
                    "{reach} is not a remaining station"
                )));
            };
            let rest = &remaining[pos + 1..];

            legs.push(train.clone());

            if rest.is_empty() {
                let itinerary = Itinerary::new(legs[1..].to_vec())
                    .map_err(|e| SearchError::ContractViolation(e.to_string()))?;
                return Ok(SearchOutcome::Found(itinerary));
            }

            match Box::pin(self.extend(legs, rest, policy)).await? {
                SearchOutcome::NoPath => {
                    if let Some(failed) = legs.pop() {
                        info!(train = %failed.name, reach = %reach, "Backtracking");
                    }
                    candidates.remove(idx);
                }
                outcome => return Ok(outcome),
            }
        }
    }

    /// Query every remaining station on every eligible date and gather the
    /// trains that could be the next leg.
    async fn collect_candidates(
        &self,
        legs: &[TrainRun],
        remaining: &[Station],
    ) -> Result<CandidateMap, SearchError> {
        let (Some(previous), Some(destination)) = (legs.last(), remaining.last()) else {
            return Err(SearchError::InvalidRequest(
                "search state has no legs or no remaining stations".to_string(),
            ));
        };
        let first_hop = legs.len() == 1;

        let (departure, dates, exact_departure) = if first_hop {
            (
                &previous.departure_station,
                vec![previous.departure_time.date()],
                self.config.exact_origin,
            )
        } else {
            (
                &previous.destination_station,
                self.config.transfer_dates(previous.arrival_time()),
                self.config.exact_substations,
            )
        };

        let mut candidates = CandidateMap::new();

        for station in remaining {
            let exact_destination = if station == destination {
                self.config.exact_destination
            } else {
                self.config.exact_substations
            };

            for &date in &dates {
                let request = RouteRequest::new(
                    departure.clone(),
                    station.clone(),
                    date,
                    exact_departure,
                    exact_destination,
                );
                let trains = self.query.direct_trains(&request).await?;
                debug!(
                    from = %departure,
                    to = %station,
                    %date,
                    count = trains.len(),
                    "Queried direct trains"
                );

                for train in trains {
                    if !first_hop
                        && !self
                            .config
                            .transfer_allowed(previous.arrival_time(), train.departure_time)
                    {
                        continue;
                    }
                    if let Some(filter) = self.filter {
                        if !filter.accepts(&train) {
                            continue;
                        }
                    }
                    if let Some((replaced, _)) = candidates.insert(train, station.clone()) {
                        debug!(
                            train = %replaced.name,
                            reach = %station,
                            "Candidate reaches farther"
                        );
                    }
                }
            }
        }

        Ok(candidates)
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
