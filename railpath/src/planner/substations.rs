//! Intermediate stations of a train run.

use tracing::{debug, error};

use crate::domain::{Station, TrainRun};
use crate::stations::StationDirectory;

use super::config::SearchConfig;
use super::search::SearchError;

/// One stop on a train's full route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopEntry {
    pub station_name: String,
    /// Whether the stop lies within the span between the run's departure
    /// and destination stations.
    pub on_path: bool,
}

/// Source of full stop lists.
#[allow(async_fn_in_trait)]
pub trait StopListProvider {
    /// All stops of the train behind `run`, in route order, flagged with
    /// whether each lies on the run's travelled span.
    async fn stop_list(&self, run: &TrainRun) -> Result<Vec<StopEntry>, SearchError>;
}

/// Resolve the stations `run` stops at after its departure station, ending
/// with its destination station.
///
/// Blacklisted intermediate stations are dropped; the destination is always
/// kept.
///
/// # Errors
///
/// `ContractViolation` when the stop list has no on-path span or its span
/// does not begin and end at the run's own stations. `UnknownStation` when
/// an intermediate stop is missing from the directory.
pub async fn resolve_substations<S: StopListProvider>(
    provider: &S,
    directory: &StationDirectory,
    config: &SearchConfig,
    run: &TrainRun,
) -> Result<Vec<Station>, SearchError> {
    let stops = provider.stop_list(run).await?;

    let Some(start) = stops.iter().position(|stop| stop.on_path) else {
        error!(train = %run.name, "Stop list has no on-path stations");
        return Err(SearchError::ContractViolation(format!(
            "stop list for {} has no on-path stations",
            run.name
        )));
    };
    let end = stops[start..]
        .iter()
        .position(|stop| !stop.on_path)
        .map_or(stops.len(), |offset| start + offset);

    let first = &stops[start].station_name;
    if first != run.departure_station.name() {
        error!(
            train = %run.name,
            expected = %run.departure_station.name(),
            found = %first,
            "Stop list starts at wrong station"
        );
        return Err(SearchError::ContractViolation(format!(
            "stop list for {} starts at {first}, expected {}",
            run.name,
            run.departure_station.name()
        )));
    }

    let last = &stops[end - 1].station_name;
    if last != run.destination_station.name() {
        error!(
            train = %run.name,
            expected = %run.destination_station.name(),
            found = %last,
            "Stop list ends at wrong station"
        );
        return Err(SearchError::ContractViolation(format!(
            "stop list for {} ends at {last}, expected {}",
            run.name,
            run.destination_station.name()
        )));
    }

    let between = stops.get(start + 1..end - 1).unwrap_or_default();
    let mut stations = Vec::with_capacity(between.len() + 1);
    for stop in between {
        if config.is_blacklisted(&stop.station_name) {
            debug!(station = %stop.station_name, "Skipping blacklisted station");
            continue;
        }
        let station = directory
            .by_name(&stop.station_name)
            .map_err(|_| SearchError::UnknownStation(stop.station_name.clone()))?;
        stations.push(station);
    }
    stations.push(run.destination_station.clone());

    debug!(train = %run.name, count = stations.len(), "Resolved substations");
    Ok(stations)
}
