//! Search configuration for the itinerary planner.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::domain::dates_between;

use super::search::SearchError;

/// Longest transfer window accepted, in minutes (three days). Every extra
/// day in the window is another round of queries per station.
pub const MAX_TRANSFER_LIMIT_MINS: i64 = 3 * 24 * 60;

/// Configuration parameters for itinerary search.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum time between arriving on one leg and departing on the next (minutes).
    pub min_transfer_mins: i64,

    /// Maximum time between arriving on one leg and departing on the next (minutes).
    pub max_transfer_mins: i64,

    /// Only accept trains leaving from the exact origin station, not another
    /// station in the same city.
    pub exact_origin: bool,

    /// Only accept trains arriving at the exact final destination station.
    pub exact_destination: bool,

    /// Require exact station matches at every intermediate change.
    /// With this off, a change may involve moving between two stations of
    /// the same city.
    pub exact_substations: bool,

    /// Station names that must never be used as a change point.
    pub blacklist: HashSet<String>,
}

impl SearchConfig {
    /// Create a configuration with the given transfer window and default flags.
    pub fn new(min_transfer_mins: i64, max_transfer_mins: i64) -> Self {
        Self {
            min_transfer_mins,
            max_transfer_mins,
            ..Self::default()
        }
    }

    /// Returns the minimum transfer time as a Duration, saturating for
    /// values chrono cannot represent.
    pub fn min_transfer(&self) -> Duration {
        saturating_minutes(self.min_transfer_mins)
    }

    /// Returns the maximum transfer time as a Duration, saturating for
    /// values chrono cannot represent.
    pub fn max_transfer(&self) -> Duration {
        saturating_minutes(self.max_transfer_mins)
    }

    /// Whether a train departing at `departure` can be caught after
    /// arriving at `arrival`.
    pub fn transfer_allowed(&self, arrival: NaiveDateTime, departure: NaiveDateTime) -> bool {
        let gap = departure - arrival;
        gap >= self.min_transfer() && gap <= self.max_transfer()
    }

    /// Every date a connecting train may depart on after arriving at `arrival`.
    ///
    /// Empty when the window runs past the end of the calendar.
    pub fn transfer_dates(&self, arrival: NaiveDateTime) -> Vec<NaiveDate> {
        let earliest = arrival.checked_add_signed(self.min_transfer());
        let latest = arrival.checked_add_signed(self.max_transfer());
        match (earliest, latest) {
            (Some(earliest), Some(latest)) => dates_between(earliest, latest),
            _ => Vec::new(),
        }
    }

    /// Whether a station name is excluded as a change point.
    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.blacklist.contains(name)
    }

    /// Reject windows that can never be satisfied.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.min_transfer_mins < 0 {
            return Err(SearchError::InvalidRequest(format!(
                "minimum transfer time is negative ({} minutes)",
                self.min_transfer_mins
            )));
        }
        if self.min_transfer_mins > self.max_transfer_mins {
            return Err(SearchError::InvalidRequest(format!(
                "transfer window is inverted ({} > {} minutes)",
                self.min_transfer_mins, self.max_transfer_mins
            )));
        }
        if self.max_transfer_mins > MAX_TRANSFER_LIMIT_MINS {
            return Err(SearchError::InvalidRequest(format!(
                "maximum transfer time is too long ({} > {MAX_TRANSFER_LIMIT_MINS} minutes)",
                self.max_transfer_mins
            )));
        }
        Ok(())
    }
}

fn saturating_minutes(mins: i64) -> Duration {
    Duration::try_minutes(mins).unwrap_or(if mins < 0 {
        Duration::MIN
    } else {
        Duration::MAX
    })
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_transfer_mins: 20,
            max_transfer_mins: 180, // 3 hours
            exact_origin: false,
            exact_destination: false,
            exact_substations: true,
            blacklist: HashSet::new(),
        }
    }
}
