//! Train filtering.
//!
//! [`TrainFilter`] holds the traveller's constraints on which trains are
//! acceptable at all. It plugs into the planner as a [`CandidateFilter`].

mod range;
mod ticket;

use std::collections::HashSet;

use chrono::NaiveTime;
use serde::Deserialize;

use crate::domain::{TrainRun, TrainType};
use crate::planner::CandidateFilter;

pub use range::ValueRange;
pub use ticket::TicketFilter;

/// Constraints a train must satisfy to be offered.
///
/// Checks run in order: a whitelisted name is always accepted, a
/// blacklisted name is always rejected, and everything else must pass the
/// type, purchasability, time, duration and seat checks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrainFilter {
    /// Train names accepted regardless of every other check.
    pub whitelist: HashSet<String>,

    /// Train names never accepted.
    pub blacklist: HashSet<String>,

    /// Accepted train types. `None` accepts every type.
    pub types: Option<HashSet<TrainType>>,

    /// Accepted departure times of day.
    pub departure: ValueRange<NaiveTime>,

    /// Accepted arrival times of day.
    pub arrival: ValueRange<NaiveTime>,

    /// Accepted journey lengths, in minutes.
    pub duration_mins: ValueRange<i64>,

    /// Reject trains that cannot be booked online.
    pub purchasable_only: bool,

    /// Seat classes and sale states that are acceptable.
    pub tickets: TicketFilter,
}

impl TrainFilter {
    /// A filter that accepts every train.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `train` passes the filter.
    pub fn check(&self, train: &TrainRun) -> bool {
        if self.whitelist.contains(&train.name) {
            return true;
        }
        if self.blacklist.contains(&train.name) {
            return false;
        }
        if let Some(types) = &self.types {
            if !types.contains(&train.train_type()) {
                return false;
            }
        }
        if self.purchasable_only && !train.purchasable {
            return false;
        }

        self.departure.contains(&train.departure_time.time())
            && self.arrival.contains(&train.arrival_time().time())
            && self.duration_mins.contains(&train.duration.num_minutes())
            && self.tickets.check(train)
    }
}

impl CandidateFilter for TrainFilter {
    fn accepts(&self, train: &TrainRun) -> bool {
        self.check(train)
    }
}
