//! Train run types.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::Station;
use super::ticket::{Availability, SeatType, Ticket, TicketStatus};

/// Error returned when constructing an invalid train id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train id: {reason}")]
pub struct InvalidTrainId {
    reason: &'static str,
}

/// The reservation service's internal identifier for a train schedule
/// (e.g. `5l000D220200`).
///
/// Opaque; the only validation is that it is non-empty.
///
/// # Examples
///
/// ```
/// use railpath::domain::TrainId;
///
/// let id = TrainId::new("5l000D220200").unwrap();
/// assert_eq!(id.as_str(), "5l000D220200");
///
/// assert!(TrainId::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TrainId(String);

impl TrainId {
    /// Create a train id, rejecting empty strings.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidTrainId> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidTrainId {
                reason: "train id cannot be empty",
            });
        }
        Ok(TrainId(s))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainId({})", self.0)
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Train category, derived from the first letter of the train name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub enum TrainType {
    K,
    T,
    Z,
    D,
    G,
    C,
    Other,
}

impl TrainType {
    /// Classify a train by its display name (`G21` is high-speed, `T110` express...).
    pub fn from_name(name: &str) -> Self {
        match name.chars().next() {
            Some('K') => TrainType::K,
            Some('T') => TrainType::T,
            Some('Z') => TrainType::Z,
            Some('D') => TrainType::D,
            Some('G') => TrainType::G,
            Some('C') => TrainType::C,
            _ => TrainType::Other,
        }
    }
}

/// Identity of a physical train: the same schedule departing at the same
/// moment. Two query results with equal identity are the same train even
/// when they were found against different destination stations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrainIdentity {
    pub id: TrainId,
    pub departure_time: NaiveDateTime,
}

/// One direct train run between two stations, as returned by a
/// direct-route query.
///
/// `departure_station` and `destination_station` are the stations the run
/// actually serves, which may differ from the queried stations when fuzzy
/// matching is enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainRun {
    /// Internal schedule id.
    pub id: TrainId,
    /// User-facing name such as `D2202`.
    pub name: String,
    pub departure_station: Station,
    pub destination_station: Station,
    pub departure_time: NaiveDateTime,
    pub duration: Duration,
    /// Start date of the underlying schedule. Needed to fetch the stop
    /// list and not always equal to the date the run was queried on.
    pub schedule_date: NaiveDate,
    /// Whether tickets can currently be bought online.
    pub purchasable: bool,
    /// Seat classes the train carries, most expensive first.
    pub tickets: Vec<Ticket>,
}

impl TrainRun {
    /// Arrival time at the destination station.
    pub fn arrival_time(&self) -> NaiveDateTime {
        self.departure_time + self.duration
    }

    /// The (id, departure time) identity used for deduplication.
    pub fn identity(&self) -> TrainIdentity {
        TrainIdentity {
            id: self.id.clone(),
            departure_time: self.departure_time,
        }
    }

    /// Whether `other` is the same physical train.
    pub fn same_train(&self, other: &TrainRun) -> bool {
        self.id == other.id && self.departure_time == other.departure_time
    }

    /// Availability of one seat class, if the train carries it.
    pub fn ticket(&self, seat: SeatType) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.seat == seat)
    }

    /// Whether the run can be booked, and if not, why.
    ///
    /// A run with no seat information is judged by `purchasable` alone.
    pub fn availability(&self) -> Availability {
        let has = |status: TicketStatus| self.tickets.iter().any(|t| t.status == status);

        if has(TicketStatus::Available) || self.tickets.is_empty() {
            if self.purchasable {
                Availability::Bookable
            } else {
                Availability::Unavailable
            }
        } else if has(TicketStatus::NotYetSold) {
            Availability::NotYetSold
        } else if has(TicketStatus::SoldOut) {
            Availability::SoldOut
        } else {
            Availability::Unavailable
        }
    }

    /// Category of this train.
    pub fn train_type(&self) -> TrainType {
        TrainType::from_name(&self.name)
    }
}

impl fmt::Display for TrainRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -> {} {}",
            self.name,
            self.departure_station.name(),
            self.departure_time.format("%m-%d %H:%M"),
            self.destination_station.name(),
            self.arrival_time().format("%m-%d %H:%M"),
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any non-empty string is a valid train id
        #[test]
        fn nonempty_always_valid(s in ".+") {
            prop_assert!(TrainId::new(s).is_ok());
        }

        /// Roundtrip: new then as_str returns the original
        #[test]
        fn roundtrip(s in ".+") {
            let id = TrainId::new(s.clone()).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }
    }
}
