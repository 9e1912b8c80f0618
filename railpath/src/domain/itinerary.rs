//! Itinerary types.
//!
//! An `Itinerary` is a complete trip from origin to destination made of one
//! or more direct train runs.

use chrono::{Duration, NaiveDateTime};

use super::{DomainError, Station, TrainRun};

/// A change between two consecutive legs.
#[derive(Debug, Clone, Copy)]
pub struct Transfer<'a> {
    /// The leg being left.
    pub arriving: &'a TrainRun,
    /// The leg being boarded.
    pub departing: &'a TrainRun,
}

impl Transfer<'_> {
    /// Time between arriving and departing.
    pub fn wait(&self) -> Duration {
        self.departing.departure_time - self.arriving.arrival_time()
    }

    /// Whether the change happens within a single station.
    pub fn same_station(&self) -> bool {
        self.arriving.destination_station == self.departing.departure_station
    }
}

/// A complete multi-train trip.
///
/// # Invariants
///
/// - At least one leg
/// - Each leg departs no earlier than the previous leg arrives
#[derive(Debug, Clone)]
pub struct Itinerary {
    legs: Vec<TrainRun>,
}

impl Itinerary {
    /// Constructs an itinerary from legs in travel order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the list is empty or a leg departs before its
    /// predecessor arrives.
    pub fn new(legs: Vec<TrainRun>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        for pair in legs.windows(2) {
            if pair[1].departure_time < pair[0].arrival_time() {
                return Err(DomainError::OverlappingLegs {
                    arriving: pair[0].name.clone(),
                    departing: pair[1].name.clone(),
                });
            }
        }

        Ok(Itinerary { legs })
    }

    /// All legs in travel order.
    pub fn legs(&self) -> &[TrainRun] {
        &self.legs
    }

    /// Number of legs.
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Number of changes (legs - 1).
    pub fn change_count(&self) -> usize {
        self.legs.len() - 1
    }

    /// Changes between consecutive legs.
    pub fn transfers(&self) -> impl Iterator<Item = Transfer<'_>> {
        self.legs.windows(2).map(|pair| Transfer {
            arriving: &pair[0],
            departing: &pair[1],
        })
    }

    /// Whether every change happens within a single station.
    pub fn is_connected(&self) -> bool {
        self.transfers().all(|t| t.same_station())
    }

    /// The first leg's departure station.
    pub fn origin(&self) -> &Station {
        &self.legs[0].departure_station
    }

    /// The last leg's destination station.
    pub fn destination(&self) -> &Station {
        &self.legs[self.legs.len() - 1].destination_station
    }

    /// Departure time of the first leg.
    pub fn departure_time(&self) -> NaiveDateTime {
        self.legs[0].departure_time
    }

    /// Arrival time of the last leg.
    pub fn arrival_time(&self) -> NaiveDateTime {
        self.legs[self.legs.len() - 1].arrival_time()
    }

    /// Total trip duration, waits included.
    pub fn duration(&self) -> Duration {
        self.arrival_time() - self.departure_time()
    }
}

impl<'a> IntoIterator for &'a Itinerary {
    type Item = &'a TrainRun;
    type IntoIter = std::slice::Iter<'a, TrainRun>;

    fn into_iter(self) -> Self::IntoIter {
        self.legs.iter()
    }
}
