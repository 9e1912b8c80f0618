//! Domain types for the itinerary planner.
//!
//! This module contains the core domain model types that represent
//! validated rail data. All types enforce their invariants at construction
//! time, so code that receives these types can trust their validity.

mod error;
mod itinerary;
mod station;
mod ticket;
mod time;
mod train;

pub use error::DomainError;
pub use itinerary::{Itinerary, Transfer};
pub use station::{InvalidStationCode, Station, StationCode};
pub use ticket::{Availability, SeatType, Ticket, TicketStatus};
pub use time::{
    TimeError, dates_between, format_duration, format_query_date, parse_clock_time,
    parse_compact_date,
};
pub use train::{InvalidTrainId, TrainId, TrainIdentity, TrainRun, TrainType};
