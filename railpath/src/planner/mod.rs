//! Itinerary planner using recursive search with backtracking.
//!
//! This module implements the core algorithm that answers: "no direct train
//! suits me; which chain of direct trains through the stations of this one
//! gets me there?"
//!
//! The search consults a [`SelectionPolicy`] at every hop and backtracks
//! when a chosen train leads to a dead end.

mod candidates;
mod config;
mod policy;
mod search;
mod sort;
mod substations;

pub use candidates::CandidateMap;
pub use config::{MAX_TRANSFER_LIMIT_MINS, SearchConfig};
pub use policy::{CandidateFilter, EarliestArrival, FirstCandidate, Selection, SelectionPolicy};
pub use search::{Planner, RouteQuery, RouteRequest, SearchError, SearchOutcome};
pub use sort::{SortField, SortKey, sort_trains};
pub use substations::{StopEntry, StopListProvider, resolve_substations};
