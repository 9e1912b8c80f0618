//! Reservation service client.
//!
//! This module provides an HTTP client for the two endpoints the planner
//! needs: the direct-route train query and the per-train stop list.
//!
//! Key characteristics of the service:
//! - Every JSON response is wrapped in a `{status, messages, data}` envelope;
//!   malformed parameters get a bare `-1` instead
//! - Stations are matched by city unless the caller filters on the exact
//!   telecode
//! - Trains are identified by an internal `train_no`, and stop lists are
//!   keyed by the schedule start date, not the date the train passes through

mod client;
mod convert;
mod error;
mod types;

pub use client::{Pricing, RailClient, RailConfig};
pub use convert::{
    ConversionError, convert_query, convert_stop_list, convert_tickets, convert_train,
    parse_seat_counts,
};
pub use error::RailError;
pub use types::{Envelope, StopDto, StopListData, TrainDto, TrainRow};
