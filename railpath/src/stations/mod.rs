//! Station directory.
//!
//! Provides name and telecode lookup for every station the reservation
//! service knows about, fetched from its published station list and kept
//! in a disk cache between runs.

mod cache;
mod client;
mod directory;
mod error;

pub use cache::{StationCache, StationCacheConfig};
pub use client::{StationClient, StationClientConfig, StationRecord, parse_station_script};
pub use directory::StationDirectory;
pub use error::StationError;
