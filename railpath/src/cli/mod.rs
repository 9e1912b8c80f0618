//! Command-line front end.
//!
//! A run file names the trip and the search settings; the search then asks
//! on the terminal which train to take at each hop.

mod prompt;

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{Itinerary, format_duration};
use crate::filter::TrainFilter;
use crate::planner::{SearchConfig, SearchError, SortField, SortKey};
use crate::rail::{Pricing, RailError};
use crate::stations::StationError;

pub use prompt::PromptPolicy;

/// Error from a command-line run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("usage: railpath <run.json>")]
    Usage,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid run file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Station(#[from] StationError),

    #[error(transparent)]
    Rail(#[from] RailError),

    #[error(transparent)]
    Search(#[from] SearchError),

    /// The hypothesis train does not run between the requested stations
    #[error("no train {train} from {origin} to {destination} on {date}")]
    HypothesisNotFound {
        train: String,
        origin: String,
        destination: String,
        date: NaiveDate,
    },
}

/// Everything one search needs, as read from a JSON run file.
///
/// ```json
/// {
///   "date": "2024-05-01",
///   "origin": "北京南",
///   "destination": "上海虹桥",
///   "train": "G1",
///   "search": { "min_transfer_mins": 30 },
///   "filter": { "types": ["G", "D"] },
///   "sort": [{ "field": "departure" }]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RunFile {
    /// Departure date of the hypothesis train.
    pub date: NaiveDate,

    /// Origin station: name, telecode or romanized name.
    pub origin: String,

    /// Destination station, in any form `origin` accepts.
    pub destination: String,

    /// Name of the train whose stops bound the search.
    pub train: String,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub filter: TrainFilter,

    /// How candidates are listed. Defaults to departure time.
    #[serde(default = "default_sort")]
    pub sort: Vec<SortKey>,

    #[serde(default)]
    pub pricing: Pricing,

    /// Station list cache location, if not the default.
    #[serde(default)]
    pub station_cache: Option<PathBuf>,
}

fn default_sort() -> Vec<SortKey> {
    vec![SortKey::ascending(SortField::Departure)]
}

impl RunFile {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| CliError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Human-readable itinerary: legs, the changes between them and totals.
pub fn render_itinerary(itinerary: &Itinerary) -> String {
    let mut out = String::new();
    let mut transfers = itinerary.transfers();

    for leg in itinerary {
        let _ = writeln!(out, "{leg}");
        if let Some(transfer) = transfers.next() {
            let wait = format_duration(transfer.wait());
            if transfer.same_station() {
                let _ = writeln!(
                    out,
                    "  change at {}, wait {wait}",
                    transfer.arriving.destination_station
                );
            } else {
                let _ = writeln!(
                    out,
                    "  change from {} to {}, wait {wait}",
                    transfer.arriving.destination_station, transfer.departing.departure_station
                );
            }
        }
    }

    let changes = itinerary.change_count();
    let _ = writeln!(
        out,
        "total {}, {changes} change{}",
        format_duration(itinerary.duration()),
        if changes == 1 { "" } else { "s" }
    );
    out
}
