//! Station lookup.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::domain::{Station, StationCode};

use super::cache::StationCache;
use super::client::{StationClient, StationRecord, parse_station_script};
use super::error::StationError;

/// Immutable station reference data with lookups by name, telecode,
/// romanized name and abbreviation.
///
/// Loaded once and shared for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    stations: Vec<Station>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<StationCode, usize>,
    by_pinyin: HashMap<String, usize>,
    by_abbreviation: HashMap<String, Vec<usize>>,
}

impl StationDirectory {
    /// Build a directory from stations. Later duplicates of a name or code
    /// shadow earlier ones in the lookups.
    pub fn new(stations: Vec<Station>) -> Self {
        let mut directory = Self {
            stations,
            ..Self::default()
        };

        for (idx, station) in directory.stations.iter().enumerate() {
            directory.by_name.insert(station.name().to_string(), idx);
            directory.by_code.insert(station.code(), idx);
            directory
                .by_pinyin
                .insert(station.pinyin().to_string(), idx);
            directory
                .by_abbreviation
                .entry(station.abbreviation().to_string())
                .or_default()
                .push(idx);
        }

        directory
    }

    /// Build a directory from raw records, skipping entries whose telecode
    /// is malformed.
    pub fn from_records(records: Vec<StationRecord>) -> Self {
        let stations = records
            .into_iter()
            .filter_map(|record| match StationCode::parse(&record.code) {
                Ok(code) => Some(Station::new(
                    code,
                    record.name,
                    record.pinyin,
                    record.abbreviation,
                )),
                Err(e) => {
                    warn!(code = %record.code, name = %record.name, error = %e, "Skipping station");
                    None
                }
            })
            .collect();

        Self::new(stations)
    }

    /// Build a directory from the raw `station_name.js` payload.
    pub fn parse_js(script: &str) -> Result<Self, StationError> {
        parse_station_script(script).map(Self::from_records)
    }

    /// Load the directory, preferring a fresh disk snapshot and falling back
    /// to the network. A successful fetch refreshes the snapshot; failing to
    /// write it is logged and otherwise ignored.
    pub async fn load(client: &StationClient, cache: &StationCache) -> Result<Self, StationError> {
        if let Some(records) = cache.load() {
            info!(
                count = records.len(),
                path = %cache.path().display(),
                "Loaded station list from cache"
            );
            return Ok(Self::from_records(records));
        }

        let records = client.fetch_all().await?;
        if let Err(e) = cache.save(&records) {
            warn!(error = %e, "Failed to write station cache");
        }
        info!(count = records.len(), "Fetched station list");
        Ok(Self::from_records(records))
    }

    /// Look up a station by its display name.
    pub fn by_name(&self, name: &str) -> Result<Station, StationError> {
        self.by_name
            .get(name)
            .map(|&idx| self.stations[idx].clone())
            .ok_or_else(|| StationError::NotFound(name.to_string()))
    }

    /// Look up a station by telecode.
    pub fn by_code(&self, code: StationCode) -> Result<Station, StationError> {
        self.by_code
            .get(&code)
            .map(|&idx| self.stations[idx].clone())
            .ok_or_else(|| StationError::NotFound(code.to_string()))
    }

    /// Look up a station by romanized name.
    pub fn by_pinyin(&self, pinyin: &str) -> Result<Station, StationError> {
        self.by_pinyin
            .get(pinyin)
            .map(|&idx| self.stations[idx].clone())
            .ok_or_else(|| StationError::NotFound(pinyin.to_string()))
    }

    /// All stations sharing an abbreviation. Abbreviations are ambiguous,
    /// so the caller has to choose.
    pub fn by_abbreviation(&self, abbreviation: &str) -> Result<Vec<&Station>, StationError> {
        self.by_abbreviation
            .get(abbreviation)
            .map(|indices| indices.iter().map(|&idx| &self.stations[idx]).collect())
            .ok_or_else(|| StationError::NotFound(abbreviation.to_string()))
    }

    /// Resolve user input: a display name, a telecode or a romanized name.
    pub fn resolve(&self, query: &str) -> Result<Station, StationError> {
        self.by_name(query)
            .or_else(|_| match StationCode::parse(query) {
                Ok(code) => self.by_code(code),
                Err(_) => Err(StationError::NotFound(query.to_string())),
            })
            .or_else(|_| self.by_pinyin(query))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }
}
