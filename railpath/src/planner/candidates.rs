//! Candidate next-leg trains for one search level.

use crate::domain::{Station, TrainRun};

/// Ordered candidate trains, each mapped to the farthest remaining station
/// it was found to reach.
///
/// A train is identified by its id and departure time. Inserting a train
/// that is already present replaces the earlier entry and moves it to the
/// end, so the map remembers the most recent (farthest) discovery.
///
/// Trains and reach markers are stored side by side so that the trains can
/// be handed to a selection policy as a plain slice.
#[derive(Debug, Clone, Default)]
pub struct CandidateMap {
    trains: Vec<TrainRun>,
    reaches: Vec<Station>,
}

impl CandidateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate, returning the entry it replaced, if any.
    pub fn insert(&mut self, train: TrainRun, reach: Station) -> Option<(TrainRun, Station)> {
        let replaced = self
            .trains
            .iter()
            .position(|existing| existing.same_train(&train))
            .map(|idx| self.remove(idx));

        self.trains.push(train);
        self.reaches.push(reach);
        replaced
    }

    /// Remove the candidate at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn remove(&mut self, idx: usize) -> (TrainRun, Station) {
        (self.trains.remove(idx), self.reaches.remove(idx))
    }

    /// The candidate at `idx` and its reach marker.
    pub fn get(&self, idx: usize) -> Option<(&TrainRun, &Station)> {
        Some((self.trains.get(idx)?, self.reaches.get(idx)?))
    }

    /// Candidate trains in insertion order.
    pub fn trains(&self) -> &[TrainRun] {
        &self.trains
    }

    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TrainRun, &Station)> {
        self.trains.iter().zip(self.reaches.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StationCode, TrainId};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn station(code: &str) -> Station {
        Station::new(StationCode::parse(code).unwrap(), code, "", "")
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn train(id: &str, dep: NaiveDateTime, to: &str) -> TrainRun {
        TrainRun {
            id: TrainId::new(id).unwrap(),
            name: id.to_string(),
            departure_station: station("AAA"),
            destination_station: station(to),
            departure_time: dep,
            duration: Duration::minutes(30),
            schedule_date: dep.date(),
            purchasable: true,
            tickets: Vec::new(),
        }
    }

    #[test]
    fn insert_keeps_order() {
        let mut map = CandidateMap::new();
        assert!(map.is_empty());

        assert!(map.insert(train("D1", at(8, 0), "BBB"), station("BBB")).is_none());
        assert!(map.insert(train("D2", at(9, 0), "BBB"), station("BBB")).is_none());

        let names: Vec<_> = map.trains().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["D1", "D2"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn duplicate_moves_to_end_with_farther_reach() {
        let mut map = CandidateMap::new();
        map.insert(train("D1", at(8, 0), "BBB"), station("BBB"));
        map.insert(train("D2", at(9, 0), "BBB"), station("BBB"));

        let replaced = map.insert(train("D1", at(8, 0), "CCC"), station("CCC"));
        let (old_train, old_reach) = replaced.unwrap();
        assert_eq!(old_train.destination_station, station("BBB"));
        assert_eq!(old_reach, station("BBB"));

        assert_eq!(map.len(), 2);
        let entries: Vec<_> = map
            .iter()
            .map(|(t, s)| (t.name.as_str(), s.code().as_str().to_string()))
            .collect();
        assert_eq!(
            entries,
            vec![("D2", "BBB".to_string()), ("D1", "CCC".to_string())]
        );
    }

    #[test]
    fn same_id_different_departure_is_distinct() {
        let mut map = CandidateMap::new();
        map.insert(train("D1", at(8, 0), "BBB"), station("BBB"));
        assert!(map.insert(train("D1", at(20, 0), "BBB"), station("BBB")).is_none());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn remove_and_get() {
        let mut map = CandidateMap::new();
        map.insert(train("D1", at(8, 0), "BBB"), station("BBB"));
        map.insert(train("D2", at(9, 0), "CCC"), station("CCC"));

        let (t, s) = map.get(1).unwrap();
        assert_eq!(t.name, "D2");
        assert_eq!(s, &station("CCC"));
        assert!(map.get(2).is_none());

        let (removed, _) = map.remove(0);
        assert_eq!(removed.name, "D1");
        assert_eq!(map.trains()[0].name, "D2");
    }
}
