//! Candidate ordering for display.
//!
//! The search itself never reorders candidates; this is used by front ends
//! that want to show trains in a more useful order.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::domain::{TrainRun, TrainType};

/// Field a train list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Train type, then the number within the type (`G7` before `G12`).
    Name,
    Departure,
    Arrival,
    Duration,
}

/// One ordering step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SortKey {
    pub field: SortField,
    #[serde(default)]
    pub descending: bool,
}

impl SortKey {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    fn compare(&self, a: &TrainRun, b: &TrainRun) -> Ordering {
        let ordering = match self.field {
            SortField::Name => name_key(&a.name).cmp(&name_key(&b.name)),
            SortField::Departure => a.departure_time.cmp(&b.departure_time),
            SortField::Arrival => a.arrival_time().cmp(&b.arrival_time()),
            SortField::Duration => a.duration.cmp(&b.duration),
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Sort trains by `keys`.
///
/// Each key is applied as a stable sort in turn, so the last key is the
/// primary ordering and earlier keys break its ties.
pub fn sort_trains(trains: &mut [TrainRun], keys: &[SortKey]) {
    for key in keys {
        trains.sort_by(|a, b| key.compare(a, b));
    }
}

/// Ordering key for a train name: its type, then the number that follows
/// the type letter. Names without a number sort after those with one.
fn name_key(name: &str) -> (TrainType, u32, &str) {
    let digits = name.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let number = digits.parse().unwrap_or(u32::MAX);
    (TrainType::from_name(name), number, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Station, StationCode, TrainId};
    use chrono::{Duration, NaiveDate};

    fn train(name: &str, hour: u32, mins: i64) -> TrainRun {
        let station = Station::new(StationCode::parse("AAA").unwrap(), "A", "", "");
        let dep = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        TrainRun {
            id: TrainId::new(format!("id-{name}")).unwrap(),
            name: name.to_string(),
            departure_station: station.clone(),
            destination_station: station,
            departure_time: dep,
            duration: Duration::minutes(mins),
            schedule_date: dep.date(),
            purchasable: true,
            tickets: Vec::new(),
        }
    }

    fn names(trains: &[TrainRun]) -> Vec<&str> {
        trains.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn sort_by_departure() {
        let mut trains = vec![train("D2", 10, 60), train("D1", 8, 60), train("D3", 9, 60)];
        sort_trains(&mut trains, &[SortKey::ascending(SortField::Departure)]);
        assert_eq!(names(&trains), vec!["D1", "D3", "D2"]);

        sort_trains(&mut trains, &[SortKey::descending(SortField::Departure)]);
        assert_eq!(names(&trains), vec!["D2", "D3", "D1"]);
    }

    #[test]
    fn sort_by_arrival_and_duration() {
        let mut trains = vec![train("K1", 8, 300), train("G1", 10, 60), train("D1", 9, 90)];

        sort_trains(&mut trains, &[SortKey::ascending(SortField::Arrival)]);
        assert_eq!(names(&trains), vec!["D1", "G1", "K1"]);

        sort_trains(&mut trains, &[SortKey::ascending(SortField::Duration)]);
        assert_eq!(names(&trains), vec!["G1", "D1", "K1"]);
    }

    #[test]
    fn name_sort_groups_by_type_then_number() {
        let mut trains = vec![
            train("G12", 8, 60),
            train("D5", 8, 60),
            train("G7", 8, 60),
            train("K143", 8, 60),
            train("1461", 8, 60),
        ];
        sort_trains(&mut trains, &[SortKey::ascending(SortField::Name)]);
        assert_eq!(names(&trains), vec!["K143", "D5", "G7", "G12", "1461"]);
    }

    #[test]
    fn last_key_is_primary() {
        let mut trains = vec![
            train("G2", 9, 60),
            train("G1", 8, 120),
            train("D1", 10, 60),
        ];
        sort_trains(
            &mut trains,
            &[
                SortKey::ascending(SortField::Departure),
                SortKey::ascending(SortField::Duration),
            ],
        );
        // Duration is primary; departure breaks the 60-minute tie.
        assert_eq!(names(&trains), vec!["G2", "D1", "G1"]);
    }

    #[test]
    fn empty_keys_leave_order_unchanged() {
        let mut trains = vec![train("G2", 9, 60), train("G1", 8, 120)];
        sort_trains(&mut trains, &[]);
        assert_eq!(names(&trains), vec!["G2", "G1"]);
    }

    #[test]
    fn deserialize_keys() {
        let keys: Vec<SortKey> = serde_json::from_str(
            r#"[{"field": "departure"}, {"field": "duration", "descending": true}]"#,
        )
        .unwrap();
        assert_eq!(
            keys,
            vec![
                SortKey::ascending(SortField::Departure),
                SortKey::descending(SortField::Duration),
            ]
        );
    }
}
