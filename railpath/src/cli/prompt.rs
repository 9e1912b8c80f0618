//! Interactive candidate selection.

use std::io::{BufRead, Write};

use tracing::warn;

use crate::domain::{Availability, TicketStatus, TrainRun, format_duration};
use crate::planner::{Selection, SelectionPolicy, SortKey, sort_trains};

/// Input that declines the offered candidates.
const DECLINE: &str = "-";

/// Input that aborts the search.
const ABORT: &str = "q";

/// Selection policy that asks a person.
///
/// Candidates are listed, numbered from 1, in `sort` order. The answer is
/// a listed number, a train name, `-` to decline or `q` to abort. A name
/// offered on several dates picks the first listed. End of input aborts.
pub struct PromptPolicy<R, W> {
    input: R,
    output: W,
    sort: Vec<SortKey>,
}

impl<R: BufRead, W: Write> PromptPolicy<R, W> {
    pub fn new(input: R, output: W, sort: Vec<SortKey>) -> Self {
        Self {
            input,
            output,
            sort,
        }
    }

    /// Give back the output, e.g. to inspect what was printed.
    pub fn into_output(self) -> W {
        self.output
    }

    fn list(&mut self, shown: &[TrainRun]) -> std::io::Result<()> {
        writeln!(self.output)?;
        for (n, train) in shown.iter().enumerate() {
            write!(
                self.output,
                "  {:>2}. {train}  ({})",
                n + 1,
                format_duration(train.duration)
            )?;
            match train.availability() {
                Availability::Bookable => {}
                Availability::NotYetSold => write!(self.output, "  [not yet on sale]")?,
                Availability::SoldOut => write!(self.output, "  [sold out]")?,
                Availability::Unavailable => write!(self.output, "  [not bookable]")?,
            }
            writeln!(self.output)?;

            let seats: Vec<String> = train
                .tickets
                .iter()
                .filter(|t| t.status != TicketStatus::NotApplicable)
                .map(ToString::to_string)
                .collect();
            if !seats.is_empty() {
                writeln!(self.output, "      {}", seats.join(", "))?;
            }
        }
        Ok(())
    }

    fn ask(&mut self) -> std::io::Result<Option<String>> {
        write!(
            self.output,
            "number or train name, '{DECLINE}' to decline, '{ABORT}' to abort: "
        )?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, candidates: &[TrainRun]) -> std::io::Result<Selection> {
        let mut shown = candidates.to_vec();
        sort_trains(&mut shown, &self.sort);
        self.list(&shown)?;

        loop {
            let Some(answer) = self.ask()? else {
                return Ok(Selection::Abort);
            };
            match answer.as_str() {
                "" => continue,
                DECLINE => return Ok(Selection::Decline),
                ABORT => return Ok(Selection::Abort),
                answer => {
                    let chosen = match answer.parse::<usize>() {
                        Ok(n) => n.checked_sub(1).and_then(|i| shown.get(i)),
                        Err(_) => shown.iter().find(|t| t.name.eq_ignore_ascii_case(answer)),
                    };
                    let picked =
                        chosen.and_then(|t| candidates.iter().position(|c| c.same_train(t)));
                    match picked {
                        Some(idx) => return Ok(Selection::Pick(idx)),
                        None => writeln!(self.output, "no candidate {answer}")?,
                    }
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> SelectionPolicy for PromptPolicy<R, W> {
    fn select(&mut self, candidates: &[TrainRun]) -> Selection {
        match self.prompt(candidates) {
            Ok(selection) => selection,
            Err(e) => {
                warn!(error = %e, "Prompt failed, aborting search");
                Selection::Abort
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SeatType, Station, StationCode, Ticket, TrainId};
    use crate::planner::SortField;
    use chrono::{Duration, NaiveDate};
    use std::io::Cursor;

    fn train(name: &str, day: u32, hour: u32) -> TrainRun {
        let a = Station::new(StationCode::parse("AAA").unwrap(), "甲", "", "");
        let b = Station::new(StationCode::parse("BBB").unwrap(), "乙", "", "");
        let dep = NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        TrainRun {
            id: TrainId::new(format!("id-{name}")).unwrap(),
            name: name.to_string(),
            departure_station: a,
            destination_station: b,
            departure_time: dep,
            duration: Duration::minutes(90),
            schedule_date: dep.date(),
            purchasable: true,
            tickets: Vec::new(),
        }
    }

    fn policy(input: &str) -> PromptPolicy<Cursor<Vec<u8>>, Vec<u8>> {
        PromptPolicy::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            vec![SortKey::ascending(SortField::Departure)],
        )
    }

    fn candidates() -> Vec<TrainRun> {
        vec![train("G9", 1, 12), train("D3", 1, 8), train("K7", 1, 10)]
    }

    #[test]
    fn picks_by_name() {
        let mut policy = policy("D3\n");
        assert_eq!(policy.select(&candidates()), Selection::Pick(1));
    }

    #[test]
    fn name_match_ignores_case() {
        let mut policy = policy("k7\n");
        assert_eq!(policy.select(&candidates()), Selection::Pick(2));
    }

    #[test]
    fn decline_and_abort() {
        assert_eq!(policy("-\n").select(&candidates()), Selection::Decline);
        assert_eq!(policy("q\n").select(&candidates()), Selection::Abort);
    }

    #[test]
    fn end_of_input_aborts() {
        assert_eq!(policy("").select(&candidates()), Selection::Abort);
    }

    #[test]
    fn unknown_name_asks_again() {
        let mut policy = policy("Z1\n\n0\n4\nG9\n");
        assert_eq!(policy.select(&candidates()), Selection::Pick(0));

        let printed = String::from_utf8(policy.into_output()).unwrap();
        assert!(printed.contains("no candidate Z1"));
        assert!(printed.contains("no candidate 0"));
        assert!(printed.contains("no candidate 4"));
        assert_eq!(printed.matches("to abort: ").count(), 5);
    }

    #[test]
    fn lists_in_sort_order() {
        let mut policy = policy("q\n");
        policy.select(&candidates());

        let printed = String::from_utf8(policy.into_output()).unwrap();
        let d3 = printed.find("D3").unwrap();
        let k7 = printed.find("K7").unwrap();
        let g9 = printed.find("G9").unwrap();
        assert!(d3 < k7 && k7 < g9);
        assert!(printed.contains("   1. D3 "));
        assert!(printed.contains("   3. G9 "));
        assert!(printed.contains("(1h30m)"));
    }

    #[test]
    fn picks_by_number() {
        // Listed as D3, K7, G9
        let mut policy = policy("2\n");
        assert_eq!(policy.select(&candidates()), Selection::Pick(2));
    }

    #[test]
    fn number_reaches_later_date_of_repeated_name() {
        let offered = vec![train("G9", 2, 7), train("G9", 1, 12)];
        let mut policy = policy("2\n");
        assert_eq!(policy.select(&offered), Selection::Pick(0));
    }

    #[test]
    fn labels_seat_availability() {
        let mut sold_out = train("K7", 1, 10);
        sold_out.tickets = vec![Ticket {
            seat: SeatType::HardSleeper,
            status: TicketStatus::SoldOut,
            count: 0,
        }];
        let mut not_yet = train("D3", 1, 8);
        not_yet.tickets = vec![Ticket {
            seat: SeatType::SecondClass,
            status: TicketStatus::NotYetSold,
            count: 0,
        }];
        let mut open = train("G9", 1, 12);
        open.tickets = vec![
            Ticket {
                seat: SeatType::FirstClass,
                status: TicketStatus::SoldOut,
                count: 0,
            },
            Ticket {
                seat: SeatType::SecondClass,
                status: TicketStatus::Available,
                count: 21,
            },
        ];
        let mut offline = train("T1", 1, 9);
        offline.purchasable = false;

        let mut policy = policy("q\n");
        policy.select(&[sold_out, not_yet, open, offline]);

        let printed = String::from_utf8(policy.into_output()).unwrap();
        let line = |name: &str| {
            printed
                .lines()
                .find(|l| l.contains(&format!(". {name} ")))
                .unwrap()
                .to_string()
        };
        assert!(line("K7").ends_with("[sold out]"));
        assert!(line("D3").ends_with("[not yet on sale]"));
        assert!(line("T1").ends_with("[not bookable]"));
        assert!(line("G9").ends_with("(1h30m)"));
        assert!(printed.contains("一等座 sold out, 二等座 21"));
        assert!(printed.contains("硬卧 sold out"));
    }

    #[test]
    fn repeated_name_picks_first_listed() {
        // G9 on the 2nd departs later than G9 on the 1st
        let offered = vec![train("G9", 2, 7), train("G9", 1, 12)];
        let mut policy = policy("G9\n");
        assert_eq!(policy.select(&offered), Selection::Pick(1));
    }
}
