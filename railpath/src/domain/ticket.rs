//! Seat availability.
//!
//! A direct-route query reports, for every seat class a train carries,
//! whether it is on sale and how many seats are left.

use std::fmt;

use serde::Deserialize;

/// Seat class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatType {
    Business,
    Special,
    FirstClass,
    SecondClass,
    SoftSleeperPro,
    SoftSleeper,
    HardSleeper,
    SoftSeat,
    HardSeat,
    NoSeat,
    Other,
}

impl SeatType {
    /// Every seat class, most expensive first.
    pub const ALL: [SeatType; 11] = [
        SeatType::Business,
        SeatType::Special,
        SeatType::FirstClass,
        SeatType::SecondClass,
        SeatType::SoftSleeperPro,
        SeatType::SoftSleeper,
        SeatType::HardSleeper,
        SeatType::SoftSeat,
        SeatType::HardSeat,
        SeatType::NoSeat,
        SeatType::Other,
    ];

    /// Seat class for a one-character code in the packed seat counts.
    ///
    /// Some classes have two codes.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            b'9' => Some(SeatType::Business),
            b'P' => Some(SeatType::Special),
            b'M' | b'7' => Some(SeatType::FirstClass),
            b'O' | b'8' => Some(SeatType::SecondClass),
            b'6' => Some(SeatType::SoftSleeperPro),
            b'4' => Some(SeatType::SoftSleeper),
            b'3' => Some(SeatType::HardSleeper),
            b'2' => Some(SeatType::SoftSeat),
            b'1' => Some(SeatType::HardSeat),
            b'W' => Some(SeatType::NoSeat),
            b'E' => Some(SeatType::Other),
            _ => None,
        }
    }

    /// Name printed on the ticket.
    pub fn label(self) -> &'static str {
        match self {
            SeatType::Business => "商务座",
            SeatType::Special => "特等座",
            SeatType::FirstClass => "一等座",
            SeatType::SecondClass => "二等座",
            SeatType::SoftSleeperPro => "高级软卧",
            SeatType::SoftSleeper => "软卧",
            SeatType::HardSleeper => "硬卧",
            SeatType::SoftSeat => "软座",
            SeatType::HardSeat => "硬座",
            SeatType::NoSeat => "无座",
            SeatType::Other => "其他",
        }
    }
}

impl fmt::Display for SeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sale state of one seat class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    /// The train does not carry this class.
    NotApplicable,
    /// Sales have not opened yet.
    NotYetSold,
    SoldOut,
    Available,
}

impl TicketStatus {
    /// Interpret the per-class text of a query row: `--` (or nothing) for
    /// a class the train lacks, `*` before sales open, `无` when sold out.
    /// Anything else (`有`, a number) means seats are left.
    pub fn from_text(text: &str) -> Self {
        match text.trim() {
            "" | "--" => TicketStatus::NotApplicable,
            "*" => TicketStatus::NotYetSold,
            "无" => TicketStatus::SoldOut,
            _ => TicketStatus::Available,
        }
    }
}

/// Availability of one seat class on one train run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub seat: SeatType,
    pub status: TicketStatus,
    /// Seats left. Zero unless `status` is `Available`.
    pub count: u32,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            TicketStatus::NotApplicable => write!(f, "{} n/a", self.seat),
            TicketStatus::NotYetSold => write!(f, "{} not on sale", self.seat),
            TicketStatus::SoldOut => write!(f, "{} sold out", self.seat),
            TicketStatus::Available => write!(f, "{} {}", self.seat, self.count),
        }
    }
}

/// Whether a train run can be booked, summarized over its seat classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Bookable,
    /// Some classes go on sale later and none has seats yet.
    NotYetSold,
    /// Every class on sale is sold out.
    SoldOut,
    /// Not bookable online for another reason.
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_from_text() {
        assert_eq!(TicketStatus::from_text("--"), TicketStatus::NotApplicable);
        assert_eq!(TicketStatus::from_text(""), TicketStatus::NotApplicable);
        assert_eq!(TicketStatus::from_text("*"), TicketStatus::NotYetSold);
        assert_eq!(TicketStatus::from_text("无"), TicketStatus::SoldOut);
        assert_eq!(TicketStatus::from_text("有"), TicketStatus::Available);
        assert_eq!(TicketStatus::from_text("12"), TicketStatus::Available);
    }

    #[test]
    fn seat_codes() {
        assert_eq!(SeatType::from_code(b'O'), Some(SeatType::SecondClass));
        assert_eq!(SeatType::from_code(b'8'), Some(SeatType::SecondClass));
        assert_eq!(SeatType::from_code(b'7'), Some(SeatType::FirstClass));
        assert_eq!(SeatType::from_code(b'W'), Some(SeatType::NoSeat));
        assert_eq!(SeatType::from_code(b'Z'), None);
    }

    #[test]
    fn seat_type_from_config() {
        let seats: Vec<SeatType> =
            serde_json::from_str(r#"["second_class", "hard_sleeper"]"#).unwrap();
        assert_eq!(seats, vec![SeatType::SecondClass, SeatType::HardSleeper]);
    }

    #[test]
    fn ticket_display() {
        let ticket = Ticket {
            seat: SeatType::SecondClass,
            status: TicketStatus::Available,
            count: 21,
        };
        assert_eq!(ticket.to_string(), "二等座 21");

        let ticket = Ticket {
            seat: SeatType::HardSeat,
            status: TicketStatus::NotYetSold,
            count: 0,
        };
        assert_eq!(ticket.to_string(), "硬座 not on sale");
    }
}
