//! Seat availability filtering.

use std::collections::HashSet;

use serde::Deserialize;

use crate::domain::{SeatType, Ticket, TicketStatus, TrainRun};

/// Which seat classes make a train worth offering.
///
/// A train passes when at least one of its seat classes passes. The
/// default filter places no constraint, so trains without seat information
/// pass too.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TicketFilter {
    /// Acceptable seat classes. `None` accepts every class.
    pub seats: Option<HashSet<SeatType>>,

    /// Ignore classes that are sold out.
    pub skip_sold_out: bool,

    /// Ignore classes that are not on sale yet.
    pub skip_not_yet_sold: bool,
}

impl TicketFilter {
    /// Whether the filter places no constraint.
    pub fn is_unconstrained(&self) -> bool {
        self.seats.is_none() && !self.skip_sold_out && !self.skip_not_yet_sold
    }

    /// Whether one seat class is acceptable.
    pub fn check_ticket(&self, ticket: &Ticket) -> bool {
        match ticket.status {
            TicketStatus::NotApplicable => return false,
            TicketStatus::SoldOut if self.skip_sold_out => return false,
            TicketStatus::NotYetSold if self.skip_not_yet_sold => return false,
            _ => {}
        }
        self.seats
            .as_ref()
            .is_none_or(|seats| seats.contains(&ticket.seat))
    }

    /// Whether any seat class of `train` is acceptable.
    pub fn check(&self, train: &TrainRun) -> bool {
        self.is_unconstrained() || train.tickets.iter().any(|t| self.check_ticket(t))
    }
}
