//! Pluggable decisions made during a search.
//!
//! A [`SelectionPolicy`] chooses which candidate train to try next at each
//! hop; a [`CandidateFilter`] discards trains before they are offered.

use crate::domain::TrainRun;

/// What a selection policy decided for one set of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Try the candidate at this index.
    Pick(usize),
    /// None of these will do; backtrack to the previous hop.
    Decline,
    /// Stop the whole search.
    Abort,
}

/// Chooses the next leg from a non-empty list of candidates.
///
/// Called again with a shorter list after a picked candidate turned out to
/// be a dead end.
pub trait SelectionPolicy {
    fn select(&mut self, candidates: &[TrainRun]) -> Selection;
}

impl<F> SelectionPolicy for F
where
    F: FnMut(&[TrainRun]) -> Selection,
{
    fn select(&mut self, candidates: &[TrainRun]) -> Selection {
        self(candidates)
    }
}

/// Decides whether a train may be offered as a candidate at all.
pub trait CandidateFilter {
    fn accepts(&self, train: &TrainRun) -> bool;
}

impl<F> CandidateFilter for F
where
    F: Fn(&TrainRun) -> bool,
{
    fn accepts(&self, train: &TrainRun) -> bool {
        self(train)
    }
}

/// Always takes the first candidate, in discovery order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl SelectionPolicy for FirstCandidate {
    fn select(&mut self, candidates: &[TrainRun]) -> Selection {
        if candidates.is_empty() {
            Selection::Decline
        } else {
            Selection::Pick(0)
        }
    }
}

/// Takes the candidate that arrives first. Ties go to the earlier entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarliestArrival;

impl SelectionPolicy for EarliestArrival {
    fn select(&mut self, candidates: &[TrainRun]) -> Selection {
        candidates
            .iter()
            .enumerate()
            .min_by_key(|(idx, train)| (train.arrival_time(), *idx))
            .map_or(Selection::Decline, |(idx, _)| Selection::Pick(idx))
    }
}
