//! Rail itinerary planner.
//!
//! Answers: "this train runs from A to B, but is there another way to get
//! there by changing at one of its stops?"

pub mod cache;
pub mod cli;
pub mod domain;
pub mod filter;
pub mod planner;
pub mod rail;
pub mod stations;
