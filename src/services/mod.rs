//! Business logic services

pub mod geo;
pub mod grouping;
pub mod notify;
pub mod sequencer;
pub mod stops;
pub mod travel;
