//! Timeslot sequencing for courier routes.
//!
//! Given an ordered stop list and a departure time, this module walks the
//! route once and computes an arrival estimate for every stop. Stops at the
//! same location (one proximity group) are visited once: the group's first
//! member pays the travel leg and every member shares its arrival time.
//! Arrival times land on 5-minute boundaries, rounded forward.
//!
//! This is a greedy single pass over the dispatcher's chosen order — it
//! does not re-optimise the sequence.

use std::collections::HashMap;

use chrono::{NaiveTime, Timelike};
use thiserror::Error;
use tracing::warn;

use crate::services::grouping::group_stops;
use crate::services::travel::TravelTimeService;
use crate::types::{BreakKind, Coordinates, ScheduleMode, Stop};

/// Tunable durations and thresholds for one sequencing pass.
#[derive(Debug, Clone)]
pub struct SequencerParams {
    /// Stops within this great-circle distance share one travel destination.
    pub proximity_threshold_m: f64,
    /// Fixed loading/unloading time per stop.
    pub service_minutes: u32,
    /// Substituted for a hop when the travel lookup fails.
    pub default_travel_minutes: u32,
    pub meal_break_minutes: u32,
    pub short_break_minutes: u32,
    /// Arrival times are rounded forward to a multiple of this.
    pub rounding_minutes: u32,
}

impl Default for SequencerParams {
    fn default() -> Self {
        Self {
            proximity_threshold_m: 50.0,
            service_minutes: 15,
            default_travel_minutes: 15,
            meal_break_minutes: 60,
            short_break_minutes: 15,
            rounding_minutes: 5,
        }
    }
}

/// A non-break stop that cannot be scheduled because it has no coordinates.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingCoordinate {
    pub position: u32,
    pub contact_name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Error)]
pub enum SequenceError {
    /// Precondition violation: the walk never starts and nothing is
    /// computed. The list names each offending stop so the dispatcher can
    /// correct it.
    #[error("{} stop(s) are missing coordinates", .0.len())]
    MissingCoordinates(Vec<MissingCoordinate>),
    #[error("sequencing failed: {0}")]
    Internal(String),
}

/// Computed schedule for one route snapshot.
#[derive(Debug, Clone)]
pub struct SequenceResult {
    /// Arrival estimate per stop, parallel to the input.
    pub arrivals: Vec<NaiveTime>,
    /// Elapsed minutes from departure to the end of the last stop.
    pub total_minutes: i64,
    pub mode: ScheduleMode,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn add_minutes(time: NaiveTime, minutes: i64) -> NaiveTime {
    let total_secs = time.num_seconds_from_midnight() as i64 + minutes * 60;
    let clamped = total_secs.clamp(0, 24 * 60 * 60 - 1) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(clamped, 0)
        .unwrap_or_else(|| NaiveTime::from_hms_opt(23, 59, 59).expect("valid time"))
}

/// Round forward to the next multiple of `granularity` minutes. Times
/// already on a boundary are returned unchanged; rounding carries into the
/// hour (14:58 with 5-minute granularity becomes 15:00).
pub fn round_up_to(time: NaiveTime, granularity: u32) -> NaiveTime {
    if granularity == 0 {
        return time;
    }
    let secs = time.num_seconds_from_midnight();
    let minutes = (secs + 59) / 60; // partial minutes round forward too
    let rounded = minutes.div_ceil(granularity) * granularity;
    let clamped = (rounded * 60).min(24 * 60 * 60 - 1);
    NaiveTime::from_num_seconds_from_midnight_opt(clamped, 0)
        .unwrap_or_else(|| NaiveTime::from_hms_opt(23, 59, 59).expect("valid time"))
}

fn minutes_between(start: NaiveTime, end: NaiveTime) -> i64 {
    (end - start).num_minutes()
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Walk the route and compute an arrival estimate for every stop.
///
/// Proximity groups are derived fresh from the snapshot, then the walk
/// advances a time cursor stop by stop: travel (looked up per new group,
/// defaulted when the lookup fails), rounding to the next boundary at
/// arrival, fixed service time per stop, fixed durations for breaks. Later
/// members of an already-visited group receive the group's arrival and only
/// add service time.
///
/// Fails fast with `MissingCoordinates` before any time is computed when a
/// non-break stop has no coordinates.
pub async fn sequence_route(
    stops: &[Stop],
    start: NaiveTime,
    depot: Coordinates,
    params: &SequencerParams,
    travel: &dyn TravelTimeService,
) -> Result<SequenceResult, SequenceError> {
    let missing: Vec<MissingCoordinate> = stops
        .iter()
        .filter(|s| !s.kind.is_break() && s.coordinates.is_none())
        .map(|s| MissingCoordinate {
            position: s.position,
            contact_name: s.contact_name.clone(),
            address: s.address.clone(),
        })
        .collect();
    if !missing.is_empty() {
        return Err(SequenceError::MissingCoordinates(missing));
    }

    let grouped = group_stops(stops, params.proximity_threshold_m);

    let mut cursor = start;
    let mut position = depot;
    let mut group_arrivals: HashMap<usize, NaiveTime> = HashMap::new();
    let mut arrivals: Vec<NaiveTime> = Vec::with_capacity(stops.len());

    for (stop, slot) in stops.iter().zip(grouped.slots.iter()) {
        if stop.kind.is_break() {
            let minutes = match stop.break_kind.unwrap_or(BreakKind::Short) {
                BreakKind::Meal => params.meal_break_minutes,
                BreakKind::Short => params.short_break_minutes,
            };
            cursor = round_up_to(add_minutes(cursor, minutes as i64), params.rounding_minutes);
            arrivals.push(cursor);
            continue;
        }

        // Precondition guarantees coordinates, so every non-break stop has
        // a group slot.
        let Some(slot) = *slot else {
            return Err(SequenceError::Internal(format!(
                "stop #{} has no location group",
                stop.position
            )));
        };
        let coords = stop.coordinates.ok_or_else(|| {
            SequenceError::Internal(format!("stop #{} lost coordinates mid-walk", stop.position))
        })?;

        match group_arrivals.get(&slot.group_id) {
            None => {
                // First visit to this location group: pay the travel leg.
                let travel_min = match travel.travel_minutes(position, coords).await {
                    Ok(m) => m,
                    Err(e) => {
                        warn!(
                            "Travel lookup failed for stop #{}: {}. Using default {} min.",
                            stop.position, e, params.default_travel_minutes
                        );
                        params.default_travel_minutes
                    }
                };
                cursor = round_up_to(add_minutes(cursor, travel_min as i64), params.rounding_minutes);
                arrivals.push(cursor);
                group_arrivals.insert(slot.group_id, cursor);
                position = coords;
                cursor = add_minutes(cursor, params.service_minutes as i64);
            }
            Some(&first_arrival) => {
                // Same location as an earlier stop: logically simultaneous
                // arrival, one more service slot on the clock.
                arrivals.push(first_arrival);
                cursor = add_minutes(cursor, params.service_minutes as i64);
            }
        }
    }

    Ok(SequenceResult {
        total_minutes: minutes_between(start, cursor),
        arrivals,
        mode: ScheduleMode::Primary,
    })
}

/// Crude fixed-interval schedule used when the primary walk fails
/// completely: uniform spacing of default travel plus service per stop.
/// Deliberately simpler and less accurate than `sequence_route`.
pub fn uniform_schedule(stops: &[Stop], start: NaiveTime, params: &SequencerParams) -> SequenceResult {
    let interval = (params.default_travel_minutes + params.service_minutes) as i64;
    let arrivals = (1..=stops.len() as i64)
        .map(|n| add_minutes(start, n * interval))
        .collect();

    SequenceResult {
        arrivals,
        total_minutes: stops.len() as i64 * interval,
        mode: ScheduleMode::Uniform,
    }
}

/// Write computed arrivals back onto the stops as one unit, after the whole
/// walk has resolved.
pub fn apply_arrivals(stops: &mut [Stop], result: &SequenceResult) {
    for (stop, arrival) in stops.iter_mut().zip(result.arrivals.iter()) {
        stop.arrival = Some(*arrival);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
