//! Proximity grouping of route stops.
//!
//! Stops whose coordinates fall within a fixed great-circle threshold of a
//! group's representative (its first member) share one travel destination:
//! the sequencer visits the location once and assigns the same arrival to
//! every member. Groups are derived fresh for each scheduling pass and are
//! never persisted.

use crate::services::geo::haversine_distance_m;
use crate::types::{Coordinates, Stop};

/// Group membership of one stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSlot {
    /// Index of the group, in order of first appearance.
    pub group_id: usize,
    /// 1-based rank of this stop within its group.
    pub rank: u32,
}

/// Derived grouping for a route snapshot. Immutable; parallel to the input
/// stop slice. Breaks and stops without coordinates carry no slot.
#[derive(Debug, Clone)]
pub struct GroupedRoute {
    pub slots: Vec<Option<GroupSlot>>,
    /// Representative coordinate per group (first member's position).
    pub representatives: Vec<Coordinates>,
}

impl GroupedRoute {
    pub fn group_count(&self) -> usize {
        self.representatives.len()
    }
}

/// Partition stops into proximity groups.
///
/// Agglomerative and order-dependent: each stop with coordinates joins the
/// first existing group whose representative is within `threshold_m`
/// meters, otherwise it founds a new group. Original relative order is
/// preserved; a size-1 group behaves exactly like an ungrouped stop
/// downstream.
pub fn group_stops(stops: &[Stop], threshold_m: f64) -> GroupedRoute {
    let mut slots: Vec<Option<GroupSlot>> = Vec::with_capacity(stops.len());
    let mut representatives: Vec<Coordinates> = Vec::new();
    let mut member_counts: Vec<u32> = Vec::new();

    for stop in stops {
        let coords = match (stop.kind.is_break(), stop.coordinates) {
            (false, Some(c)) => c,
            _ => {
                slots.push(None);
                continue;
            }
        };

        let existing = representatives
            .iter()
            .position(|rep| haversine_distance_m(rep, &coords) <= threshold_m);

        let group_id = match existing {
            Some(id) => id,
            None => {
                representatives.push(coords);
                member_counts.push(0);
                representatives.len() - 1
            }
        };

        member_counts[group_id] += 1;
        slots.push(Some(GroupSlot {
            group_id,
            rank: member_counts[group_id],
        }));
    }

    GroupedRoute {
        slots,
        representatives,
    }
}
