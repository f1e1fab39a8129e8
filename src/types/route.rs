//! Route types

use serde::{Deserialize, Serialize};

use super::{BreakKind, Stop};

/// Which computation produced a schedule.
///
/// `Uniform` is the crude fixed-interval estimate used when the primary
/// walk fails; callers can tell the two apart from this flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    Primary,
    Uniform,
}

/// An ordered sequence of stops representing one driver's day.
///
/// Created empty, populated from the stop list builder, mutated by
/// reorder/insert-break/remove, consumed by the sequencer, then cleared
/// once dispatch notifications are out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub stops: Vec<Stop>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Append a stop at the end of the route.
    pub fn push(&mut self, stop: Stop) {
        self.stops.push(stop);
        self.renumber();
    }

    /// Insert a break after the stop at `index` (or at the front when the
    /// route is empty). Every subsequent stop shifts up by one position.
    pub fn insert_break(&mut self, index: usize, kind: BreakKind) {
        let at = (index + 1).min(self.stops.len());
        self.stops.insert(at, Stop::new_break(kind));
        self.renumber();
    }

    /// Remove the stop at `index`, closing the gap. Returns the removed
    /// stop, or None when the index is past the end.
    pub fn remove(&mut self, index: usize) -> Option<Stop> {
        if index >= self.stops.len() {
            return None;
        }
        let removed = self.stops.remove(index);
        self.renumber();
        Some(removed)
    }

    /// Move the stop at `from` so it ends up at `to`, preserving the
    /// relative order of everything else.
    pub fn move_stop(&mut self, from: usize, to: usize) {
        if from >= self.stops.len() || to >= self.stops.len() || from == to {
            return;
        }
        let stop = self.stops.remove(from);
        self.stops.insert(to, stop);
        self.renumber();
    }

    pub fn clear(&mut self) {
        self.stops.clear();
    }

    /// Reassign positions as contiguous 1-based integers. Called after
    /// every mutation so the sequence never has gaps or duplicates.
    fn renumber(&mut self) {
        for (i, stop) in self.stops.iter_mut().enumerate() {
            stop.position = (i + 1) as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coordinates, StopKind};

    fn job_stop(name: &str) -> Stop {
        Stop {
            kind: StopKind::Pickup,
            order_id: Some(uuid::Uuid::new_v4()),
            order_reference: Some(format!("ZAS-{}", name)),
            position: 0,
            contact_name: Some(name.to_string()),
            phone: None,
            address: Some(format!("{} street", name)),
            coordinates: Some(Coordinates { lat: 52.0, lng: -1.0 }),
            arrival: None,
            break_kind: None,
        }
    }

    fn positions(route: &Route) -> Vec<u32> {
        route.stops.iter().map(|s| s.position).collect()
    }

    #[test]
    fn test_push_assigns_contiguous_positions() {
        let mut route = Route::new();
        route.push(job_stop("a"));
        route.push(job_stop("b"));
        route.push(job_stop("c"));
        assert_eq!(positions(&route), vec![1, 2, 3]);
    }

    #[test]
    fn test_insert_break_shifts_later_stops_by_one() {
        let mut route = Route::new();
        route.push(job_stop("a"));
        route.push(job_stop("b"));
        route.push(job_stop("c"));

        route.insert_break(0, BreakKind::Meal);

        assert_eq!(route.len(), 4);
        assert_eq!(route.stops[1].kind, StopKind::Break);
        assert_eq!(positions(&route), vec![1, 2, 3, 4]);
        // b and c moved from positions 2,3 to 3,4
        assert_eq!(route.stops[2].contact_name.as_deref(), Some("b"));
        assert_eq!(route.stops[2].position, 3);
        assert_eq!(route.stops[3].contact_name.as_deref(), Some("c"));
        assert_eq!(route.stops[3].position, 4);
    }

    #[test]
    fn test_remove_renumbers_down_preserving_order() {
        let mut route = Route::new();
        route.push(job_stop("a"));
        route.push(job_stop("b"));
        route.push(job_stop("c"));

        let removed = route.remove(1).unwrap();
        assert_eq!(removed.contact_name.as_deref(), Some("b"));

        assert_eq!(positions(&route), vec![1, 2]);
        assert_eq!(route.stops[0].contact_name.as_deref(), Some("a"));
        assert_eq!(route.stops[1].contact_name.as_deref(), Some("c"));
    }

    #[test]
    fn test_remove_past_end_is_noop() {
        let mut route = Route::new();
        route.push(job_stop("a"));
        assert!(route.remove(5).is_none());
        assert_eq!(route.len(), 1);
    }

    #[test]
    fn test_move_stop_keeps_positions_contiguous() {
        let mut route = Route::new();
        route.push(job_stop("a"));
        route.push(job_stop("b"));
        route.push(job_stop("c"));

        route.move_stop(2, 0);

        let names: Vec<_> = route
            .stops
            .iter()
            .map(|s| s.contact_name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(positions(&route), vec![1, 2, 3]);
    }

    #[test]
    fn test_insert_break_on_empty_route() {
        let mut route = Route::new();
        route.insert_break(0, BreakKind::Short);
        assert_eq!(route.len(), 1);
        assert_eq!(route.stops[0].position, 1);
    }
}
