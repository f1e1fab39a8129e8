//! Stop and coordinate types

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Which side of an order's journey a stop covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    Pickup,
    Delivery,
}

impl Leg {
    pub const fn as_str(self) -> &'static str {
        match self {
            Leg::Pickup => "pickup",
            Leg::Delivery => "delivery",
        }
    }
}

/// Kind of entry on a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    Pickup,
    Delivery,
    Break,
}

impl StopKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            StopKind::Pickup => "pickup",
            StopKind::Delivery => "delivery",
            StopKind::Break => "break",
        }
    }

    pub const fn is_break(self) -> bool {
        matches!(self, StopKind::Break)
    }
}

impl From<Leg> for StopKind {
    fn from(leg: Leg) -> Self {
        match leg {
            Leg::Pickup => StopKind::Pickup,
            Leg::Delivery => StopKind::Delivery,
        }
    }
}

/// Break category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakKind {
    Meal,
    Short,
}

/// Who receives a notification about a stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientRole {
    Sender,
    Receiver,
}

/// One unit of work on a route: a pickup, a delivery, or a driver break.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub kind: StopKind,
    /// Order this stop belongs to. Breaks carry no order.
    pub order_id: Option<Uuid>,
    /// Human-readable order reference (e.g. "ZAS-2041").
    pub order_reference: Option<String>,
    /// 1-based position within the route. Contiguous after every mutation.
    pub position: u32,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    /// Computed arrival estimate, filled in by the sequencer.
    #[serde(default)]
    pub arrival: Option<NaiveTime>,
    /// For break stops only.
    #[serde(default)]
    pub break_kind: Option<BreakKind>,
}

impl Stop {
    /// Create a break entry. Position is assigned by the route it is inserted into.
    pub fn new_break(kind: BreakKind) -> Self {
        Self {
            kind: StopKind::Break,
            order_id: None,
            order_reference: None,
            position: 0,
            contact_name: None,
            phone: None,
            address: None,
            coordinates: None,
            arrival: None,
            break_kind: Some(kind),
        }
    }

    /// Who to notify about this stop: pickups concern the sender,
    /// deliveries the receiver. Breaks notify nobody.
    pub fn recipient_role(&self) -> Option<RecipientRole> {
        match self.kind {
            StopKind::Pickup => Some(RecipientRole::Sender),
            StopKind::Delivery => Some(RecipientRole::Receiver),
            StopKind::Break => None,
        }
    }

    /// Label used when reporting this stop back to the dispatcher
    /// (e.g. in missing-coordinate rejections).
    pub fn display_label(&self) -> String {
        match (self.contact_name.as_deref(), self.address.as_deref()) {
            (Some(name), Some(addr)) => format!("{} ({})", name, addr),
            (Some(name), None) => name.to_string(),
            (None, Some(addr)) => addr.to_string(),
            (None, None) => format!("stop #{}", self.position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_role_by_kind() {
        let mut stop = Stop::new_break(BreakKind::Short);
        assert_eq!(stop.recipient_role(), None);

        stop.kind = StopKind::Pickup;
        assert_eq!(stop.recipient_role(), Some(RecipientRole::Sender));

        stop.kind = StopKind::Delivery;
        assert_eq!(stop.recipient_role(), Some(RecipientRole::Receiver));
    }

    #[test]
    fn test_display_label_prefers_name_and_address() {
        let mut stop = Stop::new_break(BreakKind::Meal);
        stop.position = 3;
        assert_eq!(stop.display_label(), "stop #3");

        stop.address = Some("Main St 12".to_string());
        assert_eq!(stop.display_label(), "Main St 12");

        stop.contact_name = Some("Novak".to_string());
        assert_eq!(stop.display_label(), "Novak (Main St 12)");
    }

    #[test]
    fn test_stop_kind_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&StopKind::Pickup).unwrap(), "\"pickup\"");
        assert_eq!(serde_json::to_string(&BreakKind::Meal).unwrap(), "\"meal\"");
    }
}
