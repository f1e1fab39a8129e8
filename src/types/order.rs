//! Order types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Coordinates;

/// One side of an order: the sender's or receiver's contact and address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPoint {
    pub name: String,
    pub phone: Option<String>,
    pub address: String,
    /// Geocoded position. May be missing until corrected by the dispatcher.
    pub coordinates: Option<Coordinates>,
}

/// A courier order with a pickup leg (sender) and a delivery leg (receiver).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    /// Human-readable reference shown to dispatchers and customers.
    pub reference: String,
    pub sender: ContactPoint,
    pub receiver: ContactPoint,
    /// Date the pickup was confirmed with the sender, if any.
    pub pickup_confirmed: Option<NaiveDate>,
    /// Date the delivery was confirmed with the receiver, if any.
    pub delivery_confirmed: Option<NaiveDate>,
}

impl Order {
    pub fn needs_pickup(&self) -> bool {
        self.pickup_confirmed.is_none()
    }

    pub fn needs_delivery(&self) -> bool {
        self.delivery_confirmed.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order {
            id: Uuid::new_v4(),
            reference: "ZAS-1001".to_string(),
            sender: ContactPoint {
                name: "Sender".to_string(),
                phone: None,
                address: "From St 1".to_string(),
                coordinates: None,
            },
            receiver: ContactPoint {
                name: "Receiver".to_string(),
                phone: None,
                address: "To St 2".to_string(),
                coordinates: None,
            },
            pickup_confirmed: None,
            delivery_confirmed: None,
        }
    }

    #[test]
    fn test_unconfirmed_legs_need_scheduling() {
        let mut o = order();
        assert!(o.needs_pickup());
        assert!(o.needs_delivery());

        o.pickup_confirmed = NaiveDate::from_ymd_opt(2026, 3, 2);
        assert!(!o.needs_pickup());
        assert!(o.needs_delivery());
    }
}
