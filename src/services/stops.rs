//! Stop list construction from open orders.
//!
//! An order lacking a confirmed pickup date contributes a pickup stop, and
//! one lacking a confirmed delivery date contributes a delivery stop. Pure
//! transformation; the dispatcher reorders the result afterwards.

use uuid::Uuid;

use crate::types::{ContactPoint, Leg, Order, Stop, StopKind};

fn leg_stop(order_id: Uuid, reference: &str, leg: Leg, contact: &ContactPoint) -> Stop {
    Stop {
        kind: StopKind::from(leg),
        order_id: Some(order_id),
        order_reference: Some(reference.to_string()),
        position: 0,
        contact_name: Some(contact.name.clone()),
        phone: contact.phone.clone(),
        address: Some(contact.address.clone()),
        coordinates: contact.coordinates,
        arrival: None,
        break_kind: None,
    }
}

/// Build the ordered stop list for every unconfirmed order leg.
///
/// Positions are assigned 1..n in the order produced: each order's pickup
/// (sender side) before its delivery (receiver side), orders in input order.
/// Empty input yields an empty list.
pub fn build_stop_list(orders: &[Order]) -> Vec<Stop> {
    let mut stops = Vec::new();

    for order in orders {
        if order.needs_pickup() {
            stops.push(leg_stop(order.id, &order.reference, Leg::Pickup, &order.sender));
        }
        if order.needs_delivery() {
            stops.push(leg_stop(order.id, &order.reference, Leg::Delivery, &order.receiver));
        }
    }

    for (i, stop) in stops.iter_mut().enumerate() {
        stop.position = (i + 1) as u32;
    }

    stops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinates;
    use chrono::NaiveDate;

    fn order(reference: &str) -> Order {
        Order {
            id: Uuid::new_v4(),
            reference: reference.to_string(),
            sender: ContactPoint {
                name: format!("{} sender", reference),
                phone: Some("+420111222333".to_string()),
                address: "Odesilatelska 1".to_string(),
                coordinates: Some(Coordinates { lat: 50.05, lng: 14.42 }),
            },
            receiver: ContactPoint {
                name: format!("{} receiver", reference),
                phone: None,
                address: "Prijemcova 2".to_string(),
                coordinates: None,
            },
            pickup_confirmed: None,
            delivery_confirmed: None,
        }
    }

    #[test]
    fn test_empty_orders_yield_empty_list() {
        assert!(build_stop_list(&[]).is_empty());
    }

    #[test]
    fn test_unconfirmed_order_yields_both_legs() {
        let o = order("ZAS-1");
        let stops = build_stop_list(std::slice::from_ref(&o));

        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].kind, StopKind::Pickup);
        assert_eq!(stops[0].order_id, Some(o.id));
        assert_eq!(stops[0].contact_name.as_deref(), Some("ZAS-1 sender"));
        assert_eq!(stops[0].address.as_deref(), Some("Odesilatelska 1"));
        assert!(stops[0].coordinates.is_some());

        assert_eq!(stops[1].kind, StopKind::Delivery);
        assert_eq!(stops[1].contact_name.as_deref(), Some("ZAS-1 receiver"));
        assert!(stops[1].coordinates.is_none());
    }

    #[test]
    fn test_confirmed_legs_are_skipped() {
        let mut picked_up = order("ZAS-2");
        picked_up.pickup_confirmed = NaiveDate::from_ymd_opt(2026, 3, 2);

        let mut done = order("ZAS-3");
        done.pickup_confirmed = NaiveDate::from_ymd_opt(2026, 3, 2);
        done.delivery_confirmed = NaiveDate::from_ymd_opt(2026, 3, 3);

        let stops = build_stop_list(&[picked_up, done]);

        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].kind, StopKind::Delivery);
        assert_eq!(stops[0].order_reference.as_deref(), Some("ZAS-2"));
    }

    #[test]
    fn test_positions_are_contiguous_from_one() {
        let stops = build_stop_list(&[order("ZAS-4"), order("ZAS-5")]);
        let positions: Vec<u32> = stops.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }
}
