//! Outbound arrival notifications.
//!
//! Once a schedule is computed, each job stop can be handed to the
//! messaging sink: one payload per stop carrying the order, the recipient
//! role and the computed time. Dispatch is fire-and-forget — sink failures
//! are logged and never affect the computed schedule.

use async_nats::Client;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::types::{RecipientRole, Stop};

/// Subject the messaging sink listens on.
pub const OUTBOUND_SUBJECT: &str = "zasilka.notify.outbound";

/// One message for the external messaging sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopNotification {
    pub order_id: Uuid,
    pub order_reference: Option<String>,
    pub role: RecipientRole,
    pub arrival: NaiveTime,
    pub address: Option<String>,
}

/// Build the notification payloads for every notifiable stop.
///
/// Breaks, stops without an order, and stops without a computed arrival are
/// skipped. Returns the payloads and the skip count.
pub fn build_notifications(stops: &[Stop]) -> (Vec<StopNotification>, usize) {
    let mut notifications = Vec::new();
    let mut skipped = 0;

    for stop in stops {
        let (Some(order_id), Some(role), Some(arrival)) =
            (stop.order_id, stop.recipient_role(), stop.arrival)
        else {
            skipped += 1;
            continue;
        };

        notifications.push(StopNotification {
            order_id,
            order_reference: stop.order_reference.clone(),
            role,
            arrival,
            address: stop.address.clone(),
        });
    }

    (notifications, skipped)
}

/// Publish notifications to the messaging sink. Returns how many were
/// handed over; individual publish failures are logged and skipped.
pub async fn dispatch_notifications(client: &Client, notifications: &[StopNotification]) -> usize {
    let mut dispatched = 0;

    for notification in notifications {
        let payload = match serde_json::to_vec(notification) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to serialize notification for order {}: {}", notification.order_id, e);
                continue;
            }
        };

        match client.publish(OUTBOUND_SUBJECT, payload.into()).await {
            Ok(()) => dispatched += 1,
            Err(e) => {
                warn!("Failed to publish notification for order {}: {}", notification.order_id, e);
            }
        }
    }

    debug!("Dispatched {}/{} notifications", dispatched, notifications.len());
    dispatched
}
