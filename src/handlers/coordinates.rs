//! Coordinate correction handler

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use serde_json::json;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::services::geo::validate_coordinates;
use crate::types::{CoordinateUpdateRequest, Empty, ErrorResponse, Request, SuccessResponse};

/// Subject the persistence collaborator listens on for accepted corrections.
pub const UPDATED_SUBJECT: &str = "zasilka.order.coordinates.updated";

/// Handle order.coordinates.update messages
///
/// Validates the corrected pair and forwards accepted corrections to the
/// persistence collaborator. Rejections name the out-of-range field.
pub async fn handle_update(client: Client, mut subscriber: Subscriber) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received order.coordinates.update message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => continue,
        };

        let request: Request<CoordinateUpdateRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse coordinate update request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let update = &request.payload;

        if let Err(e) = validate_coordinates(update.lat, update.lng) {
            let error = ErrorResponse::new(request.id, "COORDINATES_OUT_OF_RANGE", e.to_string())
                .with_details(json!({ "field": e.field() }));
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        // Persistence itself lives with the upstream collaborator; we hand
        // the accepted correction over on its subject.
        let forwarded = serde_json::to_vec(update)?;
        if let Err(e) = client.publish(UPDATED_SUBJECT, forwarded.into()).await {
            error!("Failed to forward coordinate update for order {}: {}", update.order_id, e);
            let error = ErrorResponse::new(request.id, "FORWARD_ERROR", e.to_string());
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        info!(
            "Coordinate correction accepted for order {} ({} leg)",
            update.order_id,
            update.leg.as_str()
        );

        let response = SuccessResponse::new(request.id, Empty {});
        let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
    }

    Ok(())
}
