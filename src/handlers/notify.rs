//! Notification dispatch handler

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use tracing::{debug, error};
use uuid::Uuid;

use crate::services::notify::{build_notifications, dispatch_notifications};
use crate::types::{ErrorResponse, NotifyRouteRequest, NotifyRouteResponse, Request, SuccessResponse};

/// Handle route.notify messages
///
/// Hands each scheduled stop to the messaging sink. Fire-and-forget with
/// respect to the schedule: sink failures reduce the dispatched count but
/// never fail the request.
pub async fn handle_notify(client: Client, mut subscriber: Subscriber) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received route.notify message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => continue,
        };

        let request: Request<NotifyRouteRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse notify request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let (notifications, skipped) = build_notifications(&request.payload.stops);
        let dispatched = dispatch_notifications(&client, &notifications).await;

        let response = SuccessResponse::new(
            request.id,
            NotifyRouteResponse {
                dispatched,
                skipped: skipped + (notifications.len() - dispatched),
            },
        );
        let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
    }

    Ok(())
}
