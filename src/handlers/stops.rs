//! Stop list builder handler

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use tracing::{debug, error};
use uuid::Uuid;

use crate::services::stops::build_stop_list;
use crate::types::{BuildStopsRequest, BuildStopsResponse, ErrorResponse, Request, SuccessResponse};

/// Handle route.stops.build messages
///
/// Produces one pickup entry per order without a confirmed pickup date and
/// one delivery entry per order without a confirmed delivery date.
pub async fn handle_build(client: Client, mut subscriber: Subscriber) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received route.stops.build message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => continue,
        };

        let request: Request<BuildStopsRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse stop list request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let stops = build_stop_list(&request.payload.orders);
        debug!(
            "Built {} stops from {} orders",
            stops.len(),
            request.payload.orders.len()
        );

        let response = SuccessResponse::new(request.id, BuildStopsResponse { stops });
        let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
    }

    Ok(())
}
