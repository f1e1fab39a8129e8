//! Route sequencing handler

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use serde_json::json;
use tracing::{debug, error};
use uuid::Uuid;

use crate::services::sequencer::{
    apply_arrivals, sequence_route, uniform_schedule, SequenceError, SequencerParams,
};
use crate::services::travel::TravelTimeService;
use crate::types::{
    Coordinates, ErrorResponse, Request, SequenceRouteRequest, SequenceRouteResponse,
    SuccessResponse,
};

/// Handle route.sequence messages
///
/// Computes arrival times for a route snapshot. Missing coordinates are
/// rejected with per-stop details before anything is computed; an internal
/// failure of the walk degrades to the uniform fixed-interval estimate so
/// the dispatcher is never left without a schedule.
pub async fn handle_sequence(
    client: Client,
    mut subscriber: Subscriber,
    depot: Coordinates,
    travel: Arc<dyn TravelTimeService>,
) -> Result<()> {
    let params = SequencerParams::default();

    while let Some(msg) = subscriber.next().await {
        debug!("Received route.sequence message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => continue,
        };

        let request: Request<SequenceRouteRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse sequence request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let SequenceRouteRequest { start_time, mut stops } = request.payload;

        let response = match sequence_route(&stops, start_time, depot, &params, travel.as_ref()).await
        {
            Ok(result) => {
                apply_arrivals(&mut stops, &result);
                SuccessResponse::new(
                    request.id,
                    SequenceRouteResponse {
                        stops,
                        total_minutes: result.total_minutes,
                        mode: result.mode,
                        warnings: vec![],
                    },
                )
            }
            Err(SequenceError::MissingCoordinates(missing)) => {
                let error = ErrorResponse::new(
                    request.id,
                    "MISSING_COORDINATES",
                    format!("{} stop(s) have no coordinates and must be corrected", missing.len()),
                )
                .with_details(json!({ "stops": missing }));
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
            Err(SequenceError::Internal(e)) => {
                // Blanket fallback: the whole computation failed, so serve
                // the crude uniform estimate instead of no schedule at all.
                error!("Sequencing failed, serving uniform fallback schedule: {}", e);
                let result = uniform_schedule(&stops, start_time, &params);
                apply_arrivals(&mut stops, &result);
                SuccessResponse::new(
                    request.id,
                    SequenceRouteResponse {
                        stops,
                        total_minutes: result.total_minutes,
                        mode: result.mode,
                        warnings: vec![
                            "Primary schedule computation failed; times are uniform estimates"
                                .to_string(),
                        ],
                    },
                )
            }
        };

        let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
    }

    Ok(())
}
