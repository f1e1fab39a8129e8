//! NATS message handlers

pub mod coordinates;
pub mod notify;
pub mod ping;
pub mod route;
pub mod stops;

use std::sync::Arc;

use anyhow::Result;
use async_nats::Client;
use tokio::select;
use tracing::{error, info};

use crate::config::Config;
use crate::services::travel::{create_travel_service_with_fallback, TravelTimeService};

/// Start all message handlers
pub async fn start_handlers(client: Client, config: &Config) -> Result<()> {
    info!("Starting message handlers...");

    // Travel service with automatic routing-engine detection
    let travel: Arc<dyn TravelTimeService> = Arc::from(
        create_travel_service_with_fallback(
            config.routing_url.clone(),
            config.routing_api_key.clone(),
        )
        .await,
    );
    info!("Travel service initialized: {}", travel.name());

    // Subscribe to all subjects
    let ping_sub = client.subscribe("zasilka.ping").await?;
    let stops_build_sub = client.subscribe("zasilka.route.stops.build").await?;
    let route_sequence_sub = client.subscribe("zasilka.route.sequence").await?;
    let coordinates_update_sub = client.subscribe("zasilka.order.coordinates.update").await?;
    let route_notify_sub = client.subscribe("zasilka.route.notify").await?;

    info!("Subscribed to NATS subjects");

    let client_ping = client.clone();
    let client_stops_build = client.clone();
    let client_route_sequence = client.clone();
    let client_coordinates_update = client.clone();
    let client_route_notify = client.clone();

    let depot = config.depot;

    // Spawn handlers
    let ping_handle = tokio::spawn(async move {
        ping::handle_ping(client_ping, ping_sub).await
    });

    let stops_build_handle = tokio::spawn(async move {
        stops::handle_build(client_stops_build, stops_build_sub).await
    });

    let route_sequence_handle = tokio::spawn(async move {
        route::handle_sequence(client_route_sequence, route_sequence_sub, depot, travel).await
    });

    let coordinates_update_handle = tokio::spawn(async move {
        coordinates::handle_update(client_coordinates_update, coordinates_update_sub).await
    });

    let route_notify_handle = tokio::spawn(async move {
        notify::handle_notify(client_route_notify, route_notify_sub).await
    });

    info!("All handlers started, waiting for messages...");

    // Wait for any handler to finish (which means an error occurred)
    select! {
        result = ping_handle => {
            error!("Ping handler finished: {:?}", result);
        }
        result = stops_build_handle => {
            error!("Stop list handler finished: {:?}", result);
        }
        result = route_sequence_handle => {
            error!("Route sequence handler finished: {:?}", result);
        }
        result = coordinates_update_handle => {
            error!("Coordinate update handler finished: {:?}", result);
        }
        result = route_notify_handle => {
            error!("Route notify handler finished: {:?}", result);
        }
    }

    Ok(())
}
