//! Travel-time lookup service.
//!
//! The sequencer asks for an estimated driving duration between two
//! coordinates before each new location group. Production uses the HTTP
//! routing engine; when it is not configured or unreachable the worker
//! falls back to a haversine-based estimator.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::services::geo::haversine_distance_m;
use crate::types::Coordinates;

/// Travel-time lookup abstraction (routing engine, estimator, test mocks).
#[async_trait]
pub trait TravelTimeService: Send + Sync {
    /// Estimated driving duration in whole minutes from `from` to `to`.
    async fn travel_minutes(&self, from: Coordinates, to: Coordinates) -> Result<u32>;

    /// Service name for logging
    fn name(&self) -> &str;
}

/// Routing engine client configuration
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Base URL of the routing engine (e.g. "http://localhost:8002")
    pub base_url: String,
    /// Access credential sent as the X-API-KEY header
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl RoutingConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            timeout_seconds: 30,
        }
    }
}

/// HTTP routing engine client
pub struct RoutingClient {
    client: Client,
    config: RoutingConfig,
}

#[derive(Debug, Serialize)]
struct DurationRequest {
    from: Coordinates,
    to: Coordinates,
    costing: String,
}

#[derive(Debug, Deserialize)]
struct DurationResponse {
    /// Driving duration in seconds
    seconds: f64,
}

impl RoutingClient {
    pub fn new(config: RoutingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl TravelTimeService for RoutingClient {
    async fn travel_minutes(&self, from: Coordinates, to: Coordinates) -> Result<u32> {
        let url = format!("{}/route/duration", self.config.base_url);
        let request = DurationRequest {
            from,
            to,
            costing: "auto".to_string(),
        };

        debug!("Requesting travel time from routing engine");

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.header("X-API-KEY", key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to send request to routing engine")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Routing engine returned error {}: {}", status, body);
        }

        let duration: DurationResponse = response
            .json()
            .await
            .context("Failed to parse routing engine response")?;

        Ok((duration.seconds / 60.0).ceil() as u32)
    }

    fn name(&self) -> &str {
        "RoutingEngine"
    }
}

/// Haversine-based travel-time estimator.
/// Straight-line distance scaled by a road coefficient at an average speed.
pub struct HaversineEstimator {
    /// Coefficient for converting straight-line to road distance
    road_coefficient: f64,
    /// Average speed in km/h
    average_speed_kmh: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            road_coefficient: 1.3,
            average_speed_kmh: 40.0,
        }
    }
}

impl HaversineEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(road_coefficient: f64, average_speed_kmh: f64) -> Self {
        Self {
            road_coefficient,
            average_speed_kmh,
        }
    }
}

#[async_trait]
impl TravelTimeService for HaversineEstimator {
    async fn travel_minutes(&self, from: Coordinates, to: Coordinates) -> Result<u32> {
        let road_km = haversine_distance_m(&from, &to) / 1000.0 * self.road_coefficient;
        let minutes = road_km / self.average_speed_kmh * 60.0;
        Ok(minutes.ceil() as u32)
    }

    fn name(&self) -> &str {
        "HaversineEstimator"
    }
}

/// Create the travel service with automatic routing-engine detection.
///
/// Tries the routing engine when a URL is configured, otherwise (or when
/// the engine does not answer its status endpoint) falls back to the
/// haversine estimator.
pub async fn create_travel_service_with_fallback(
    routing_url: Option<String>,
    api_key: Option<String>,
) -> Box<dyn TravelTimeService> {
    if let Some(url) = routing_url {
        match check_routing_health(&url).await {
            Ok(()) => match RoutingClient::new(RoutingConfig::new(&url, api_key)) {
                Ok(client) => {
                    info!("Routing engine available at {}", url);
                    return Box::new(client);
                }
                Err(e) => {
                    warn!("Failed to build routing client: {}. Falling back to estimator.", e);
                }
            },
            Err(e) => {
                warn!("Routing engine not available at {}: {}. Falling back to estimator.", url, e);
            }
        }
    }

    info!("Using haversine travel-time estimator (routing engine not configured or unavailable)");
    Box::new(HaversineEstimator::new())
}

/// Check routing engine health via its status endpoint
async fn check_routing_health(base_url: &str) -> Result<()> {
    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;

    let url = format!("{}/status", base_url);
    let response = client.get(&url).send().await?;

    if response.status().is_success() {
        Ok(())
    } else {
        anyhow::bail!("Routing engine returned status {}", response.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prague() -> Coordinates {
        Coordinates { lat: 50.0755, lng: 14.4378 }
    }

    fn brno() -> Coordinates {
        Coordinates { lat: 49.1951, lng: 16.6068 }
    }

    #[tokio::test]
    async fn test_estimator_zero_for_same_point() {
        let service = HaversineEstimator::new();
        let minutes = service.travel_minutes(prague(), prague()).await.unwrap();
        assert_eq!(minutes, 0);
    }

    #[tokio::test]
    async fn test_estimator_prague_brno_reasonable() {
        let service = HaversineEstimator::new();
        let minutes = service.travel_minutes(prague(), brno()).await.unwrap();

        // ~185 km straight line, ~240 km road at 40 km/h is about 6 hours
        assert!((300..=480).contains(&minutes), "got {} minutes", minutes);
    }

    #[tokio::test]
    async fn test_estimator_custom_params() {
        let slow = HaversineEstimator::with_params(1.3, 20.0);
        let fast = HaversineEstimator::with_params(1.3, 80.0);

        let slow_min = slow.travel_minutes(prague(), brno()).await.unwrap();
        let fast_min = fast.travel_minutes(prague(), brno()).await.unwrap();
        assert!(slow_min > fast_min);
    }

    #[test]
    fn test_service_names() {
        assert_eq!(HaversineEstimator::new().name(), "HaversineEstimator");
        let client = RoutingClient::new(RoutingConfig::new("http://localhost:8002", None)).unwrap();
        assert_eq!(client.name(), "RoutingEngine");
    }

    #[tokio::test]
    async fn test_fallback_without_url_uses_estimator() {
        let service = create_travel_service_with_fallback(None, None).await;
        assert_eq!(service.name(), "HaversineEstimator");
    }

    #[tokio::test]
    async fn test_fallback_with_unreachable_url_uses_estimator() {
        let service = create_travel_service_with_fallback(
            Some("http://127.0.0.1:1".to_string()),
            None,
        )
        .await;
        assert_eq!(service.name(), "HaversineEstimator");
    }
}
