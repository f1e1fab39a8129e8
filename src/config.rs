//! Configuration management

use anyhow::{Context, Result};

use crate::types::Coordinates;

/// Default depot: the original deployment's Birmingham, UK base.
const DEFAULT_DEPOT_LAT: f64 = 52.4862;
const DEFAULT_DEPOT_LNG: f64 = -1.8904;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// Routing engine URL (optional, falls back to the haversine estimator)
    pub routing_url: Option<String>,

    /// Routing engine access credential (optional)
    pub routing_api_key: Option<String>,

    /// Fixed start coordinate for every route
    pub depot: Coordinates,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let nats_url = std::env::var("NATS_URL")
            .unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let routing_url = std::env::var("ROUTING_URL").ok();
        let routing_api_key = std::env::var("ROUTING_API_KEY").ok();

        let depot_lat = match std::env::var("DEPOT_LAT") {
            Ok(v) => v.parse::<f64>().context("DEPOT_LAT must be a number")?,
            Err(_) => DEFAULT_DEPOT_LAT,
        };
        let depot_lng = match std::env::var("DEPOT_LNG") {
            Ok(v) => v.parse::<f64>().context("DEPOT_LNG must be a number")?,
            Err(_) => DEFAULT_DEPOT_LNG,
        };

        if !(-90.0..=90.0).contains(&depot_lat) {
            anyhow::bail!("DEPOT_LAT {} out of range [-90, 90]", depot_lat);
        }
        if !(-180.0..=180.0).contains(&depot_lng) {
            anyhow::bail!("DEPOT_LNG {} out of range [-180, 180]", depot_lng);
        }

        Ok(Self {
            nats_url,
            routing_url,
            routing_api_key,
            depot: Coordinates { lat: depot_lat, lng: depot_lng },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // requires --test-threads=1 due to env var race
    fn test_config_routing_url_none_when_not_set() {
        std::env::remove_var("ROUTING_URL");

        let config = Config::from_env().unwrap();
        assert!(config.routing_url.is_none());
    }

    #[test]
    fn test_config_routing_url_some_when_set() {
        std::env::set_var("ROUTING_URL", "http://localhost:8002");

        let config = Config::from_env().unwrap();
        assert_eq!(config.routing_url, Some("http://localhost:8002".to_string()));

        // Cleanup
        std::env::remove_var("ROUTING_URL");
    }

    #[test]
    #[ignore] // requires --test-threads=1 due to env var race
    fn test_config_depot_defaults_to_birmingham() {
        std::env::remove_var("DEPOT_LAT");
        std::env::remove_var("DEPOT_LNG");

        let config = Config::from_env().unwrap();
        assert!((config.depot.lat - DEFAULT_DEPOT_LAT).abs() < 1e-9);
        assert!((config.depot.lng - DEFAULT_DEPOT_LNG).abs() < 1e-9);
    }

    #[test]
    fn test_config_rejects_out_of_range_depot() {
        std::env::set_var("DEPOT_LAT", "91.5");

        let result = Config::from_env();
        assert!(result.is_err());

        // Cleanup
        std::env::remove_var("DEPOT_LAT");
    }
}
