//! NATS message types

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Leg, Order, ScheduleMode, Stop};

/// Generic request wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request<T> {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub payload: T,
}

impl<T> Request<T> {
    pub fn new(payload: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Generic success response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse<T> {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub payload: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(request_id: Uuid, payload: T) -> Self {
        Self {
            id: request_id,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(request_id: Uuid, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: request_id,
            timestamp: Utc::now(),
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

// ============================================================================
// Handler payloads
// ============================================================================

/// Build the unconfirmed pickup/delivery stop list from a set of orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStopsRequest {
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStopsResponse {
    pub stops: Vec<Stop>,
}

/// Compute arrival times for a route snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceRouteRequest {
    /// When the driver leaves the depot.
    pub start_time: NaiveTime,
    pub stops: Vec<Stop>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceRouteResponse {
    /// Input stops with `arrival` filled in, same order.
    pub stops: Vec<Stop>,
    /// Elapsed minutes from start to the end of the last stop.
    pub total_minutes: i64,
    /// Which computation produced these times.
    pub mode: ScheduleMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Persist a corrected coordinate pair for one leg of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateUpdateRequest {
    pub order_id: Uuid,
    pub leg: Leg,
    pub lat: f64,
    pub lng: f64,
}

/// Hand computed arrival times to the messaging sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRouteRequest {
    pub stops: Vec<Stop>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRouteResponse {
    /// Messages handed to the sink.
    pub dispatched: usize,
    /// Stops skipped (breaks, or no computed arrival yet).
    pub skipped: usize,
}

/// Empty payload that accepts both `null` and `{}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_envelope_round_trip() {
        let request = Request::new(CoordinateUpdateRequest {
            order_id: Uuid::new_v4(),
            leg: Leg::Pickup,
            lat: 52.4862,
            lng: -1.8904,
        });

        let bytes = serde_json::to_vec(&request).unwrap();
        let parsed: Request<CoordinateUpdateRequest> = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(parsed.id, request.id);
        assert_eq!(parsed.payload.order_id, request.payload.order_id);
        assert_eq!(parsed.payload.leg, Leg::Pickup);
    }

    #[test]
    fn test_error_response_details_omitted_when_none() {
        let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", "bad payload");
        let value = serde_json::to_value(&error).unwrap();
        assert!(value["error"].get("details").is_none());

        let with = error.with_details(serde_json::json!({ "field": "lat" }));
        let value = serde_json::to_value(&with).unwrap();
        assert_eq!(value["error"]["details"]["field"], "lat");
    }
}
