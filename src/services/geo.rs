//! Geographic calculations

use thiserror::Error;

use crate::types::Coordinates;

/// Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A coordinate component outside its valid range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl CoordinateError {
    /// Name of the rejected field, for structured error replies.
    pub const fn field(&self) -> &'static str {
        match self {
            CoordinateError::LatitudeOutOfRange(_) => "lat",
            CoordinateError::LongitudeOutOfRange(_) => "lng",
        }
    }
}

/// Calculate Haversine (great-circle) distance between two points in meters
pub fn haversine_distance_m(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Validate a coordinate pair before it is accepted for persistence.
/// Rejection names the specific out-of-range field.
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), CoordinateError> {
    // Range checks also reject NaN (NaN compares false against both bounds).
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CoordinateError::LatitudeOutOfRange(lat));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(CoordinateError::LongitudeOutOfRange(lng));
    }
    Ok(())
}
