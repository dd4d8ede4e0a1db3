//! GeoJSON point representation and distance math.
//!
//! `GeoPoint` is the stored spatial shape: coordinates are longitude-first
//! per the GeoJSON specification, the inverse of the latitude-first fields
//! on [`crate::report::Location`]. Spatial indexes consume exactly this
//! shape, so the order is a storage-format invariant.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean Earth radius in meters (IUGG).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A GeoJSON Point: `{"type": "Point", "coordinates": [longitude, latitude]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    /// Always `"Point"`.
    #[serde(rename = "type")]
    #[schema(example = "Point")]
    pub kind: String,
    /// `[longitude, latitude]`
    #[schema(example = json!([120.9842, 14.5995]))]
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    /// Build a point from longitude and latitude, in that order.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// Great-circle distance between two points in meters.
///
/// Haversine formula over a spherical Earth; accurate to ~0.5% which is
/// plenty for "reports near X" radius queries.
pub fn haversine_distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let dlat = (b.latitude() - a.latitude()).to_radians();
    let dlon = (b.longitude() - a.longitude()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
