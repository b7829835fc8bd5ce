//! Geographic coordinates.

use serde::{Deserialize, Serialize};

/// A point on the globe, degrees.
///
/// The engine never interprets coordinates itself; it only hands pairs of
/// points to a `DistanceProvider` and consumes the returned metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }
}
