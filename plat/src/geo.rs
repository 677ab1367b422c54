//! Service region bounds.
//!
//! Empty-map clicks outside the service region are ignored outright
//! (see [`crate::click`]). The reference deployment covers Minnesota.

use plat_api::LatLng;
use serde::{Deserialize, Serialize};

/// Geographic bounding box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Minnesota's bounding box.
    pub const MINNESOTA: GeoBounds = GeoBounds {
        south: 43.499356,
        west: -97.239209,
        north: 49.384358,
        east: -89.491739,
    };

    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Whether the location falls inside the box, edges included.
    ///
    /// Non-finite coordinates are never inside.
    pub fn contains(&self, location: LatLng) -> bool {
        location.is_finite()
            && location.lat >= self.south
            && location.lat <= self.north
            && location.lng >= self.west
            && location.lng <= self.east
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self::MINNESOTA
    }
}
