use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decimal-degree position handed to the map surface
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.latitude, self.longitude)
    }
}

/// Axis-aligned lat/lon box; no antimeridian wrapping
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingRegion {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingRegion {
    /// Degenerate region covering exactly one position
    pub fn from_point(position: LatLng) -> Self {
        Self {
            south: position.latitude,
            west: position.longitude,
            north: position.latitude,
            east: position.longitude,
        }
    }

    /// Grow the region so it contains `position`
    pub fn extend(&mut self, position: LatLng) {
        self.south = self.south.min(position.latitude);
        self.north = self.north.max(position.latitude);
        self.west = self.west.min(position.longitude);
        self.east = self.east.max(position.longitude);
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn is_point(&self) -> bool {
        self.south == self.north && self.west == self.east
    }

    pub fn contains(&self, position: LatLng) -> bool {
        position.latitude >= self.south
            && position.latitude <= self.north
            && position.longitude >= self.west
            && position.longitude <= self.east
    }
}

impl fmt::Display for BoundingRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.7}, {:.7}] - [{:.7}, {:.7}]",
            self.south, self.west, self.north, self.east
        )
    }
}
