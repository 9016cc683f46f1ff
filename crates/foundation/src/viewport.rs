use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;
use crate::coords::Coordinates;

/// Visible region plus zoom level, as reported by the map surface.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: f64,
    pub bounds: BoundingBox,
}

impl Viewport {
    pub fn new(center: Coordinates, zoom: f64, bounds: BoundingBox) -> Self {
        Self {
            center,
            zoom,
            bounds,
        }
    }

    /// Viewport known only from its bounds (the `ready` handshake).
    pub fn from_bounds(bounds: BoundingBox, zoom: f64) -> Self {
        Self {
            center: bounds.center(),
            zoom,
            bounds,
        }
    }
}
