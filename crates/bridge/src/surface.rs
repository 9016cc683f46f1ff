//! Headless surface that honors the command contract.
//!
//! Keeps the marker layer, route draw list, user marker and camera the way a
//! rendering surface would, and produces the events a real one would emit.

use foundation::{BoundingBox, Coordinates, Viewport};
use layers::{MarkerDiff, MarkerLayer, RoutePlan};
use tracing::trace;

use crate::command::SurfaceCommand;
use crate::protocol::SurfaceEvent;

/// Rotation below this many degrees is not reported.
pub const BEARING_NOISE_DEG: f64 = 0.5;

/// Zoom used by `setNavigationView` when none is given.
pub const NAVIGATION_ZOOM: f64 = 18.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UserMarker {
    pub position: Coordinates,
    pub heading: f64,
}

#[derive(Debug, Clone)]
pub struct SurfaceModel {
    viewport: Viewport,
    bearing: f64,
    reported_bearing: f64,
    markers: MarkerLayer,
    last_marker_diff: MarkerDiff,
    routes: RoutePlan,
    user: Option<UserMarker>,
    navigating: bool,
    announced: bool,
}

impl SurfaceModel {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            bearing: 0.0,
            reported_bearing: 0.0,
            markers: MarkerLayer::new(),
            last_marker_diff: MarkerDiff::default(),
            routes: RoutePlan::default(),
            user: None,
            navigating: false,
            announced: false,
        }
    }

    /// `ready` handshake; `None` after the first call.
    pub fn ready(&mut self) -> Option<SurfaceEvent> {
        if self.announced {
            return None;
        }
        self.announced = true;
        Some(SurfaceEvent::Ready {
            bounds: Some(self.viewport.bounds),
        })
    }

    pub fn apply(&mut self, command: &SurfaceCommand) {
        trace!(function = command.function(), "surface command");
        match command {
            SurfaceCommand::SetCenter { center, zoom } => {
                self.recenter(*center, zoom.unwrap_or(self.viewport.zoom));
            }
            SurfaceCommand::UpdateUserLocation { position, heading } => {
                self.user = Some(UserMarker {
                    position: *position,
                    heading: heading.unwrap_or(0.0),
                });
            }
            SurfaceCommand::SetNavigationMode { enabled } => self.navigating = *enabled,
            SurfaceCommand::SetBearing { bearing } => {
                self.bearing = *bearing;
                self.reported_bearing = *bearing;
            }
            SurfaceCommand::SetNavigationView {
                position,
                heading,
                zoom,
            } => {
                self.bearing = *heading;
                self.reported_bearing = *heading;
                self.recenter(*position, zoom.unwrap_or(NAVIGATION_ZOOM));
            }
            SurfaceCommand::UpdateMarkers(markers) => {
                self.last_marker_diff = self.markers.apply(markers);
            }
            SurfaceCommand::ClearMarkers => {
                self.last_marker_diff = MarkerDiff {
                    removed: self.markers.clear(),
                    added: Vec::new(),
                };
            }
            SurfaceCommand::UpdateRoutes(overlays) => self.routes = RoutePlan::build(overlays),
            SurfaceCommand::ClearRoutes => self.routes = RoutePlan::default(),
            SurfaceCommand::FitBounds(pairs) => {
                let points = pairs.iter().copied().map(Coordinates::from_lng_lat);
                if let Some(bounds) = BoundingBox::enclosing(points) {
                    self.viewport = Viewport::from_bounds(bounds, self.viewport.zoom);
                }
            }
        }
    }

    /// User rotation gesture. Reports only rotations beyond the noise threshold.
    pub fn rotate_to(&mut self, bearing: f64) -> Option<SurfaceEvent> {
        self.bearing = bearing;
        if (bearing - self.reported_bearing).abs() <= BEARING_NOISE_DEG {
            return None;
        }
        self.reported_bearing = bearing;
        Some(SurfaceEvent::BearingChanged { bearing })
    }

    /// User pan/zoom settled at `viewport`.
    pub fn settle(&mut self, viewport: Viewport) -> SurfaceEvent {
        self.viewport = viewport;
        SurfaceEvent::ViewportChanged {
            center: viewport.center,
            zoom: viewport.zoom,
            bounds: viewport.bounds,
        }
    }

    pub fn tap_marker(&self, id: &str) -> Option<SurfaceEvent> {
        self.markers
            .contains(id)
            .then(|| SurfaceEvent::MarkerTapped { id: id.to_string() })
    }

    pub fn tap_route(&self, id: &str) -> Option<SurfaceEvent> {
        self.routes
            .polylines
            .iter()
            .any(|p| p.id == id)
            .then(|| SurfaceEvent::RouteTapped { id: id.to_string() })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    pub fn last_marker_diff(&self) -> &MarkerDiff {
        &self.last_marker_diff
    }

    pub fn routes(&self) -> &RoutePlan {
        &self.routes
    }

    pub fn user(&self) -> Option<&UserMarker> {
        self.user.as_ref()
    }

    pub fn is_navigating(&self) -> bool {
        self.navigating
    }

    fn recenter(&mut self, center: Coordinates, zoom: f64) {
        // Keep the visible extent; only the camera target moves.
        let b = self.viewport.bounds;
        let half_lat = b.lat_span() / 2.0;
        let half_lng = b.lng_span() / 2.0;
        let bounds = BoundingBox {
            min_lat: (center.latitude - half_lat).max(-90.0),
            max_lat: (center.latitude + half_lat).min(90.0),
            min_lng: (center.longitude - half_lng).max(-180.0),
            max_lng: (center.longitude + half_lng).min(180.0),
        };
        self.viewport = Viewport::new(center, zoom, bounds);
    }
}
