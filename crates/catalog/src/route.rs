use serde::{Deserialize, Serialize};

use foundation::Coordinates;

use crate::poi::{Poi, PoiCategory};

/// GeoJSON LineString; coordinates are `[lng, lat]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    #[serde(rename = "type", default = "line_string_tag")]
    pub kind: String,
    pub coordinates: Vec<[f64; 2]>,
}

fn line_string_tag() -> String {
    "LineString".to_string()
}

impl LineString {
    pub fn new(coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            kind: line_string_tag(),
            coordinates,
        }
    }

    pub fn points(&self) -> impl Iterator<Item = Coordinates> + '_ {
        self.coordinates.iter().copied().map(Coordinates::from_lng_lat)
    }

    pub fn last_point(&self) -> Option<Coordinates> {
        self.coordinates.last().copied().map(Coordinates::from_lng_lat)
    }
}

/// A candidate route. Legs and waypoints are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waypoints: Vec<serde_json::Value>,
    pub geometry: LineString,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legs: Vec<serde_json::Value>,
}

impl Route {
    pub fn new(id: impl Into<String>, coordinates: Vec<[f64; 2]>, distance: f64, duration: f64) -> Self {
        Self {
            id: id.into(),
            origin: None,
            destination: None,
            waypoints: Vec::new(),
            geometry: LineString::new(coordinates),
            distance,
            duration,
            legs: Vec::new(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Car,
    Bicycle,
    Pedestrian,
}

/// Partial route settings; absent fields use server defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adventure_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poi_categories: Option<Vec<PoiCategory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid_highways: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid_tolls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_mode: Option<TransportMode>,
}

impl RouteSettings {
    /// Direct walking route with no detours.
    pub fn walking() -> Self {
        Self {
            adventure_level: Some(0.0),
            avoid_highways: Some(false),
            avoid_tolls: Some(false),
            transport_mode: Some(TransportMode::Pedestrian),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRouteRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub settings: RouteSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteResponse {
    pub route: Route,
    #[serde(default)]
    pub alternative_routes: Vec<Route>,
    #[serde(default)]
    pub pois_on_route: Vec<Poi>,
}

impl CreateRouteResponse {
    /// Primary first, then alternates in server order.
    pub fn into_routes(self) -> Vec<Route> {
        let mut routes = Vec::with_capacity(1 + self.alternative_routes.len());
        routes.push(self.route);
        routes.extend(self.alternative_routes);
        routes
    }
}
