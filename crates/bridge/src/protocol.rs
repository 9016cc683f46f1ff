//! Inbound messages from the map surface.
//!
//! Events are JSON objects tagged by `type`. The surface script predates the
//! current tag names, so its legacy tags (`mapReady`, `mapMove`,
//! `markerPress`, `routePress`, `bearingChange`) and id fields (`poiId`,
//! `routeId`) are accepted too. Every decoded payload is range-checked.

use foundation::{BoundingBox, Coordinates, GeoError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", try_from = "RawEvent")]
pub enum SurfaceEvent {
    /// Initial render finished. Sent once per surface lifetime.
    Ready {
        #[serde(skip_serializing_if = "Option::is_none")]
        bounds: Option<BoundingBox>,
    },
    /// A pan, zoom or rotate settled.
    ViewportChanged {
        center: Coordinates,
        zoom: f64,
        bounds: BoundingBox,
    },
    MarkerTapped { id: String },
    RouteTapped { id: String },
    BearingChanged { bearing: f64 },
}

#[derive(Debug)]
pub enum DecodeError {
    /// Not JSON, unknown tag or missing fields.
    Malformed(serde_json::Error),
    /// Well-formed but out of range.
    Invalid(String),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Malformed(e) => write!(f, "malformed surface message: {e}"),
            DecodeError::Invalid(reason) => write!(f, "invalid surface message: {reason}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Malformed(e) => Some(e),
            DecodeError::Invalid(_) => None,
        }
    }
}

impl From<GeoError> for DecodeError {
    fn from(e: GeoError) -> Self {
        DecodeError::Invalid(e.to_string())
    }
}

impl SurfaceEvent {
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let raw: RawEvent = serde_json::from_str(text).map_err(DecodeError::Malformed)?;
        Self::try_from(raw)
    }

    pub fn to_json(&self) -> String {
        // Only plain strings and numbers; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Wire shape before validation; accepts both tag vocabularies.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum RawEvent {
    #[serde(alias = "mapReady")]
    Ready {
        #[serde(default)]
        bounds: Option<BoundingBox>,
    },
    #[serde(alias = "mapMove")]
    ViewportChanged {
        #[serde(default)]
        center: Option<Coordinates>,
        #[serde(default)]
        lat: Option<f64>,
        #[serde(default)]
        lng: Option<f64>,
        zoom: f64,
        bounds: BoundingBox,
    },
    #[serde(alias = "markerPress")]
    MarkerTapped {
        #[serde(alias = "poiId")]
        id: String,
    },
    #[serde(alias = "routePress")]
    RouteTapped {
        #[serde(alias = "routeId")]
        id: String,
    },
    #[serde(alias = "bearingChange")]
    BearingChanged { bearing: f64 },
}

impl TryFrom<RawEvent> for SurfaceEvent {
    type Error = DecodeError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        match raw {
            RawEvent::Ready { bounds } => {
                if let Some(b) = &bounds {
                    b.validate()?;
                }
                Ok(SurfaceEvent::Ready { bounds })
            }
            RawEvent::ViewportChanged {
                center,
                lat,
                lng,
                zoom,
                bounds,
            } => {
                let center = match (center, lat, lng) {
                    (Some(c), _, _) => c,
                    (None, Some(lat), Some(lng)) => Coordinates {
                        latitude: lat,
                        longitude: lng,
                    },
                    _ => return Err(DecodeError::Invalid("viewport without center".into())),
                };
                center.validate()?;
                bounds.validate()?;
                if !zoom.is_finite() || zoom < 0.0 {
                    return Err(DecodeError::Invalid(format!("zoom out of range: {zoom}")));
                }
                Ok(SurfaceEvent::ViewportChanged {
                    center,
                    zoom,
                    bounds,
                })
            }
            RawEvent::MarkerTapped { id } => Ok(SurfaceEvent::MarkerTapped { id: non_empty(id)? }),
            RawEvent::RouteTapped { id } => Ok(SurfaceEvent::RouteTapped { id: non_empty(id)? }),
            RawEvent::BearingChanged { bearing } => {
                if !bearing.is_finite() {
                    return Err(DecodeError::Invalid("bearing is not finite".into()));
                }
                Ok(SurfaceEvent::BearingChanged { bearing })
            }
        }
    }
}

fn non_empty(id: String) -> Result<String, DecodeError> {
    if id.is_empty() {
        Err(DecodeError::Invalid("empty id".into()))
    } else {
        Ok(id)
    }
}
