use foundation::Coordinates;
use serde::{Deserialize, Serialize};

use crate::symbology::{Color, DESTINATION_COLOR, RouteStyle};

/// Route payload understood by the map surface. Coordinates are `[lng, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOverlay {
    pub id: String,
    pub coordinates: Vec<[f64; 2]>,
    pub color: Color,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledPolyline {
    pub id: String,
    pub coordinates: Vec<[f64; 2]>,
    pub color: Color,
    pub style: RouteStyle,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DestinationPin {
    pub position: Coordinates,
    pub color: Color,
}

/// Draw list for a full route replacement, bottom layer first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoutePlan {
    pub polylines: Vec<StyledPolyline>,
    pub destination: Option<DestinationPin>,
}

impl RoutePlan {
    pub fn build(overlays: &[RouteOverlay]) -> Self {
        let (selected, rest): (Vec<&RouteOverlay>, Vec<&RouteOverlay>) =
            overlays.iter().partition(|o| o.is_selected);

        let polylines = rest
            .iter()
            .chain(selected.iter())
            .map(|o| StyledPolyline {
                id: o.id.clone(),
                coordinates: o.coordinates.clone(),
                color: o.color,
                style: RouteStyle::for_selection(o.is_selected),
            })
            .collect();

        let destination = selected
            .first()
            .and_then(|o| o.coordinates.last())
            .map(|&pair| DestinationPin {
                position: Coordinates::from_lng_lat(pair),
                color: DESTINATION_COLOR,
            });

        Self {
            polylines,
            destination,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }

    /// Top-most polyline, i.e. the one drawn last.
    pub fn top(&self) -> Option<&StyledPolyline> {
        self.polylines.last()
    }
}
