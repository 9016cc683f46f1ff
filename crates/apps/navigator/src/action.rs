//! Host-side inputs for the headless navigator.
//!
//! Each input line is either a surface event (tagged by `type`) or a host
//! action (tagged by `action`).

use catalog::PoiCategory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HostAction {
    SetCategories { categories: Vec<PoiCategory> },
    ToggleCategory { category: PoiCategory },
    SelectAllCategories,
    ClearCategories,
    /// GPS fix; heading in degrees from north.
    SetUserLocation {
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        heading: Option<f64>,
    },
    CenterOnUser,
    /// Route from the user to the POI last tapped on the map.
    Navigate,
    SelectRoute { id: String },
    CancelNavigation,
    SetNavigationMode { enabled: bool },
    /// Compass tap: rotate back to north.
    ResetBearing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostInput {
    Action(HostAction),
    /// Raw text for the surface bridge to decode.
    Surface(String),
}

impl HostInput {
    /// Lines with an `action` key are host actions; anything else goes to
    /// the bridge, which drops what it cannot decode.
    pub fn classify(line: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(_) => return Ok(HostInput::Surface(line.to_string())),
        };
        if value.get("action").is_some() {
            serde_json::from_value(value).map(HostInput::Action)
        } else {
            Ok(HostInput::Surface(line.to_string()))
        }
    }
}
