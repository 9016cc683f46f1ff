//! Outbound commands and their script encoding.
//!
//! A command becomes one `window.<fn>(<args>); true;` statement. Arguments
//! are JSON literals; numbers must be finite and the characters that could
//! close a string literal or an enclosing `<script>` block are escaped.

use foundation::{Coordinates, GeoError};
use layers::{MarkerSpec, RouteOverlay};
use serde::Serialize;

/// Cached slot of a state command; replayed on `ready`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateSlot {
    NavigationMode,
    UserLocation,
    Markers,
    Routes,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// Latest value per slot is cached and re-sent after `ready`.
    State(StateSlot),
    /// Empties a slot; nothing is replayed for it afterwards.
    Reset(StateSlot),
    /// One-shot; sent as is.
    Imperative,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    SetCenter {
        center: Coordinates,
        zoom: Option<f64>,
    },
    UpdateUserLocation {
        position: Coordinates,
        heading: Option<f64>,
    },
    SetNavigationMode {
        enabled: bool,
    },
    SetBearing {
        bearing: f64,
    },
    /// Follow view; the surface defaults `zoom` to 18.
    SetNavigationView {
        position: Coordinates,
        heading: f64,
        zoom: Option<f64>,
    },
    UpdateMarkers(Vec<MarkerSpec>),
    ClearMarkers,
    UpdateRoutes(Vec<RouteOverlay>),
    ClearRoutes,
    /// `[lng, lat]` pairs to frame.
    FitBounds(Vec<[f64; 2]>),
}

#[derive(Debug)]
pub enum EncodeError {
    NonFinite {
        function: &'static str,
        field: &'static str,
    },
    InvalidCoordinates {
        function: &'static str,
        error: GeoError,
    },
    Json(serde_json::Error),
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::NonFinite { function, field } => {
                write!(f, "{function}: {field} is not a finite number")
            }
            EncodeError::InvalidCoordinates { function, error } => write!(f, "{function}: {error}"),
            EncodeError::Json(e) => write!(f, "serialization failed: {e}"),
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::InvalidCoordinates { error, .. } => Some(error),
            EncodeError::Json(e) => Some(e),
            EncodeError::NonFinite { .. } => None,
        }
    }
}

impl From<serde_json::Error> for EncodeError {
    fn from(e: serde_json::Error) -> Self {
        EncodeError::Json(e)
    }
}

impl SurfaceCommand {
    /// Name of the surface function this command invokes.
    pub fn function(&self) -> &'static str {
        match self {
            SurfaceCommand::SetCenter { .. } => "setCenter",
            SurfaceCommand::UpdateUserLocation { .. } => "updateUserLocation",
            SurfaceCommand::SetNavigationMode { .. } => "setNavigationMode",
            SurfaceCommand::SetBearing { .. } => "setBearing",
            SurfaceCommand::SetNavigationView { .. } => "setNavigationView",
            SurfaceCommand::UpdateMarkers(_) => "updateMarkers",
            SurfaceCommand::ClearMarkers => "clearMarkers",
            SurfaceCommand::UpdateRoutes(_) => "updateRoutes",
            SurfaceCommand::ClearRoutes => "clearRoutes",
            SurfaceCommand::FitBounds(_) => "fitBounds",
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            SurfaceCommand::SetNavigationMode { .. } => CommandKind::State(StateSlot::NavigationMode),
            SurfaceCommand::UpdateUserLocation { .. } => CommandKind::State(StateSlot::UserLocation),
            SurfaceCommand::UpdateMarkers(_) => CommandKind::State(StateSlot::Markers),
            SurfaceCommand::UpdateRoutes(_) => CommandKind::State(StateSlot::Routes),
            SurfaceCommand::ClearMarkers => CommandKind::Reset(StateSlot::Markers),
            SurfaceCommand::ClearRoutes => CommandKind::Reset(StateSlot::Routes),
            SurfaceCommand::SetCenter { .. }
            | SurfaceCommand::SetBearing { .. }
            | SurfaceCommand::SetNavigationView { .. }
            | SurfaceCommand::FitBounds(_) => CommandKind::Imperative,
        }
    }

    pub fn encode(&self) -> Result<String, EncodeError> {
        let args = self.arguments()?;
        let mut script = format!("window.{}(", self.function());
        script.push_str(&escape_script(&args.join(", ")));
        script.push_str("); true;");
        Ok(script)
    }

    /// Each argument as a JSON literal.
    fn arguments(&self) -> Result<Vec<String>, EncodeError> {
        let function = self.function();
        let finite = |field: &'static str, v: f64| {
            if v.is_finite() {
                Ok(v)
            } else {
                Err(EncodeError::NonFinite { function, field })
            }
        };
        let position = |c: &Coordinates| {
            c.validate()
                .map_err(|error| EncodeError::InvalidCoordinates { function, error })
        };

        let args = match self {
            SurfaceCommand::SetCenter { center, zoom } => {
                position(center)?;
                let mut args = vec![lit(&center.latitude)?, lit(&center.longitude)?];
                if let Some(z) = zoom {
                    args.push(lit(&finite("zoom", *z)?)?);
                }
                args
            }
            SurfaceCommand::UpdateUserLocation { position: p, heading } => {
                position(p)?;
                let mut args = vec![lit(&p.latitude)?, lit(&p.longitude)?];
                if let Some(h) = heading {
                    args.push(lit(&finite("heading", *h)?)?);
                }
                args
            }
            SurfaceCommand::SetNavigationMode { enabled } => vec![lit(&enabled)?],
            SurfaceCommand::SetBearing { bearing } => vec![lit(&finite("bearing", *bearing)?)?],
            SurfaceCommand::SetNavigationView {
                position: p,
                heading,
                zoom,
            } => {
                position(p)?;
                let mut args = vec![
                    lit(&p.latitude)?,
                    lit(&p.longitude)?,
                    lit(&finite("heading", *heading)?)?,
                ];
                if let Some(z) = zoom {
                    args.push(lit(&finite("zoom", *z)?)?);
                }
                args
            }
            SurfaceCommand::UpdateMarkers(markers) => {
                for m in markers {
                    finite("lat", m.lat)?;
                    finite("lng", m.lng)?;
                }
                vec![lit(markers)?]
            }
            SurfaceCommand::UpdateRoutes(routes) => {
                for r in routes {
                    check_pairs(&r.coordinates, &finite)?;
                }
                vec![lit(routes)?]
            }
            SurfaceCommand::FitBounds(coordinates) => {
                check_pairs(coordinates, &finite)?;
                vec![lit(&coordinates)?]
            }
            SurfaceCommand::ClearMarkers | SurfaceCommand::ClearRoutes => Vec::new(),
        };
        Ok(args)
    }
}

fn lit<T: Serialize + ?Sized>(value: &T) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(value)?)
}

fn check_pairs(
    pairs: &[[f64; 2]],
    finite: &impl Fn(&'static str, f64) -> Result<f64, EncodeError>,
) -> Result<(), EncodeError> {
    for [lng, lat] in pairs {
        finite("lng", *lng)?;
        finite("lat", *lat)?;
    }
    Ok(())
}

/// Escapes characters that are legal in JSON strings but unsafe inside an
/// injected script. The result is still valid JSON.
pub fn escape_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}
