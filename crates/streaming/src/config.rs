use std::fmt;
use std::time::Duration;

use foundation::{AREA_CELLS_PER_DEGREE, BoundingBox, degrees_to_meters};
use serde::{Deserialize, Serialize};

/// Tunables of the viewport sync loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Below this zoom the POI set is cleared instead of queried.
    pub min_zoom_for_pois: f64,

    /// Zoom assumed for the bounds reported by the `ready` handshake.
    pub initial_zoom: f64,

    /// Cap on a single bbox query.
    pub result_limit: usize,

    /// Quiet period after the last movement before a sync fires.
    pub debounce_ms: u64,

    pub import_radius_min_m: f64,
    pub import_radius_max_m: f64,

    /// Resolution of the import memo grid.
    pub area_cells_per_degree: u16,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            min_zoom_for_pois: 13.0,
            initial_zoom: 15.0,
            result_limit: 200,
            debounce_ms: 500,
            import_radius_min_m: 2_000.0,
            import_radius_max_m: 10_000.0,
            area_cells_per_degree: AREA_CELLS_PER_DEGREE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncConfigError {
    NonFinite(&'static str),
    RadiusRange { min: f64, max: f64 },
    ZeroResultLimit,
    ZeroAreaResolution,
}

impl fmt::Display for SyncConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncConfigError::NonFinite(field) => write!(f, "{field} must be a finite number"),
            SyncConfigError::RadiusRange { min, max } => {
                write!(f, "import radius range {min}..{max} is empty or negative")
            }
            SyncConfigError::ZeroResultLimit => write!(f, "result_limit must be at least 1"),
            SyncConfigError::ZeroAreaResolution => {
                write!(f, "area_cells_per_degree must be at least 1")
            }
        }
    }
}

impl std::error::Error for SyncConfigError {}

impl SyncConfig {
    /// Rejects settings that would silently disable the zoom gate or the
    /// radius clamp.
    pub fn validate(&self) -> Result<(), SyncConfigError> {
        let finite = [
            ("min_zoom_for_pois", self.min_zoom_for_pois),
            ("initial_zoom", self.initial_zoom),
            ("import_radius_min_m", self.import_radius_min_m),
            ("import_radius_max_m", self.import_radius_max_m),
        ];
        if let Some((field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SyncConfigError::NonFinite(field));
        }
        if self.import_radius_min_m < 0.0 || self.import_radius_min_m > self.import_radius_max_m {
            return Err(SyncConfigError::RadiusRange {
                min: self.import_radius_min_m,
                max: self.import_radius_max_m,
            });
        }
        if self.result_limit == 0 {
            return Err(SyncConfigError::ZeroResultLimit);
        }
        if self.area_cells_per_degree == 0 {
            return Err(SyncConfigError::ZeroAreaResolution);
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Half the larger angular span in meters, clamped to the import radius range.
    pub fn import_radius_m(&self, bounds: &BoundingBox) -> f64 {
        let radius = degrees_to_meters(bounds.max_span()) / 2.0;
        // max/min instead of clamp: an unvalidated range must not panic.
        radius.max(self.import_radius_min_m).min(self.import_radius_max_m)
    }
}

#[cfg(test)]
mod tests {
    use super::{SyncConfig, SyncConfigError};
    use foundation::BoundingBox;

    #[test]
    fn import_radius_is_clamped() {
        let cfg = SyncConfig::default();

        let tiny = BoundingBox::new(52.50, 52.51, 13.40, 13.41).unwrap();
        assert_eq!(cfg.import_radius_m(&tiny), 2_000.0);

        // 0.1 degree span -> 11.1 km / 2 = 5550 m.
        let mid = BoundingBox::new(52.45, 52.55, 13.40, 13.45).unwrap();
        assert!((cfg.import_radius_m(&mid) - 5_550.0).abs() < 1e-6);

        let huge = BoundingBox::new(50.0, 54.0, 10.0, 16.0).unwrap();
        assert_eq!(cfg.import_radius_m(&huge), 10_000.0);
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SyncConfig::default().validate(), Ok(()));
    }

    #[test]
    fn nan_min_zoom_is_rejected() {
        let cfg = SyncConfig {
            min_zoom_for_pois: f64::NAN,
            ..SyncConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(SyncConfigError::NonFinite("min_zoom_for_pois"))
        );
    }

    #[test]
    fn inverted_radius_range_is_rejected_without_panicking() {
        let cfg: SyncConfig = serde_json::from_str(
            r#"{"import_radius_min_m": 10000.0, "import_radius_max_m": 2000.0}"#,
        )
        .unwrap();
        assert_eq!(
            cfg.validate(),
            Err(SyncConfigError::RadiusRange {
                min: 10_000.0,
                max: 2_000.0
            })
        );
        let tiny = BoundingBox::new(52.50, 52.51, 13.40, 13.41).unwrap();
        assert_eq!(cfg.import_radius_m(&tiny), 2_000.0);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: SyncConfig = serde_json::from_str(r#"{"debounce_ms": 250}"#).unwrap();
        assert_eq!(cfg.debounce_ms, 250);
        assert_eq!(cfg.result_limit, 200);
        assert_eq!(cfg.min_zoom_for_pois, 13.0);
    }
}
