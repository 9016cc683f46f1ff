use std::env;
use std::time::Duration;

use catalog::PoiCategory;
use foundation::BoundingBox;
use streaming::{SyncConfig, SyncConfigError};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";

/// Runtime settings for the navigator host.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigatorConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub sync: SyncConfig,
    /// Filter active at startup. Empty shows no POIs.
    pub categories: Vec<PoiCategory>,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            sync: SyncConfig::default(),
            categories: Vec::new(),
        }
    }
}

impl NavigatorConfig {
    /// Defaults overridden by `NAVIGATOR_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let sync = SyncConfig {
            debounce_ms: env_var_u64("NAVIGATOR_DEBOUNCE_MS", defaults.sync.debounce_ms),
            min_zoom_for_pois: env_var_f64("NAVIGATOR_MIN_ZOOM", defaults.sync.min_zoom_for_pois),
            result_limit: env_var_usize("NAVIGATOR_RESULT_LIMIT", defaults.sync.result_limit),
            ..defaults.sync
        };
        Self {
            api_url: env::var("NAVIGATOR_API_URL").unwrap_or(defaults.api_url),
            timeout: Duration::from_secs(env_var_u64(
                "NAVIGATOR_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )),
            sync,
            categories: defaults.categories,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        self.sync.validate().map_err(ConfigError::Sync)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnknownCategory(String),
    InvalidBbox(String),
    ZeroTimeout,
    Sync(SyncConfigError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnknownCategory(c) => write!(f, "unknown category: {c}"),
            ConfigError::InvalidBbox(reason) => write!(f, "invalid bbox: {reason}"),
            ConfigError::ZeroTimeout => write!(f, "request timeout must be non-zero"),
            ConfigError::Sync(err) => write!(f, "invalid sync settings: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parses `museum,cafe`. Blank input yields an empty list.
pub fn parse_categories(s: &str) -> Result<Vec<PoiCategory>, ConfigError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse()
                .map_err(|_| ConfigError::UnknownCategory(part.to_string()))
        })
        .collect()
}

/// Parses `minLat,maxLat,minLng,maxLng`.
pub fn parse_bbox(s: &str) -> Result<BoundingBox, ConfigError> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| ConfigError::InvalidBbox(e.to_string()))?;
    let &[min_lat, max_lat, min_lng, max_lng] = parts.as_slice() else {
        return Err(ConfigError::InvalidBbox(format!(
            "expected 4 numbers, got {}",
            parts.len()
        )));
    };
    BoundingBox::new(min_lat, max_lat, min_lng, max_lng)
        .map_err(|e| ConfigError::InvalidBbox(e.to_string()))
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}
