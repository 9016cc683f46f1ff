use serde::{Deserialize, Serialize};

/// WGS84 position in degrees.
///
/// Field names follow the REST payloads (`latitude` / `longitude`).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GeoError {
    NonFinite,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
    InvertedBounds,
}

impl std::fmt::Display for GeoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoError::NonFinite => write!(f, "coordinate is not a finite number"),
            GeoError::LatitudeOutOfRange(v) => write!(f, "latitude out of range: {v}"),
            GeoError::LongitudeOutOfRange(v) => write!(f, "longitude out of range: {v}"),
            GeoError::InvertedBounds => write!(f, "bounding box min exceeds max"),
        }
    }
}

impl std::error::Error for GeoError {}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let c = Self {
            latitude,
            longitude,
        };
        c.validate()?;
        Ok(c)
    }

    /// Checks finiteness and the WGS84 ranges.
    pub fn validate(&self) -> Result<(), GeoError> {
        validate_lat(self.latitude)?;
        validate_lng(self.longitude)
    }

    /// GeoJSON ordering: `[lng, lat]`.
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self {
            latitude: pair[1],
            longitude: pair[0],
        }
    }
}

pub(crate) fn validate_lat(v: f64) -> Result<(), GeoError> {
    if !v.is_finite() {
        return Err(GeoError::NonFinite);
    }
    if !(-90.0..=90.0).contains(&v) {
        return Err(GeoError::LatitudeOutOfRange(v));
    }
    Ok(())
}

pub(crate) fn validate_lng(v: f64) -> Result<(), GeoError> {
    if !v.is_finite() {
        return Err(GeoError::NonFinite);
    }
    if !(-180.0..=180.0).contains(&v) {
        return Err(GeoError::LongitudeOutOfRange(v));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Coordinates, GeoError};

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert!(Coordinates::new(52.5, 13.4).is_ok());
        assert_eq!(
            Coordinates::new(91.0, 0.0),
            Err(GeoError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            Coordinates::new(0.0, -180.5),
            Err(GeoError::LongitudeOutOfRange(-180.5))
        );
        assert_eq!(Coordinates::new(f64::NAN, 0.0), Err(GeoError::NonFinite));
    }

    #[test]
    fn lng_lat_pair_order() {
        let c = Coordinates::from_lng_lat([13.4, 52.5]);
        assert_eq!(c.latitude, 52.5);
        assert_eq!(c.to_lng_lat(), [13.4, 52.5]);
    }
}
