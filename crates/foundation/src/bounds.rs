use serde::{Deserialize, Serialize};

use crate::coords::{Coordinates, GeoError, validate_lat, validate_lng};

/// Geographic bounding box in degrees.
///
/// No date-line wraparound: `min_lng <= max_lng` always holds for a valid box.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Result<Self, GeoError> {
        let b = Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        };
        b.validate()?;
        Ok(b)
    }

    pub fn validate(&self) -> Result<(), GeoError> {
        validate_lat(self.min_lat)?;
        validate_lat(self.max_lat)?;
        validate_lng(self.min_lng)?;
        validate_lng(self.max_lng)?;
        if self.min_lat > self.max_lat || self.min_lng > self.max_lng {
            return Err(GeoError::InvertedBounds);
        }
        Ok(())
    }

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn enclosing(points: impl IntoIterator<Item = Coordinates>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lng: first.longitude,
            max_lng: first.longitude,
        };
        for p in it {
            b.min_lat = b.min_lat.min(p.latitude);
            b.max_lat = b.max_lat.max(p.latitude);
            b.min_lng = b.min_lng.min(p.longitude);
            b.max_lng = b.max_lng.max(p.longitude);
        }
        Some(b)
    }

    pub fn center(&self) -> Coordinates {
        Coordinates {
            latitude: (self.min_lat + self.max_lat) / 2.0,
            longitude: (self.min_lng + self.max_lng) / 2.0,
        }
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    /// Larger of the two angular spans, in degrees.
    pub fn max_span(&self) -> f64 {
        self.lat_span().max(self.lng_span())
    }
}

#[cfg(test)]
mod tests {
    use super::BoundingBox;
    use crate::coords::{Coordinates, GeoError};

    #[test]
    fn inverted_bounds_are_rejected() {
        assert_eq!(
            BoundingBox::new(53.0, 52.0, 13.0, 14.0),
            Err(GeoError::InvertedBounds)
        );
        assert!(BoundingBox::new(52.0, 52.0, 13.0, 13.0).is_ok());
    }

    #[test]
    fn center_and_spans() {
        let b = BoundingBox::new(52.0, 53.0, 13.0, 13.5).unwrap();
        assert_eq!(b.center(), Coordinates::new(52.5, 13.25).unwrap());
        assert_eq!(b.lat_span(), 1.0);
        assert_eq!(b.lng_span(), 0.5);
        assert_eq!(b.max_span(), 1.0);
    }

    #[test]
    fn enclosing_points() {
        let pts = [
            Coordinates::from_lng_lat([13.4, 52.5]),
            Coordinates::from_lng_lat([13.1, 52.7]),
            Coordinates::from_lng_lat([13.6, 52.4]),
        ];
        let b = BoundingBox::enclosing(pts).unwrap();
        assert_eq!(b, BoundingBox::new(52.4, 52.7, 13.1, 13.6).unwrap());
        assert!(BoundingBox::enclosing(std::iter::empty()).is_none());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let b: BoundingBox = serde_json::from_str(
            r#"{"minLat":1.0,"maxLat":2.0,"minLng":3.0,"maxLng":4.0}"#,
        )
        .unwrap();
        assert_eq!(b, BoundingBox::new(1.0, 2.0, 3.0, 4.0).unwrap());
    }
}
