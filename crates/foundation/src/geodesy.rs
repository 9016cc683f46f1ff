/// Flat-earth approximation used for import radii (~111 km per degree).
pub const METERS_PER_DEGREE: f64 = 111_000.0;

pub fn degrees_to_meters(deg: f64) -> f64 {
    deg * METERS_PER_DEGREE
}
