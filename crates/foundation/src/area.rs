use crate::coords::Coordinates;

/// Grid resolution used for import memoization (1/20 degree, roughly 5 km).
pub const AREA_CELLS_PER_DEGREE: u16 = 20;

/// Coarse grid cell of a coordinate.
///
/// Two coordinates inside the same cell always produce equal keys. The
/// `Display` form names the cell's south-west corner, e.g. `52.50_13.40`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AreaKey {
    lat_cell: i32,
    lng_cell: i32,
    cells_per_degree: u16,
}

impl AreaKey {
    pub fn of(c: Coordinates) -> Self {
        Self::with_resolution(c, AREA_CELLS_PER_DEGREE)
    }

    pub fn with_resolution(c: Coordinates, cells_per_degree: u16) -> Self {
        let cells = f64::from(cells_per_degree.max(1));
        Self {
            lat_cell: (c.latitude * cells).floor() as i32,
            lng_cell: (c.longitude * cells).floor() as i32,
            cells_per_degree: cells_per_degree.max(1),
        }
    }

    pub fn lat_cell(&self) -> i32 {
        self.lat_cell
    }

    pub fn lng_cell(&self) -> i32 {
        self.lng_cell
    }

    /// South-west corner of the cell.
    pub fn origin(&self) -> Coordinates {
        let cells = f64::from(self.cells_per_degree);
        Coordinates {
            latitude: f64::from(self.lat_cell) / cells,
            longitude: f64::from(self.lng_cell) / cells,
        }
    }
}

impl std::fmt::Display for AreaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let o = self.origin();
        write!(f, "{:.2}_{:.2}", o.latitude, o.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::AreaKey;
    use crate::coords::Coordinates;

    fn c(lat: f64, lng: f64) -> Coordinates {
        Coordinates::new(lat, lng).unwrap()
    }

    #[test]
    fn same_cell_same_key() {
        let a = AreaKey::of(c(52.501, 13.401));
        let b = AreaKey::of(c(52.549, 13.449));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "52.50_13.40");
    }

    #[test]
    fn adjacent_cells_differ() {
        let a = AreaKey::of(c(52.549, 13.40));
        let north = AreaKey::of(c(52.551, 13.40));
        let east = AreaKey::of(c(52.52, 13.451));
        assert_ne!(a, north);
        assert_ne!(a, east);
        assert_eq!(north.lat_cell(), a.lat_cell() + 1);
        assert_eq!(east.lng_cell(), a.lng_cell() + 1);
    }

    #[test]
    fn negative_coordinates_floor_towards_south_west() {
        let k = AreaKey::of(c(-0.01, -0.01));
        assert_eq!(k.to_string(), "-0.05_-0.05");
        assert_eq!(AreaKey::of(c(0.0, 0.0)).to_string(), "0.00_0.00");
    }

    #[test]
    fn coarser_resolution_merges_cells() {
        let a = AreaKey::with_resolution(c(52.1, 13.1), 1);
        let b = AreaKey::with_resolution(c(52.9, 13.9), 1);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "52.00_13.00");
    }
}
