use std::fmt;
use std::str::FromStr;

use catalog::PoiCategory;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque sRGB color, always rendered as `#RRGGBB`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color([u8; 3]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorError(pub String);

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color {:?}, expected #RRGGBB", self.0)
    }
}

impl std::error::Error for ColorError {}

impl Color {
    const fn hex(v: u32) -> Self {
        Self([(v >> 16) as u8, (v >> 8) as u8, v as u8])
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorError(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(err)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let v = u32::from_str_radix(digits, 16).map_err(|_| err())?;
        Ok(Self::hex(v))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({self})")
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

pub const DEFAULT_POI_COLOR: Color = Color::hex(0x2196F3);

/// Destination pin drawn at the end of the selected route.
pub const DESTINATION_COLOR: Color = Color::hex(0xF44336);

/// Route colors by position: primary, first alternate, second alternate.
pub const ROUTE_PALETTE: [Color; 3] = [
    Color::hex(0x2196F3),
    Color::hex(0x9C27B0),
    Color::hex(0xFF9800),
];

pub fn category_color(category: PoiCategory) -> Color {
    use PoiCategory::*;
    match category {
        Museum => Color::hex(0x9C27B0),
        Gallery => Color::hex(0x673AB7),
        Park => Color::hex(0x4CAF50),
        Garden => Color::hex(0x8BC34A),
        Viewpoint => Color::hex(0xFF9800),
        Restaurant => Color::hex(0xF44336),
        Cafe => Color::hex(0x795548),
        Bar => Color::hex(0xE91E63),
        Monument => Color::hex(0x607D8B),
        Historical => Color::hex(0x3F51B5),
        _ => DEFAULT_POI_COLOR,
    }
}

/// Indices past the palette reuse its last entry.
pub fn route_color(index: usize) -> Color {
    ROUTE_PALETTE[index.min(ROUTE_PALETTE.len() - 1)]
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RouteStyle {
    pub weight: f64,
    pub opacity: f64,
}

impl RouteStyle {
    pub const SELECTED: Self = Self {
        weight: 6.0,
        opacity: 1.0,
    };
    pub const UNSELECTED: Self = Self {
        weight: 4.0,
        opacity: 0.6,
    };

    pub fn for_selection(is_selected: bool) -> Self {
        if is_selected {
            Self::SELECTED
        } else {
            Self::UNSELECTED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_hex() {
        let c: Color = "#2196f3".parse().unwrap();
        assert_eq!(c, Color::hex(0x2196F3));
        assert_eq!(c.to_string(), "#2196F3");
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["2196F3", "#2196F", "#2196F3FF", "#GG96F3", "red", "", "#"] {
            assert!(bad.parse::<Color>().is_err(), "{bad}");
        }
    }

    #[test]
    fn serde_uses_hex_string() {
        let json = serde_json::to_string(&DESTINATION_COLOR).unwrap();
        assert_eq!(json, "\"#F44336\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DESTINATION_COLOR);
        assert!(serde_json::from_str::<Color>("\"</script>\"").is_err());
    }

    #[test]
    fn categories_map_to_palette() {
        assert_eq!(category_color(PoiCategory::Museum).to_string(), "#9C27B0");
        assert_eq!(category_color(PoiCategory::Cafe).to_string(), "#795548");
        assert_eq!(category_color(PoiCategory::Beach), DEFAULT_POI_COLOR);
        assert_eq!(category_color(PoiCategory::Other), DEFAULT_POI_COLOR);
    }

    #[test]
    fn route_colors_are_positional() {
        assert_eq!(route_color(0).to_string(), "#2196F3");
        assert_eq!(route_color(1).to_string(), "#9C27B0");
        assert_eq!(route_color(2).to_string(), "#FF9800");
        assert_eq!(route_color(7), route_color(2));
    }

    #[test]
    fn selected_route_is_heavier() {
        assert_eq!(RouteStyle::for_selection(true), RouteStyle::SELECTED);
        assert!(RouteStyle::SELECTED.weight > RouteStyle::UNSELECTED.weight);
        assert_eq!(RouteStyle::UNSELECTED.opacity, 0.6);
    }
}
