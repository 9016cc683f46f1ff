use serde::{Deserialize, Serialize};

use foundation::Coordinates;

/// Closed set of POI categories. Unknown wire values decode as `Other`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiCategory {
    Museum,
    Gallery,
    Theater,
    Monument,
    Historical,
    Architecture,
    Park,
    Garden,
    Viewpoint,
    Beach,
    Lake,
    Waterfall,
    Mountain,
    Forest,
    Restaurant,
    Cafe,
    Bar,
    Bakery,
    StreetFood,
    Entertainment,
    Cinema,
    AmusementPark,
    Zoo,
    Aquarium,
    HikingTrail,
    Cycling,
    WaterSports,
    Climbing,
    Market,
    Shopping,
    Souvenir,
    Religious,
    Cemetery,
    #[serde(other)]
    Other,
}

/// Categories requested from the import source when the caller names none.
pub const DEFAULT_IMPORT_CATEGORIES: [PoiCategory; 10] = [
    PoiCategory::Museum,
    PoiCategory::Restaurant,
    PoiCategory::Cafe,
    PoiCategory::Park,
    PoiCategory::Viewpoint,
    PoiCategory::Historical,
    PoiCategory::Monument,
    PoiCategory::Gallery,
    PoiCategory::Bar,
    PoiCategory::Garden,
];

impl PoiCategory {
    pub const ALL: [PoiCategory; 34] = [
        PoiCategory::Museum,
        PoiCategory::Gallery,
        PoiCategory::Theater,
        PoiCategory::Monument,
        PoiCategory::Historical,
        PoiCategory::Architecture,
        PoiCategory::Park,
        PoiCategory::Garden,
        PoiCategory::Viewpoint,
        PoiCategory::Beach,
        PoiCategory::Lake,
        PoiCategory::Waterfall,
        PoiCategory::Mountain,
        PoiCategory::Forest,
        PoiCategory::Restaurant,
        PoiCategory::Cafe,
        PoiCategory::Bar,
        PoiCategory::Bakery,
        PoiCategory::StreetFood,
        PoiCategory::Entertainment,
        PoiCategory::Cinema,
        PoiCategory::AmusementPark,
        PoiCategory::Zoo,
        PoiCategory::Aquarium,
        PoiCategory::HikingTrail,
        PoiCategory::Cycling,
        PoiCategory::WaterSports,
        PoiCategory::Climbing,
        PoiCategory::Market,
        PoiCategory::Shopping,
        PoiCategory::Souvenir,
        PoiCategory::Religious,
        PoiCategory::Cemetery,
        PoiCategory::Other,
    ];

    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            PoiCategory::Museum => "museum",
            PoiCategory::Gallery => "gallery",
            PoiCategory::Theater => "theater",
            PoiCategory::Monument => "monument",
            PoiCategory::Historical => "historical",
            PoiCategory::Architecture => "architecture",
            PoiCategory::Park => "park",
            PoiCategory::Garden => "garden",
            PoiCategory::Viewpoint => "viewpoint",
            PoiCategory::Beach => "beach",
            PoiCategory::Lake => "lake",
            PoiCategory::Waterfall => "waterfall",
            PoiCategory::Mountain => "mountain",
            PoiCategory::Forest => "forest",
            PoiCategory::Restaurant => "restaurant",
            PoiCategory::Cafe => "cafe",
            PoiCategory::Bar => "bar",
            PoiCategory::Bakery => "bakery",
            PoiCategory::StreetFood => "street_food",
            PoiCategory::Entertainment => "entertainment",
            PoiCategory::Cinema => "cinema",
            PoiCategory::AmusementPark => "amusement_park",
            PoiCategory::Zoo => "zoo",
            PoiCategory::Aquarium => "aquarium",
            PoiCategory::HikingTrail => "hiking_trail",
            PoiCategory::Cycling => "cycling",
            PoiCategory::WaterSports => "water_sports",
            PoiCategory::Climbing => "climbing",
            PoiCategory::Market => "market",
            PoiCategory::Shopping => "shopping",
            PoiCategory::Souvenir => "souvenir",
            PoiCategory::Religious => "religious",
            PoiCategory::Cemetery => "cemetery",
            PoiCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl std::fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown POI category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl std::str::FromStr for PoiCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        PoiCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownCategory(needle.to_string()))
    }
}

/// Comma-joined wire form used by the bbox query (`museum,cafe`).
pub fn join_categories(categories: &[PoiCategory]) -> String {
    categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Where a POI record originally came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiOrigin {
    Osm,
    Wikidata,
    Foursquare,
    Google,
    User,
}

/// A point of interest. Immutable once fetched; identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poi {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub coordinates: Coordinates,
    pub category: PoiCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    /// Opaque pass-through; this client never interprets opening hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PoiOrigin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Poi {
    /// Minimal record; every optional field empty.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        coordinates: Coordinates,
        category: PoiCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            coordinates,
            category,
            subcategory: None,
            rating: None,
            rating_count: None,
            photos: Vec::new(),
            opening_hours: None,
            website: None,
            phone: None,
            address: None,
            source: None,
            source_id: None,
            tags: Vec::new(),
        }
    }
}

/// Response of the import endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
