use std::collections::{BTreeMap, HashSet};

use catalog::PoiSet;
use serde::{Deserialize, Serialize};

use crate::symbology::{Color, category_color};

/// Marker payload understood by the map surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub color: Color,
}

/// Projects the active POI set onto category-colored markers.
pub fn project_pois(pois: &PoiSet) -> Vec<MarkerSpec> {
    pois.iter()
        .map(|poi| MarkerSpec {
            id: poi.id.clone(),
            lat: poi.coordinates.latitude,
            lng: poi.coordinates.longitude,
            color: category_color(poi.category),
        })
        .collect()
}

/// Changes applied by one `MarkerLayer::apply`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MarkerDiff {
    pub removed: Vec<String>,
    pub added: Vec<MarkerSpec>,
}

impl MarkerDiff {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Marker layer keyed by id.
///
/// Updating with a new list removes markers whose id is gone and adds only
/// unseen ids. A marker already on the layer keeps its original position and
/// color even if the new list carries different values for its id.
#[derive(Debug, Default, Clone)]
pub struct MarkerLayer {
    markers: BTreeMap<String, MarkerSpec>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, desired: &[MarkerSpec]) -> MarkerDiff {
        let wanted: HashSet<&str> = desired.iter().map(|m| m.id.as_str()).collect();

        let mut diff = MarkerDiff::default();
        self.markers.retain(|id, _| {
            let keep = wanted.contains(id.as_str());
            if !keep {
                diff.removed.push(id.clone());
            }
            keep
        });

        for marker in desired {
            if !self.markers.contains_key(&marker.id) {
                self.markers.insert(marker.id.clone(), marker.clone());
                diff.added.push(marker.clone());
            }
        }
        diff
    }

    /// Removes every marker and returns their ids.
    pub fn clear(&mut self) -> Vec<String> {
        std::mem::take(&mut self.markers).into_keys().collect()
    }

    pub fn get(&self, id: &str) -> Option<&MarkerSpec> {
        self.markers.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.markers.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.markers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
