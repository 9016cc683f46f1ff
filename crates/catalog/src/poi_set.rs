use std::collections::HashMap;
use std::sync::Arc;

use crate::poi::Poi;

/// The active, de-duplicated set of POIs for the current viewport.
///
/// Order is the order the source returned; a repeated id keeps its first
/// occurrence. The set is replaced wholesale, never merged.
#[derive(Debug, Clone, Default)]
pub struct PoiSet {
    pois: Arc<[Poi]>,
    index: HashMap<String, usize>,
}

impl PoiSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pois(pois: Vec<Poi>) -> Self {
        let mut index = HashMap::with_capacity(pois.len());
        let mut kept = Vec::with_capacity(pois.len());
        for poi in pois {
            if index.contains_key(&poi.id) {
                continue;
            }
            index.insert(poi.id.clone(), kept.len());
            kept.push(poi);
        }
        Self {
            pois: kept.into(),
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.pois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Poi> {
        self.index.get(id).map(|&i| &self.pois[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Poi> + '_ {
        self.pois.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::PoiSet;
    use crate::poi::{Poi, PoiCategory};
    use foundation::Coordinates;

    fn poi(id: &str, name: &str) -> Poi {
        Poi::new(
            id,
            name,
            Coordinates::new(52.5, 13.4).unwrap(),
            PoiCategory::Cafe,
        )
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let set = PoiSet::from_pois(vec![poi("a", "first"), poi("b", "b"), poi("a", "second")]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("a").map(|p| p.name.as_str()), Some("first"));
        let ids: Vec<&str> = set.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn lookup_of_missing_id_is_none() {
        let set = PoiSet::from_pois(vec![poi("a", "a")]);
        assert!(set.get("zzz").is_none());
        assert!(!PoiSet::new().contains("a"));
        assert!(PoiSet::new().is_empty());
    }
}
