//! Primary/alternate route bookkeeping and its display projection.

use catalog::Route;
use tracing::debug;

use crate::routes::RouteOverlay;
use crate::symbology::{Color, route_color};

#[derive(Debug, Clone, PartialEq)]
pub struct RouteDisplay {
    pub route: Route,
    pub color: Color,
    pub is_selected: bool,
}

/// Candidate routes in display order (primary first) and the selected id.
#[derive(Debug, Default, Clone)]
pub struct RouteSelection {
    routes: Vec<Route>,
    selected: Option<String>,
}

impl RouteSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the candidates and selects the primary.
    pub fn set_routes(&mut self, primary: Route, alternates: Vec<Route>) {
        self.selected = Some(primary.id.clone());
        self.routes = std::iter::once(primary).chain(alternates).collect();
    }

    /// Unknown ids leave the selection unchanged. Returns whether it changed.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.routes.iter().any(|r| r.id == id) {
            debug!(route = id, "ignoring selection of unknown route");
            return false;
        }
        if self.selected.as_deref() == Some(id) {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.routes.clear();
        self.selected = None;
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&Route> {
        let id = self.selected.as_deref()?;
        self.routes.iter().find(|r| r.id == id)
    }

    pub fn displays(&self) -> Vec<RouteDisplay> {
        self.routes
            .iter()
            .enumerate()
            .map(|(i, route)| RouteDisplay {
                route: route.clone(),
                color: route_color(i),
                is_selected: self.selected.as_deref() == Some(route.id.as_str()),
            })
            .collect()
    }

    pub fn overlays(&self) -> Vec<RouteOverlay> {
        self.routes
            .iter()
            .enumerate()
            .map(|(i, route)| RouteOverlay {
                id: route.id.clone(),
                coordinates: route.geometry.coordinates.clone(),
                color: route_color(i),
                is_selected: self.selected.as_deref() == Some(route.id.as_str()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn route(id: &str) -> Route {
        Route::new(id, vec![[13.40, 52.52], [13.42, 52.51]], 1_800.0, 1_300.0)
    }

    fn loaded() -> RouteSelection {
        let mut sel = RouteSelection::new();
        sel.set_routes(route("r1"), vec![route("r2"), route("r3"), route("r4")]);
        sel
    }

    #[test]
    fn primary_is_selected_on_load() {
        let sel = loaded();
        assert_eq!(sel.selected_id(), Some("r1"));
        let flags: Vec<bool> = sel.displays().iter().map(|d| d.is_selected).collect();
        assert_eq!(flags, vec![true, false, false, false]);
    }

    #[test]
    fn colors_follow_position_not_selection() {
        let mut sel = loaded();
        sel.select("r3");
        let colors: Vec<String> = sel.displays().iter().map(|d| d.color.to_string()).collect();
        assert_eq!(colors, vec!["#2196F3", "#9C27B0", "#FF9800", "#FF9800"]);
    }

    #[test]
    fn selecting_unknown_id_is_a_no_op() {
        let mut sel = loaded();
        assert!(!sel.select("nope"));
        assert_eq!(sel.selected_id(), Some("r1"));
    }

    #[test]
    fn at_most_one_route_is_selected() {
        let mut sel = loaded();
        assert!(sel.select("r2"));
        assert!(!sel.select("r2"));
        let selected = sel.overlays().iter().filter(|o| o.is_selected).count();
        assert_eq!(selected, 1);
        assert_eq!(sel.selected().map(|r| r.id.as_str()), Some("r2"));
    }

    #[test]
    fn clear_drops_routes_and_selection() {
        let mut sel = loaded();
        sel.clear();
        assert!(sel.is_empty());
        assert_eq!(sel.selected(), None);
        assert!(sel.overlays().is_empty());
    }
}
