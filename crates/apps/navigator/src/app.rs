//! Host application: wires surface events and host actions to the sync
//! engine, route selection and the bridge.

use std::sync::Arc;

use bridge::{MapBridge, NAVIGATION_ZOOM, SurfaceCommand, SurfaceEvent, Transport};
use catalog::{CreateRouteRequest, CreateRouteResponse, Poi, PoiCategory, PoiSet, RouteSettings};
use foundation::{Coordinates, Viewport};
use layers::{RouteSelection, project_pois};
use runtime::{Generation, Notice, Token};
use streaming::{
    ClearReason, FilterAction, MoveDebouncer, PoiSource, RouteSource, SourceError, SyncContext,
    SyncOutcome, ViewportFetchController,
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::action::{HostAction, HostInput};
use crate::config::NavigatorConfig;
use crate::format::{format_distance, format_duration};

/// Zoom used when centering on the user.
pub const USER_ZOOM: f64 = 16.0;

/// Backend collaborators.
#[derive(Clone)]
pub struct Services {
    pub pois: Arc<dyn PoiSource>,
    pub routes: Arc<dyn RouteSource>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UserFix {
    pub position: Coordinates,
    pub heading: Option<f64>,
}

enum Report {
    Synced(SyncOutcome),
    Route {
        token: Token,
        result: Result<CreateRouteResponse, SourceError>,
    },
}

pub struct Navigator<T> {
    controller: Arc<ViewportFetchController>,
    route_source: Arc<dyn RouteSource>,
    bridge: MapBridge<T>,
    moves: MoveDebouncer,
    settled: mpsc::UnboundedReceiver<Viewport>,
    pois: watch::Receiver<PoiSet>,
    reports_tx: mpsc::UnboundedSender<Report>,
    reports: mpsc::UnboundedReceiver<Report>,
    in_flight: usize,
    categories: Vec<PoiCategory>,
    selected_poi: Option<Poi>,
    user: Option<UserFix>,
    routes: RouteSelection,
    route_requests: Generation,
    navigating: bool,
    bearing: f64,
}

impl<T: Transport> Navigator<T> {
    /// Must be called from within a tokio runtime.
    pub fn new(services: Services, config: &NavigatorConfig, transport: T) -> Self {
        let context = Arc::new(SyncContext::new());
        let pois = context.subscribe_pois();
        let controller = Arc::new(ViewportFetchController::new(
            services.pois,
            context,
            config.sync.clone(),
        ));
        let (moves, settled) = MoveDebouncer::new(&config.sync);
        let (reports_tx, reports) = mpsc::unbounded_channel();
        Self {
            controller,
            route_source: services.routes,
            bridge: MapBridge::new(transport),
            moves,
            settled,
            pois,
            reports_tx,
            reports,
            in_flight: 0,
            categories: config.categories.clone(),
            selected_poi: None,
            user: None,
            routes: RouteSelection::new(),
            route_requests: Generation::new(),
            navigating: false,
            bearing: 0.0,
        }
    }

    pub fn context(&self) -> &Arc<SyncContext> {
        self.controller.context()
    }

    pub fn bridge(&self) -> &MapBridge<T> {
        &self.bridge
    }

    pub fn categories(&self) -> &[PoiCategory] {
        &self.categories
    }

    pub fn selected_poi(&self) -> Option<&Poi> {
        self.selected_poi.as_ref()
    }

    pub fn routes(&self) -> &RouteSelection {
        &self.routes
    }

    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    pub fn is_navigating(&self) -> bool {
        self.navigating
    }

    /// Reads host lines until the channel closes, then finishes pending work.
    pub async fn run(mut self, mut lines: mpsc::Receiver<String>) -> Self {
        let mut status = self.context().subscribe_status();
        loop {
            tokio::select! {
                line = lines.recv() => match line {
                    Some(line) => self.handle_line(&line),
                    None => break,
                },
                Some(viewport) = self.settled.recv() => self.spawn_sync(viewport),
                Some(report) = self.reports.recv() => self.on_report(report),
                Ok(()) = status.changed() => {
                    let current = *status.borrow_and_update();
                    debug!(status = ?current, "sync status");
                }
            }
            self.log_notices();
        }
        self.drain().await;
        self.log_notices();
        info!(metrics = %self.context().metrics_snapshot(), "session finished");
        self
    }

    /// Processes settled moves and task reports until nothing is outstanding.
    pub async fn drain(&mut self) {
        while self.is_busy() {
            tokio::select! {
                Some(viewport) = self.settled.recv() => self.spawn_sync(viewport),
                Some(report) = self.reports.recv() => self.on_report(report),
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.in_flight > 0 || self.moves.is_pending() || !self.settled.is_empty()
    }

    pub fn handle_line(&mut self, line: &str) {
        match HostInput::classify(line) {
            Ok(HostInput::Action(action)) => self.handle_action(action),
            Ok(HostInput::Surface(text)) => {
                if let Some(event) = self.bridge.receive(&text) {
                    self.handle_event(event);
                }
            }
            Err(err) => warn!(error = %err, "dropping host action"),
        }
    }

    pub fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Ready { bounds } => {
                if let Some(viewport) = self.moves.mark_ready(bounds) {
                    self.spawn_sync(viewport);
                }
            }
            SurfaceEvent::ViewportChanged {
                center,
                zoom,
                bounds,
            } => self.moves.on_move(center, zoom, bounds),
            SurfaceEvent::MarkerTapped { id } => match self.context().pois().get(&id) {
                Some(poi) => {
                    info!(poi = %poi.id, name = %poi.name, "POI selected");
                    self.selected_poi = Some(poi.clone());
                }
                None => debug!(poi = %id, "tap on POI no longer shown"),
            },
            SurfaceEvent::RouteTapped { id } => self.select_route(&id),
            SurfaceEvent::BearingChanged { bearing } => self.bearing = bearing,
        }
    }

    pub fn handle_action(&mut self, action: HostAction) {
        match action {
            HostAction::SetCategories { categories } => self.set_categories(categories),
            HostAction::ToggleCategory { category } => {
                let mut categories = self.categories.clone();
                if let Some(i) = categories.iter().position(|c| *c == category) {
                    categories.remove(i);
                } else {
                    categories.push(category);
                }
                self.set_categories(categories);
            }
            HostAction::SelectAllCategories => self.set_categories(PoiCategory::ALL.to_vec()),
            HostAction::ClearCategories => self.set_categories(Vec::new()),
            HostAction::SetUserLocation {
                latitude,
                longitude,
                heading,
            } => match Coordinates::new(latitude, longitude) {
                Ok(position) => self.set_user_location(UserFix { position, heading }),
                Err(err) => warn!(error = %err, "ignoring invalid user location"),
            },
            HostAction::CenterOnUser => match self.user {
                Some(fix) => self.send(SurfaceCommand::SetCenter {
                    center: fix.position,
                    zoom: Some(USER_ZOOM),
                }),
                None => debug!("no user location to center on"),
            },
            HostAction::Navigate => self.navigate(),
            HostAction::SelectRoute { id } => self.select_route(&id),
            HostAction::CancelNavigation => {
                self.route_requests.advance();
                self.routes.clear();
                self.send(SurfaceCommand::ClearRoutes);
            }
            HostAction::SetNavigationMode { enabled } => self.set_navigation_mode(enabled),
            HostAction::ResetBearing => {
                self.bearing = 0.0;
                self.send(SurfaceCommand::SetBearing { bearing: 0.0 });
            }
        }
    }

    fn set_categories(&mut self, categories: Vec<PoiCategory>) {
        self.categories = categories;
        match self.moves.on_filter_change(&self.categories) {
            FilterAction::ClearNow => {
                self.controller.clear_now(ClearReason::NoCategories);
                self.refresh_markers();
            }
            FilterAction::SyncNow(viewport) => self.spawn_sync(viewport),
            FilterAction::Ignore => debug!("filter changed before the map was ready"),
        }
    }

    fn set_user_location(&mut self, fix: UserFix) {
        self.user = Some(fix);
        self.send(SurfaceCommand::UpdateUserLocation {
            position: fix.position,
            heading: fix.heading,
        });
        if self.navigating {
            self.follow_user(fix);
        }
    }

    fn set_navigation_mode(&mut self, enabled: bool) {
        self.navigating = enabled;
        self.send(SurfaceCommand::SetNavigationMode { enabled });
        match (enabled, self.user) {
            (true, Some(fix)) => self.follow_user(fix),
            (false, _) => {
                self.bearing = 0.0;
                self.send(SurfaceCommand::SetBearing { bearing: 0.0 });
            }
            (true, None) => debug!("navigation mode without a location fix"),
        }
    }

    fn follow_user(&mut self, fix: UserFix) {
        let heading = fix.heading.unwrap_or(self.bearing);
        self.bearing = heading;
        self.send(SurfaceCommand::SetNavigationView {
            position: fix.position,
            heading,
            zoom: Some(NAVIGATION_ZOOM),
        });
    }

    fn navigate(&mut self) {
        let (Some(poi), Some(fix)) = (&self.selected_poi, self.user) else {
            debug!("navigate needs a selected POI and a location fix");
            return;
        };
        info!(poi = %poi.id, "requesting route");
        let request = CreateRouteRequest {
            origin: fix.position,
            destination: poi.coordinates,
            settings: RouteSettings::walking(),
        };
        let token = self.route_requests.advance();
        let source = self.route_source.clone();
        let tx = self.reports_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = source.create_route(request).await;
            let _ = tx.send(Report::Route { token, result });
        });
    }

    fn select_route(&mut self, id: &str) {
        let already = self.routes.selected_id() == Some(id);
        if !already && !self.routes.select(id) {
            return;
        }
        if !already {
            self.push_routes();
        }
        self.fit_selected_route();
    }

    fn spawn_sync(&mut self, viewport: Viewport) {
        let controller = self.controller.clone();
        let categories = self.categories.clone();
        let tx = self.reports_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let outcome = controller.sync(&viewport, &categories).await;
            let _ = tx.send(Report::Synced(outcome));
        });
    }

    fn on_report(&mut self, report: Report) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match report {
            Report::Synced(outcome) => {
                debug!(?outcome, "sync finished");
                self.refresh_markers();
            }
            Report::Route { token, result } => {
                if !self.route_requests.is_current(token) {
                    debug!("discarding superseded route response");
                    return;
                }
                match result {
                    Ok(response) => self.show_routes(response),
                    Err(err) => {
                        warn!(error = %err, "route request failed");
                        self.context().notify(
                            "route_failed",
                            "Failed to create route. Please try again.",
                        );
                    }
                }
            }
        }
    }

    fn show_routes(&mut self, response: CreateRouteResponse) {
        let CreateRouteResponse {
            route,
            alternative_routes,
            ..
        } = response;
        info!(
            route = %route.id,
            distance = %format_distance(route.distance),
            duration = %format_duration(route.duration),
            alternatives = alternative_routes.len(),
            "route ready"
        );
        self.routes.set_routes(route, alternative_routes);
        self.selected_poi = None;
        self.push_routes();
        self.fit_selected_route();
    }

    fn push_routes(&mut self) {
        if self.routes.is_empty() {
            self.send(SurfaceCommand::ClearRoutes);
        } else {
            self.send(SurfaceCommand::UpdateRoutes(self.routes.overlays()));
        }
    }

    fn fit_selected_route(&mut self) {
        let Some(route) = self.routes.selected() else {
            return;
        };
        if route.geometry.coordinates.is_empty() {
            return;
        }
        let coordinates = route.geometry.coordinates.clone();
        self.send(SurfaceCommand::FitBounds(coordinates));
    }

    /// Pushes markers if the active POI set changed since the last push.
    fn refresh_markers(&mut self) {
        if !self.pois.has_changed().unwrap_or(false) {
            return;
        }
        let markers = project_pois(&self.pois.borrow_and_update());
        self.send(SurfaceCommand::UpdateMarkers(markers));
    }

    fn send(&mut self, command: SurfaceCommand) {
        let function = command.function();
        if let Err(err) = self.bridge.send(command) {
            warn!(function, error = %err, "refusing to send surface command");
        }
    }

    /// One-shot user notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.context().drain_notices()
    }

    fn log_notices(&mut self) {
        for notice in self.take_notices() {
            warn!(kind = notice.kind, "{}", notice.message);
        }
    }

    /// Last viewport known to the debouncer, if any.
    pub fn viewport(&self) -> Option<&Viewport> {
        self.moves.last_viewport()
    }
}
