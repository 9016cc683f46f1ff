//! Turns the raw stream of surface moves into debounced sync requests.
//!
//! Pre-ready moves are remembered but never scheduled; the first `ready`
//! promotes the remembered viewport (or the reported bounds) to an
//! immediate sync.

use catalog::PoiCategory;
use foundation::{BoundingBox, Coordinates, Viewport};
use runtime::Debouncer;
use tokio::sync::mpsc;

use crate::config::SyncConfig;

/// What the caller should do after a category filter change.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    /// The filter is empty; clear markers without waiting.
    ClearNow,
    /// Re-sync the last known viewport right away.
    SyncNow(Viewport),
    /// Nothing known yet to sync against.
    Ignore,
}

#[derive(Debug)]
pub struct MoveDebouncer {
    debouncer: Debouncer<Viewport>,
    last: Option<Viewport>,
    ready: bool,
    initial_zoom: f64,
}

impl MoveDebouncer {
    /// Settled viewports arrive on the returned receiver.
    pub fn new(config: &SyncConfig) -> (Self, mpsc::UnboundedReceiver<Viewport>) {
        let (debouncer, rx) = Debouncer::new(config.debounce());
        (
            Self {
                debouncer,
                last: None,
                ready: false,
                initial_zoom: config.initial_zoom,
            },
            rx,
        )
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn last_viewport(&self) -> Option<&Viewport> {
        self.last.as_ref()
    }

    pub fn on_move(&mut self, center: Coordinates, zoom: f64, bounds: BoundingBox) {
        let viewport = Viewport::new(center, zoom, bounds);
        self.last = Some(viewport);
        if self.ready {
            self.debouncer.push(viewport);
        }
    }

    /// Handles the surface handshake. Returns the viewport to sync at once.
    ///
    /// A move seen before `ready` wins over the handshake bounds.
    pub fn mark_ready(&mut self, bounds: Option<BoundingBox>) -> Option<Viewport> {
        self.ready = true;
        if self.last.is_none() {
            self.last = bounds.map(|b| Viewport::from_bounds(b, self.initial_zoom));
        }
        self.replay_target()
    }

    /// The viewport to re-sync after a reconnect or filter change.
    pub fn replay_target(&self) -> Option<Viewport> {
        if self.ready { self.last } else { None }
    }

    pub fn on_filter_change(&mut self, categories: &[PoiCategory]) -> FilterAction {
        if categories.is_empty() {
            self.debouncer.cancel();
            return FilterAction::ClearNow;
        }
        match self.replay_target() {
            Some(viewport) => {
                // An immediate sync covers whatever the timer was holding.
                self.debouncer.cancel();
                FilterAction::SyncNow(viewport)
            }
            None => FilterAction::Ignore,
        }
    }

    /// A settle timer is armed and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
