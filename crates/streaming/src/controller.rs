use std::sync::Arc;

use catalog::{Poi, PoiCategory, PoiSet};
use foundation::{AreaKey, BoundingBox, Viewport};
use runtime::Token;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::context::{Activity, SyncContext};
use crate::source::{BboxQuery, ImportRequest, PoiSource};

/// Why the active set was cleared without a query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClearReason {
    NoCategories,
    ZoomedOut,
}

/// What happened to the one-time area import during a sync.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImportAttempt {
    /// The viewport query returned results.
    NotNeeded,
    /// The area cell already had its import.
    AlreadyAttempted,
    Imported { count: u64 },
    Failed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Cleared(ClearReason),
    Applied { count: usize, import: ImportAttempt },
    /// A newer sync started first; this result was discarded.
    Stale,
    /// The viewport query failed; the active set is unchanged.
    Failed,
}

/// Decides, per viewport, whether to fetch, skip or backfill, and applies
/// only the most recent result.
pub struct ViewportFetchController {
    source: Arc<dyn PoiSource>,
    context: Arc<SyncContext>,
    config: SyncConfig,
}

impl ViewportFetchController {
    pub fn new(source: Arc<dyn PoiSource>, context: Arc<SyncContext>, config: SyncConfig) -> Self {
        Self {
            source,
            context,
            config,
        }
    }

    pub fn context(&self) -> &Arc<SyncContext> {
        &self.context
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub async fn sync(&self, viewport: &Viewport, categories: &[PoiCategory]) -> SyncOutcome {
        self.sync_viewport(viewport.bounds, categories, viewport.zoom)
            .await
    }

    pub async fn sync_viewport(
        &self,
        bounds: BoundingBox,
        categories: &[PoiCategory],
        zoom: f64,
    ) -> SyncOutcome {
        // Every call supersedes older ones, including calls that only clear.
        let token = self.context.generation().advance();
        self.context.with_metrics(|m| m.inc("sync.requests"));

        if categories.is_empty() {
            debug!("no categories selected; clearing POIs");
            return self.clear(token, ClearReason::NoCategories);
        }
        if !zoom.is_finite() || zoom < self.config.min_zoom_for_pois {
            debug!(zoom, min = self.config.min_zoom_for_pois, "zoomed out; clearing POIs");
            return self.clear(token, ClearReason::ZoomedOut);
        }

        let _loading = self.context.begin(Activity::Loading);
        let query = BboxQuery {
            bounds,
            categories: categories.to_vec(),
            limit: self.config.result_limit,
        };

        let pois = match self.fetch(&query).await {
            Ok(pois) => pois,
            Err(err) => {
                warn!(error = %err, "POI query failed");
                self.context.with_metrics(|m| m.inc("sync.fetch_failures"));
                if !self.context.generation().is_current(token) {
                    return self.discarded(token);
                }
                self.context
                    .notify("fetch_failed", format!("Could not load places: {err}"));
                return SyncOutcome::Failed;
            }
        };

        if !pois.is_empty() {
            return self.apply(token, pois, ImportAttempt::NotNeeded);
        }

        let (import, pois) = self.backfill(&query).await;
        self.apply(token, pois, import)
    }

    /// Clears the active set at once, superseding any in-flight sync.
    pub fn clear_now(&self, reason: ClearReason) -> SyncOutcome {
        let token = self.context.generation().advance();
        self.clear(token, reason)
    }

    async fn fetch(&self, query: &BboxQuery) -> Result<Vec<Poi>, crate::source::SourceError> {
        self.context.with_metrics(|m| m.inc("sync.fetches"));
        self.source.fetch_by_bbox(query.clone()).await
    }

    /// One import per area cell per session, then a single re-query.
    async fn backfill(&self, query: &BboxQuery) -> (ImportAttempt, Vec<Poi>) {
        let center = query.bounds.center();
        let key = AreaKey::with_resolution(center, self.config.area_cells_per_degree);

        // Marked before the call so failures and concurrent syncs never retry it.
        if !self.context.try_mark_attempted(key) {
            debug!(area = %key, "import already attempted for area");
            return (ImportAttempt::AlreadyAttempted, Vec::new());
        }

        let radius_m = self.config.import_radius_m(&query.bounds);
        info!(area = %key, radius_m, "no POIs in viewport; importing area");
        let _importing = self.context.begin(Activity::Importing);
        self.context.with_metrics(|m| m.inc("sync.imports"));

        let request = ImportRequest {
            center,
            radius_m,
            categories: None,
        };
        let summary = match self.source.import_area(request).await {
            Ok(summary) => summary,
            Err(err) => {
                warn!(area = %key, error = %err, "area import failed");
                self.context.with_metrics(|m| m.inc("sync.import_failures"));
                return (ImportAttempt::Failed, Vec::new());
            }
        };
        info!(area = %key, count = summary.count, "area import finished");

        let import = ImportAttempt::Imported {
            count: summary.count,
        };
        match self.fetch(query).await {
            Ok(pois) => (import, pois),
            Err(err) => {
                warn!(area = %key, error = %err, "re-query after import failed");
                (import, Vec::new())
            }
        }
    }

    fn clear(&self, token: Token, reason: ClearReason) -> SyncOutcome {
        if self.context.replace_pois(token, PoiSet::new()) {
            SyncOutcome::Cleared(reason)
        } else {
            self.discarded(token)
        }
    }

    fn apply(&self, token: Token, pois: Vec<Poi>, import: ImportAttempt) -> SyncOutcome {
        let set = PoiSet::from_pois(pois);
        let count = set.len();
        if !self.context.replace_pois(token, set) {
            return self.discarded(token);
        }
        self.context
            .with_metrics(|m| m.record_histogram("sync.result_size", count as i64));
        debug!(count, "applied POI set");
        SyncOutcome::Applied { count, import }
    }

    fn discarded(&self, token: Token) -> SyncOutcome {
        self.context.with_metrics(|m| m.inc("sync.stale_discards"));
        debug!(token = token.value(), "discarding superseded sync result");
        SyncOutcome::Stale
    }
}
