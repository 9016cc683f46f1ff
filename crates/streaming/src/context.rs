use std::sync::atomic::{AtomicUsize, Ordering};

use catalog::PoiSet;
use foundation::AreaKey;
use parking_lot::Mutex;
use runtime::{Generation, Metrics, MetricsSnapshot, Notice, NoticeBoard, Token};
use tokio::sync::watch;

use crate::area_memo::AreaMemo;

/// Coarse activity indicator for the UI (spinner, "importing" banner).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Loading,
    Importing,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Activity {
    Loading,
    Importing,
}

/// Session state owned by the sync engine and shared by handle.
///
/// Holds the active POI set, the imported-area memo, the recency counter,
/// pending user notices and metrics. Nothing here is global.
#[derive(Debug)]
pub struct SyncContext {
    generation: Generation,
    memo: Mutex<AreaMemo>,
    notices: Mutex<NoticeBoard>,
    metrics: Mutex<Metrics>,
    pois: watch::Sender<PoiSet>,
    status: watch::Sender<SyncStatus>,
    loading: AtomicUsize,
    importing: AtomicUsize,
}

impl Default for SyncContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncContext {
    pub fn new() -> Self {
        let (pois, _) = watch::channel(PoiSet::new());
        let (status, _) = watch::channel(SyncStatus::Idle);
        Self {
            generation: Generation::new(),
            memo: Mutex::new(AreaMemo::new()),
            notices: Mutex::new(NoticeBoard::new()),
            metrics: Mutex::new(Metrics::new()),
            pois,
            status,
            loading: AtomicUsize::new(0),
            importing: AtomicUsize::new(0),
        }
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// Snapshot of the active POI set.
    pub fn pois(&self) -> PoiSet {
        self.pois.borrow().clone()
    }

    /// Notified whenever the active POI set is replaced.
    pub fn subscribe_pois(&self) -> watch::Receiver<PoiSet> {
        self.pois.subscribe()
    }

    pub fn status(&self) -> SyncStatus {
        *self.status.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    pub fn has_attempted(&self, key: &AreaKey) -> bool {
        self.memo.lock().has_attempted(key)
    }

    /// Check-and-mark in one step. Returns `true` only for the first caller.
    pub fn try_mark_attempted(&self, key: AreaKey) -> bool {
        self.memo.lock().mark_attempted(key)
    }

    pub fn attempted_areas(&self) -> usize {
        self.memo.lock().len()
    }

    /// Replaces the POI set if `token` is still the latest generation.
    ///
    /// The recency check runs under the channel's write lock, so a newer call
    /// that applies afterwards always wins.
    pub fn replace_pois(&self, token: Token, set: PoiSet) -> bool {
        self.pois.send_if_modified(|current| {
            if !self.generation.is_current(token) {
                return false;
            }
            *current = set;
            true
        })
    }

    pub fn notify(&self, kind: &'static str, message: impl Into<String>) {
        self.notices.lock().emit(kind, message);
    }

    pub fn drain_notices(&self) -> Vec<Notice> {
        self.notices.lock().drain()
    }

    pub fn with_metrics<R>(&self, f: impl FnOnce(&mut Metrics) -> R) -> R {
        f(&mut self.metrics.lock())
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.lock().snapshot()
    }

    pub(crate) fn begin(&self, activity: Activity) -> ActivityGuard<'_> {
        self.update_status(|| {
            self.counter(activity).fetch_add(1, Ordering::SeqCst);
        });
        ActivityGuard {
            context: self,
            activity,
        }
    }

    fn counter(&self, activity: Activity) -> &AtomicUsize {
        match activity {
            Activity::Loading => &self.loading,
            Activity::Importing => &self.importing,
        }
    }

    /// Applies a counter change and republishes the status under the
    /// channel's write lock, so concurrent guards cannot publish out of order.
    fn update_status(&self, change: impl FnOnce()) {
        self.status.send_if_modified(|s| {
            change();
            let next = if self.importing.load(Ordering::SeqCst) > 0 {
                SyncStatus::Importing
            } else if self.loading.load(Ordering::SeqCst) > 0 {
                SyncStatus::Loading
            } else {
                SyncStatus::Idle
            };
            let changed = *s != next;
            *s = next;
            changed
        });
    }
}

/// Keeps an activity counted while alive, including across cancellation.
pub(crate) struct ActivityGuard<'a> {
    context: &'a SyncContext,
    activity: Activity,
}

impl Drop for ActivityGuard<'_> {
    fn drop(&mut self) {
        let context = self.context;
        let activity = self.activity;
        context.update_status(|| {
            context.counter(activity).fetch_sub(1, Ordering::SeqCst);
        });
    }
}
