//! Scripted collaborators for engine tests.

use std::collections::VecDeque;
use std::time::Duration;

use catalog::{ImportSummary, Poi, PoiCategory};
use foundation::Coordinates;
use parking_lot::Mutex;

use crate::source::{BboxQuery, BoxFuture, ImportRequest, PoiSource, SourceError};

type Scripted<T> = (Duration, Result<T, &'static str>);

/// Answers calls from a queue, in call order, after an optional delay.
///
/// An exhausted queue answers with an empty result.
#[derive(Default)]
pub(crate) struct FakeSource {
    fetch_script: Mutex<VecDeque<Scripted<Vec<Poi>>>>,
    import_script: Mutex<VecDeque<Scripted<u64>>>,
    fetches: Mutex<Vec<BboxQuery>>,
    imports: Mutex<Vec<ImportRequest>>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_fetch(&self, result: Result<Vec<Poi>, &'static str>) {
        self.push_fetch_delayed(Duration::ZERO, result);
    }

    pub(crate) fn push_fetch_delayed(
        &self,
        delay: Duration,
        result: Result<Vec<Poi>, &'static str>,
    ) {
        self.fetch_script.lock().push_back((delay, result));
    }

    pub(crate) fn push_import(&self, result: Result<u64, &'static str>) {
        self.push_import_delayed(Duration::ZERO, result);
    }

    pub(crate) fn push_import_delayed(&self, delay: Duration, result: Result<u64, &'static str>) {
        self.import_script.lock().push_back((delay, result));
    }

    pub(crate) fn fetches(&self) -> Vec<BboxQuery> {
        self.fetches.lock().clone()
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.lock().len()
    }

    pub(crate) fn imports(&self) -> Vec<ImportRequest> {
        self.imports.lock().clone()
    }

    pub(crate) fn import_count(&self) -> usize {
        self.imports.lock().len()
    }
}

async fn answer<T>(delay: Duration, result: Result<T, &'static str>) -> Result<T, SourceError> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    result.map_err(SourceError::new)
}

impl PoiSource for FakeSource {
    fn fetch_by_bbox(&self, query: BboxQuery) -> BoxFuture<'_, Result<Vec<Poi>, SourceError>> {
        self.fetches.lock().push(query);
        let (delay, result) = self
            .fetch_script
            .lock()
            .pop_front()
            .unwrap_or((Duration::ZERO, Ok(Vec::new())));
        Box::pin(answer(delay, result))
    }

    fn import_area(
        &self,
        request: ImportRequest,
    ) -> BoxFuture<'_, Result<ImportSummary, SourceError>> {
        self.imports.lock().push(request);
        let (delay, result) = self
            .import_script
            .lock()
            .pop_front()
            .unwrap_or((Duration::ZERO, Ok(0)));
        Box::pin(async move {
            let count = answer(delay, result).await?;
            Ok(ImportSummary {
                count,
                message: None,
            })
        })
    }
}

pub(crate) fn poi(id: &str) -> Poi {
    Poi::new(
        id,
        format!("Place {id}"),
        Coordinates::new(52.52, 13.405).unwrap(),
        PoiCategory::Museum,
    )
}

pub(crate) fn pois(ids: &[&str]) -> Vec<Poi> {
    ids.iter().map(|id| poi(id)).collect()
}
