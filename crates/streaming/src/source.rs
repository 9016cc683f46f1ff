//! Collaborator contracts consumed by the sync engine.
//!
//! The REST transport lives outside this crate; anything that can answer a
//! bbox query, import an area and create a route can drive the engine.
//! Methods return boxed futures so the traits stay dyn-compatible.

use std::future::Future;
use std::pin::Pin;

use catalog::{CreateRouteRequest, CreateRouteResponse, ImportSummary, Poi, PoiCategory};
use foundation::{BoundingBox, Coordinates};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error returned by a collaborator call.
#[derive(Debug)]
pub struct SourceError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Bounded, category-filtered POI read.
#[derive(Debug, Clone, PartialEq)]
pub struct BboxQuery {
    pub bounds: BoundingBox,
    pub categories: Vec<PoiCategory>,
    pub limit: usize,
}

/// One-time backfill of an area from the external import source.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRequest {
    pub center: Coordinates,
    pub radius_m: f64,
    /// `None` lets the source use its default category set.
    pub categories: Option<Vec<PoiCategory>>,
}

pub trait PoiSource: Send + Sync {
    /// Read-only and idempotent.
    fn fetch_by_bbox(&self, query: BboxQuery) -> BoxFuture<'_, Result<Vec<Poi>, SourceError>>;

    /// Side-effecting and possibly slow (seconds).
    fn import_area(&self, request: ImportRequest)
    -> BoxFuture<'_, Result<ImportSummary, SourceError>>;
}

pub trait RouteSource: Send + Sync {
    /// One primary route plus zero or more alternates; ids are stable for the session.
    fn create_route(
        &self,
        request: CreateRouteRequest,
    ) -> BoxFuture<'_, Result<CreateRouteResponse, SourceError>>;
}
