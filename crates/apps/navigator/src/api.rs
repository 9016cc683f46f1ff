//! REST client for the POI and routing backend.

use std::time::Duration;

use catalog::{
    CreateRouteRequest, CreateRouteResponse, DEFAULT_IMPORT_CATEGORIES, ImportSummary, Poi,
    PoiCategory, Route, join_categories,
};
use foundation::Coordinates;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use streaming::{BboxQuery, BoxFuture, ImportRequest, PoiSource, RouteSource, SourceError};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize)]
struct ImportBody {
    lat: f64,
    lng: f64,
    radius: f64,
    categories: Vec<PoiCategory>,
}

/// Free-text or proximity search. Unset fields are left to server defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoiSearch {
    pub text: Option<String>,
    pub center: Option<Coordinates>,
    pub radius_m: Option<f64>,
    pub categories: Vec<PoiCategory>,
    pub limit: Option<usize>,
}

impl PoiSearch {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(text) = &self.text {
            params.push(("query", text.clone()));
        }
        if let Some(center) = self.center {
            params.push(("lat", center.latitude.to_string()));
            params.push(("lng", center.longitude.to_string()));
        }
        if let Some(radius) = self.radius_m {
            params.push(("radius", radius.round().to_string()));
        }
        if !self.categories.is_empty() {
            params.push(("categories", join_categories(&self.categories)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// JSON-over-HTTP implementation of the POI and route sources.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::with_source("failed to build HTTP client", e))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `{base}/{collection}/{id}` with `id` escaped as a single path segment.
    fn item_url(&self, collection: &str, id: &str) -> Result<Url, SourceError> {
        let mut url = Url::parse(&self.url(collection))
            .map_err(|e| SourceError::with_source("invalid base URL", e))?;
        url.path_segments_mut()
            .map_err(|()| SourceError::new("base URL cannot take a path"))?
            .push(id);
        Ok(url)
    }

    pub async fn health(&self) -> Result<HealthStatus, SourceError> {
        self.send_json(self.client.get(self.url("/health"))).await
    }

    pub async fn search_pois(&self, search: &PoiSearch) -> Result<Vec<Poi>, SourceError> {
        let request = self
            .client
            .get(self.url("/poi/search"))
            .query(&search.params());
        self.send_json(request).await
    }

    pub async fn nearby_pois(
        &self,
        center: Coordinates,
        radius_m: Option<f64>,
    ) -> Result<Vec<Poi>, SourceError> {
        let search = PoiSearch {
            center: Some(center),
            radius_m,
            ..PoiSearch::default()
        };
        let request = self
            .client
            .get(self.url("/poi/nearby"))
            .query(&search.params());
        self.send_json(request).await
    }

    pub async fn poi(&self, id: &str) -> Result<Poi, SourceError> {
        let url = self.item_url("/poi", id)?;
        self.send_json(self.client.get(url)).await
    }

    pub async fn route(&self, id: &str) -> Result<Route, SourceError> {
        let url = self.item_url("/routes", id)?;
        self.send_json(self.client.get(url)).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SourceError> {
        let resp = request
            .send()
            .await
            .map_err(|e| SourceError::with_source("HTTP request failed", e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::new(format!("HTTP error: {status}")));
        }

        resp.json::<T>()
            .await
            .map_err(|e| SourceError::with_source("failed to decode response", e))
    }
}

impl PoiSource for ApiClient {
    fn fetch_by_bbox(&self, query: BboxQuery) -> BoxFuture<'_, Result<Vec<Poi>, SourceError>> {
        let b = query.bounds;
        let params = [
            ("minLat", b.min_lat.to_string()),
            ("maxLat", b.max_lat.to_string()),
            ("minLng", b.min_lng.to_string()),
            ("maxLng", b.max_lng.to_string()),
            ("categories", join_categories(&query.categories)),
            ("limit", query.limit.to_string()),
        ];
        let request = self.client.get(self.url("/poi/bbox")).query(&params);
        Box::pin(async move {
            let pois: Vec<Poi> = self.send_json(request).await?;
            debug!(count = pois.len(), "bbox query answered");
            Ok(pois)
        })
    }

    fn import_area(&self, request: ImportRequest) -> BoxFuture<'_, Result<ImportSummary, SourceError>> {
        let body = ImportBody {
            lat: request.center.latitude,
            lng: request.center.longitude,
            radius: request.radius_m.round(),
            categories: request
                .categories
                .unwrap_or_else(|| DEFAULT_IMPORT_CATEGORIES.to_vec()),
        };
        let request = self.client.post(self.url("/poi/import")).json(&body);
        Box::pin(self.send_json(request))
    }
}

impl RouteSource for ApiClient {
    fn create_route(
        &self,
        request: CreateRouteRequest,
    ) -> BoxFuture<'_, Result<CreateRouteResponse, SourceError>> {
        let request = self.client.post(self.url("/routes")).json(&request);
        Box::pin(self.send_json(request))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use foundation::{BoundingBox, Coordinates};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;

    /// Last request seen by the test server.
    #[derive(Default)]
    struct Captured {
        query: Mutex<Option<HashMap<String, String>>>,
        body: Mutex<Option<Value>>,
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    fn backend(captured: Arc<Captured>) -> Router {
        Router::new()
            .route("/api/health", get(|| async { Json(json!({"status": "ok"})) }))
            .route(
                "/api/poi/bbox",
                get(
                    |State(c): State<Arc<Captured>>, Query(q): Query<HashMap<String, String>>| async move {
                        *c.query.lock().unwrap() = Some(q);
                        Json(json!([{
                            "id": "p1",
                            "name": "Pergamonmuseum",
                            "coordinates": {"latitude": 52.5212, "longitude": 13.3969},
                            "category": "museum",
                            "rating": 4.7
                        }]))
                    },
                ),
            )
            .route(
                "/api/poi/import",
                post(|State(c): State<Arc<Captured>>, Json(body): Json<Value>| async move {
                    *c.body.lock().unwrap() = Some(body);
                    Json(json!({"message": "Imported", "count": 17}))
                }),
            )
            .route(
                "/api/routes",
                post(|| async { (StatusCode::BAD_GATEWAY, "routing engine down") }),
            )
            .with_state(captured)
    }

    fn lookups(captured: Arc<Captured>) -> Router {
        let museum = |id: &str| {
            json!({
                "id": id,
                "name": "Pergamonmuseum",
                "coordinates": {"latitude": 52.5212, "longitude": 13.3969},
                "category": "museum"
            })
        };
        Router::new()
            .route(
                "/api/poi/search",
                get(
                    move |State(c): State<Arc<Captured>>, Query(q): Query<HashMap<String, String>>| async move {
                        *c.query.lock().unwrap() = Some(q);
                        Json(json!([museum("s1")]))
                    },
                ),
            )
            .route(
                "/api/poi/nearby",
                get(
                    move |State(c): State<Arc<Captured>>, Query(q): Query<HashMap<String, String>>| async move {
                        *c.query.lock().unwrap() = Some(q);
                        Json(json!([museum("n1"), museum("n2")]))
                    },
                ),
            )
            .route(
                "/api/poi/:id",
                get(move |Path(id): Path<String>| async move { Json(museum(&id)) }),
            )
            .route(
                "/api/routes/:id",
                get(|Path(id): Path<String>| async move {
                    if id == "missing" {
                        return Err(StatusCode::NOT_FOUND);
                    }
                    Ok(Json(json!({
                        "id": id,
                        "geometry": {"type": "LineString", "coordinates": [[13.405, 52.52], [13.3969, 52.5212]]},
                        "distance": 1250.0,
                        "duration": 900.0
                    })))
                }),
            )
            .with_state(captured)
    }

    fn client(base: String) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn health_reports_status() {
        let base = serve(backend(Arc::default())).await;
        let status = client(base).health().await.unwrap();
        assert_eq!(status.status, "ok");
    }

    #[tokio::test]
    async fn bbox_query_sends_bounds_categories_and_limit() {
        let captured = Arc::new(Captured::default());
        let base = serve(backend(captured.clone())).await;

        let pois = client(base)
            .fetch_by_bbox(BboxQuery {
                bounds: BoundingBox::new(52.51, 52.53, 13.39, 13.42).unwrap(),
                categories: vec![PoiCategory::Museum, PoiCategory::StreetFood],
                limit: 200,
            })
            .await
            .unwrap();
        assert_eq!(pois.len(), 1);
        assert_eq!(pois[0].category, PoiCategory::Museum);
        assert_eq!(pois[0].rating, Some(4.7));

        let q = captured.query.lock().unwrap().clone().unwrap();
        assert_eq!(q["minLat"], "52.51");
        assert_eq!(q["maxLng"], "13.42");
        assert_eq!(q["categories"], "museum,street_food");
        assert_eq!(q["limit"], "200");
    }

    #[tokio::test]
    async fn import_defaults_categories() {
        let captured = Arc::new(Captured::default());
        let base = serve(backend(captured.clone())).await;

        let summary = client(base)
            .import_area(ImportRequest {
                center: Coordinates::new(52.52, 13.405).unwrap(),
                radius_m: 5550.4,
                categories: None,
            })
            .await
            .unwrap();
        assert_eq!(summary.count, 17);

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["radius"], 5550.0);
        assert_eq!(body["lat"], 52.52);
        assert_eq!(body["categories"].as_array().map(Vec::len), Some(10));
        assert_eq!(body["categories"][0], "museum");
    }

    #[tokio::test]
    async fn http_errors_become_source_errors() {
        let base = serve(backend(Arc::default())).await;
        let err = client(base)
            .create_route(CreateRouteRequest {
                origin: Coordinates::new(52.52, 13.405).unwrap(),
                destination: Coordinates::new(52.5212, 13.3969).unwrap(),
                settings: catalog::RouteSettings::walking(),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("502"), "{err}");
    }

    #[tokio::test]
    async fn search_sends_only_the_fields_that_are_set() {
        let captured = Arc::new(Captured::default());
        let base = serve(lookups(captured.clone())).await;

        let pois = client(base)
            .search_pois(&PoiSearch {
                text: Some("pergamon".into()),
                categories: vec![PoiCategory::Museum, PoiCategory::Gallery],
                limit: Some(5),
                ..PoiSearch::default()
            })
            .await
            .unwrap();
        assert_eq!(pois[0].id, "s1");

        let q = captured.query.lock().unwrap().clone().unwrap();
        assert_eq!(q["query"], "pergamon");
        assert_eq!(q["categories"], "museum,gallery");
        assert_eq!(q["limit"], "5");
        assert!(!q.contains_key("lat"));
        assert!(!q.contains_key("radius"));
    }

    #[tokio::test]
    async fn nearby_sends_center_and_rounded_radius() {
        let captured = Arc::new(Captured::default());
        let base = serve(lookups(captured.clone())).await;

        let pois = client(base)
            .nearby_pois(Coordinates::new(52.52, 13.405).unwrap(), Some(1499.6))
            .await
            .unwrap();
        assert_eq!(pois.len(), 2);

        let q = captured.query.lock().unwrap().clone().unwrap();
        assert_eq!(q["lat"], "52.52");
        assert_eq!(q["lng"], "13.405");
        assert_eq!(q["radius"], "1500");
    }

    #[tokio::test]
    async fn lookup_by_id_escapes_the_path_segment() {
        let base = serve(lookups(Arc::default())).await;
        let api = client(base);

        let poi = api.poi("node/240109189").await.unwrap();
        assert_eq!(poi.id, "node/240109189");

        let route = api.route("r-7").await.unwrap();
        assert_eq!(route.id, "r-7");
        assert_eq!(route.geometry.coordinates.len(), 2);

        let err = api.route("missing").await.unwrap_err();
        assert!(err.to_string().contains("404"), "{err}");
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_error() {
        let err = client("http://127.0.0.1:9".into()).health().await.unwrap_err();
        assert_eq!(err.message, "HTTP request failed");
        assert!(std::error::Error::source(&err).is_some());
    }
}
