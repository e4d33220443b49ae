//! HTTP surface: the element-set proxy endpoint plus tracker control.

use crate::{
    focus::{FocusBridge, MapView},
    origin::Origin,
    propagator::Propagator,
    proxy::TleProxy,
    scheduler::{Scheduler, TrackerState},
    source::{SourceError, SourceSelection},
    store::CacheStore,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tletypes::prelude::Provenance;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Default, Deserialize)]
pub struct TleQuery {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TleResponse {
    pub source: Provenance,
    pub tle_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct SourceRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SourceResponse {
    pub active: Url,
    pub candidate: String,
}

#[derive(Debug, Deserialize)]
pub struct FocusRequest {
    pub name: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// `GET /api/tle?url=...`
pub fn tle_routes<S: CacheStore, O: Origin>(proxy: Arc<TleProxy<S, O>>) -> Router {
    Router::new()
        .route("/api/tle", get(get_tle::<S, O>))
        .with_state(proxy)
}

async fn get_tle<S: CacheStore, O: Origin>(
    State(proxy): State<Arc<TleProxy<S, O>>>,
    Query(query): Query<TleQuery>,
) -> Response {
    let url = query.url.unwrap_or_default();
    if url.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Missing url");
    }

    match proxy.get_tle_text(&url).await {
        Ok(fetched) => Json(TleResponse {
            source: fetched.provenance,
            tle_text: fetched.text,
        })
        .into_response(),
        Err(e) => {
            warn!(url = %url, error = %e, "Proxy fetch failed");
            error_response(StatusCode::BAD_GATEWAY, "Fetch failed")
        }
    }
}

/// Shared state behind the tracker control routes
pub struct TrackerApi<S, O, P, M> {
    pub scheduler: Arc<Mutex<Scheduler<S, O, P>>>,
    pub selection: Arc<Mutex<SourceSelection>>,
    pub focus: Arc<FocusBridge<M>>,
    pub tracker: watch::Receiver<TrackerState>,
}

impl<S, O, P, M> Clone for TrackerApi<S, O, P, M> {
    fn clone(&self) -> Self {
        TrackerApi {
            scheduler: self.scheduler.clone(),
            selection: self.selection.clone(),
            focus: self.focus.clone(),
            tracker: self.tracker.clone(),
        }
    }
}

/// `GET /api/positions`, `GET|PUT /api/source`, `POST /api/focus`
pub fn tracker_routes<S, O, P, M>(api: TrackerApi<S, O, P, M>) -> Router
where
    S: CacheStore,
    O: Origin,
    P: Propagator,
    M: MapView,
{
    Router::new()
        .route("/api/positions", get(get_positions::<S, O, P, M>))
        .route(
            "/api/source",
            get(get_source::<S, O, P, M>).put(put_source::<S, O, P, M>),
        )
        .route("/api/focus", post(post_focus::<S, O, P, M>))
        .with_state(api)
}

async fn get_positions<S, O, P, M>(State(api): State<TrackerApi<S, O, P, M>>) -> Json<TrackerState>
where
    S: CacheStore,
    O: Origin,
    P: Propagator,
    M: MapView,
{
    let state = api.tracker.borrow().clone();
    Json(state)
}

async fn get_source<S, O, P, M>(State(api): State<TrackerApi<S, O, P, M>>) -> Json<SourceResponse>
where
    S: CacheStore,
    O: Origin,
    P: Propagator,
    M: MapView,
{
    let selection = api.selection.lock().await;
    Json(SourceResponse {
        active: selection.active().clone(),
        candidate: selection.candidate().to_owned(),
    })
}

async fn put_source<S, O, P, M>(
    State(api): State<TrackerApi<S, O, P, M>>,
    Json(req): Json<SourceRequest>,
) -> Response
where
    S: CacheStore,
    O: Origin,
    P: Propagator,
    M: MapView,
{
    let proxy = api.scheduler.lock().await.proxy().clone();

    let mut selection = api.selection.lock().await;
    selection.set_candidate(req.url);
    let active = match selection.submit(proxy.origin()).await {
        Ok(url) => url.clone(),
        Err(e @ SourceError::InvalidSourceUrl { .. }) => {
            return error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e @ SourceError::SourceUnreachable { .. }) => {
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    };

    api.scheduler.lock().await.select_source(active.clone());
    Json(SourceResponse {
        active,
        candidate: selection.candidate().to_owned(),
    })
    .into_response()
}

async fn post_focus<S, O, P, M>(
    State(api): State<TrackerApi<S, O, P, M>>,
    Json(req): Json<FocusRequest>,
) -> Response
where
    S: CacheStore,
    O: Origin,
    P: Propagator,
    M: MapView,
{
    let positions = api.tracker.borrow().snapshot.positions.clone();
    match api.focus.focus_by_name(&positions, &req.name) {
        Some(cmd) => {
            info!(name = %req.name, "Focused satellite");
            Json(cmd).into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, format!("Unknown satellite '{}'", req.name)),
    }
}
