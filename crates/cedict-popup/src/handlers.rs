//! HTTP boundary consumed by the popup UI shell.
//!
//! One lookup endpoint plus liveness/readiness probes. A lookup arriving
//! before the index is resident blocks on the shared load; an explicit
//! no-match (null `matched_key`, empty `entries`) is therefore always
//! distinguishable from "index unavailable" (503).

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use cedict_types::Entry;

use crate::loader::IndexCache;
use crate::resolver;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<IndexCache>,
}

#[derive(Deserialize)]
pub struct LookupQuery {
    pub text: String,
}

#[derive(Serialize)]
pub struct LookupResponse {
    selection: String,
    /// The candidate key that matched; `null` on no match.
    matched_key: Option<String>,
    entries: Vec<Entry>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/v1/lookup", get(lookup))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

/// Ready once the index is resident; does not itself trigger a load.
async fn readyz(State(state): State<AppState>) -> Response {
    if state.cache.ready().is_some() {
        "ready".into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "loading").into_response()
    }
}

async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, ApiError> {
    let index = state.cache.get_or_load().await.map_err(|err| {
        warn!("index load failed: {err:#}");
        ApiError::IndexUnavailable
    })?;

    // Invalid selections resolve to no match, never an error to the UI.
    let response = match resolver::resolve(&index, &params.text) {
        Some(hit) => LookupResponse {
            selection: params.text,
            matched_key: Some(hit.matched_key),
            entries: hit.entries.to_vec(),
        },
        None => LookupResponse {
            selection: params.text,
            matched_key: None,
            entries: Vec::new(),
        },
    };
    Ok(Json(response))
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("index unavailable")]
    IndexUnavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::IndexUnavailable => {
                let body = Json(ErrorResponse {
                    error: self.to_string(),
                });
                (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
            }
        }
    }
}
