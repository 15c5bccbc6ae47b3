use std::collections::HashMap;
use std::sync::Arc;

use shuttle_axum::axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use crate::analyze::anon_hash;
use crate::engine::ScoringEngine;
use crate::history::{History, ResultStore, DEFAULT_HISTORY_CAPACITY};
use crate::model::{AnalysisResult, Article, SourceAnalysis};

pub const USER_ID_HEADER: &str = "x-user-id";
const HISTORY_PAGE: usize = 20;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ScoringEngine>,
    pub history: Arc<History>,
}

impl AppState {
    pub fn new(engine: Arc<ScoringEngine>) -> Self {
        Self {
            engine,
            history: Arc::new(History::with_capacity(DEFAULT_HISTORY_CAPACITY)),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/analyze", post(analyze))
        .route("/example", get(example))
        .route("/history", get(history))
        .route("/debug/source", get(debug_source))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

fn error(status: StatusCode, msg: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

fn user_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(article): Json<Article>,
) -> Result<Json<AnalysisResult>, Response> {
    if article.is_blank() {
        return Err(error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "article title and content are empty",
        ));
    }

    let result = state.engine.score(&article).await;

    if let Some(user) = user_id(&headers) {
        if !state.history.save(&user, &article, &result) {
            warn!(user = %anon_hash(&user), "history save failed");
        }
    }
    Ok(Json(result))
}

async fn example() -> Json<Article> {
    Json(Article::example())
}

async fn history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<crate::history::HistoryEntry>>, Response> {
    let Some(user) = user_id(&headers) else {
        return Err(error(StatusCode::BAD_REQUEST, "missing x-user-id header"));
    };
    let rows = state.history.recent_for_user(&user, HISTORY_PAGE);
    debug!(user = %anon_hash(&user), rows = rows.len(), "history read");
    Ok(Json(rows))
}

async fn debug_source(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Json<SourceAnalysis> {
    let url = q.get("url").map(String::as_str);
    Json(state.engine.classifier().classify(url))
}
