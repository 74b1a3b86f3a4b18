use crate::document::TfIdfScore;
use crate::pipeline::RunStats;
use crate::ranking::{rank_documents, ScoredDocument};
use crate::storage::ScoreStore;
use crate::tokenizer::Tokenizer;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const DEFAULT_LIMIT: usize = 10;

/// Shared state of the read-only score API
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ScoreStore>,
    pub tokenizer: Arc<Tokenizer>,
}

impl AppState {
    /// Tokenize queries the same way the stored corpus was tokenized
    pub fn new(store: ScoreStore) -> anyhow::Result<Self> {
        let options = store.analyzer()?.unwrap_or_default();
        Ok(Self {
            store: Arc::new(store),
            tokenizer: Arc::new(Tokenizer::with_options(options)),
        })
    }
}

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentParams {
    pub id: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub total: usize,
    pub scores: Vec<TfIdfScore>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub terms: Vec<String>,
    pub total: usize,
    pub documents: Vec<ScoredDocument>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ========== Error Handling ==========

struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = format!("{:#}", self.0);
        tracing::error!("API error: {}", message);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(message)),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, Json(ApiResponse::<()>::error(message))).into_response()
}

fn truncate<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    items.truncate(limit.unwrap_or(DEFAULT_LIMIT));
    items
}

// ========== Handlers ==========

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK"))
}

async fn term_scores(
    State(state): State<AppState>,
    Path(word): Path<String>,
    Query(params): Query<LimitParams>,
) -> Result<Response, AppError> {
    // Normalize like the corpus: stemming and stopwords apply here too
    let analyzed = match state.tokenizer.analyze(&word).as_slice() {
        [single] => single.clone(),
        _ => return Ok(not_found(format!("Word '{}' not found", word))),
    };
    let scores = state.store.scores_for_word(&analyzed)?;
    if scores.is_empty() {
        return Ok(not_found(format!("Word '{}' not found", word)));
    }

    let total = scores.len();
    let scores = truncate(scores, params.limit);
    Ok(Json(ApiResponse::success(ScoresResponse { total, scores })).into_response())
}

async fn document_scores(
    State(state): State<AppState>,
    Query(params): Query<DocumentParams>,
) -> Result<Response, AppError> {
    let scores = state.store.scores_for_document(&params.id)?;
    if scores.is_empty() {
        return Ok(not_found(format!("Document '{}' not found", params.id)));
    }

    let total = scores.len();
    let scores = truncate(scores, params.limit);
    Ok(Json(ApiResponse::success(ScoresResponse { total, scores })).into_response())
}

async fn search_documents(
    State(state): State<AppState>,
    Query(req): Query<SearchRequest>,
) -> Result<impl IntoResponse, AppError> {
    let terms = state.tokenizer.analyze(&req.q);
    let ranked = rank_documents(&terms, &state.store)?;

    let response = SearchResponse {
        query: req.q,
        terms,
        total: ranked.len(),
        documents: truncate(ranked, req.limit),
    };

    Ok(Json(ApiResponse::success(response)))
}

async fn get_stats(State(state): State<AppState>) -> Result<Response, AppError> {
    match state.store.run_stats()? {
        Some(stats) => Ok(Json(ApiResponse::<RunStats>::success(stats)).into_response()),
        None => Ok(not_found("No run has been stored".to_string())),
    }
}

// ========== Router ==========

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/terms/:word", get(term_scores))
        .route("/documents", get(document_scores))
        .route("/search", get(search_documents))
        .route("/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
