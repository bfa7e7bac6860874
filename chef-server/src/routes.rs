use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chef::basic_models::{RecipeRequest, RecipeResponse};
use tower_http::cors::CorsLayer;

use crate::{
    errors::{WebError, WebResult},
    llm::ChatProvider,
    recipe,
};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ChatProvider>,
}

impl AppState {
    pub fn new(provider: impl ChatProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

/// Build the application: routes plus CORS, tracing and compression layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        // `POST /api/get-recipe` goes to `get_recipe`
        .route("/api/get-recipe", post(get_recipe))
        // `GET /health` goes to `health`
        .route("/health", get(health))
        .fallback(not_found)
        // Any origin, method and header, with credentials
        .layer(CorsLayer::very_permissive())
        .layer(
            tower_http::compression::CompressionLayer::new()
                .quality(tower_http::CompressionLevel::Fastest),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Turn a dish name into a list of steps.
///
/// Upstream failures are reported as `{"error": ...}` with a 200 status.
/// Only a body that doesn't fit `RecipeRequest` gets a non-2xx reply.
async fn get_recipe(
    State(state): State<AppState>,
    payload: Result<Json<RecipeRequest>, JsonRejection>,
) -> WebResult<Json<RecipeResponse>> {
    let Json(request) = payload?;
    let result = recipe::get_recipe_steps(state.provider.as_ref(), &request.dish).await;
    if let Err(e) = &result {
        tracing::warn!("Recipe for {:?} failed: {}", request.dish, e);
    }
    Ok(Json(RecipeResponse::from_result(result)))
}

// Just reply that everything is okay
async fn health() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> WebError {
    WebError::NotFound
}
