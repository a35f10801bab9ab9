use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// GET / - Welcome payload with the endpoint map
pub async fn root() -> Json<serde_json::Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Movies API",
            "version": version,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "movies": "GET|POST /movies, GET|PUT|DELETE /movies/:id",
                "filter": "/movies/by_category?category=&year= (public)",
                "token": "POST /auth/token (public - token acquisition)",
                "profile": "/auth/profile (protected)",
                "dashboard": "/auth/dashboard (protected, admin role)",
                "files": "/files/sample (public)",
            }
        }
    }))
}

/// GET /health - Liveness plus a store round-trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.movies.health().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "store unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                    }
                })),
            )
        }
    }
}
