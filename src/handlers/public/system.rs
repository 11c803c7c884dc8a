use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Blog API (Rust)",
            "version": version,
            "description": "Multi-author blog backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "/login (public - token acquisition)",
                "posts": "/api/posts[/:id][?author=] (protected)",
            }
        }
    }))
}

/// GET /health - liveness plus current post count
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let now = chrono::Utc::now();

    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": now,
            "posts": state.store.count().await,
        }
    }))
}
