// handlers/public/login.rs - POST /login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /login - Exchange author credentials for a bearer token
///
/// Expected Input:
/// ```json
/// { "author": "Author 1", "password": "password1" }
/// ```
///
/// Expected Output:
/// ```json
/// { "success": true, "data": { "token": "eyJhbGciOiJIUzI1NiI..." } }
/// ```
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(credentials) = payload?;

    if !state.authors.valid_author(&credentials.author, &credentials.password) {
        tracing::warn!("Login failed for '{}'", credentials.author);
        return Err(ApiError::unauthorized("invalid credentials"));
    }

    let token = generate_jwt(&Claims::new(&credentials.author))?;
    tracing::info!("Issued token for '{}'", credentials.author);

    Ok(ApiResponse::success(LoginResponse { token }))
}
