use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::validate_jwt;
use crate::error::ApiError;

/// Authenticated author identity extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthAuthor {
    pub name: String,
}

/// JWT authentication middleware that validates tokens and injects the caller identity
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    tracing::debug!("Validating author with JWT token");

    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(token)?;

    request.extensions_mut().insert(AuthAuthor { name: claims.username });

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.split_once(' ') {
        Some(("Bearer", token)) if !token.trim().is_empty() && !token.contains(' ') => Ok(token),
        _ => Err("Invalid Authorization header format"),
    }
}
