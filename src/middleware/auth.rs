use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::services::AuthService;
use crate::state::AppState;

/// Authenticated administrator context extracted from a bearer token.
#[derive(Clone, Debug)]
pub struct AuthAdmin {
    pub email: String,
    pub organization_name: String,
    pub organization_id: String,
}

impl From<Claims> for AuthAdmin {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            organization_name: claims.organization_name,
            organization_id: claims.organization_id,
        }
    }
}

/// Bearer-token middleware for the mutating organization routes. Verifies
/// the token and injects an `AuthAdmin` extension; missing, malformed,
/// expired and badly signed tokens all yield the same 401.
pub async fn require_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let claims = AuthService::new(state.db.clone(), state.config.clone())
        .verify_token(&token)
        .ok_or_else(|| ApiError::unauthorized("Invalid authentication credentials"))?;

    request.extensions_mut().insert(AuthAdmin::from(claims));
    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer ...` header.
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
