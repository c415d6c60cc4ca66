use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handlers::validation;
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdminLogin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub admin_email: String,
    pub organization_name: String,
}

/// POST /admin/login - authenticate an administrator and issue a bearer
/// token. Bad credentials are a single undifferentiated 401.
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<AdminLogin>,
) -> Result<Json<TokenResponse>, ApiError> {
    validation::validate_email(&credentials.email)
        .map_err(|msg| validation::reject("email", msg))?;

    let service = AuthService::new(state.db.clone(), state.config.clone());

    let admin = service
        .authenticate_admin(&credentials.email, &credentials.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Incorrect email or password"))?;

    let access_token = service.create_admin_token(&admin)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        admin_email: admin.email,
        organization_name: admin.organization_name,
    }))
}
