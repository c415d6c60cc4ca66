use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::Organization;
use crate::error::ApiError;
use crate::handlers::validation;
use crate::middleware::AuthAdmin;
use crate::services::OrganizationService;
use crate::state::AppState;

/// Shared body for create and update: the organization name plus its
/// administrator's (possibly new) credentials.
#[derive(Debug, Deserialize)]
pub struct OrganizationPayload {
    pub organization_name: String,
    pub email: String,
    pub password: String,
}

impl OrganizationPayload {
    fn validate(&self) -> Result<(), ApiError> {
        validation::validate_organization_name(&self.organization_name)
            .map_err(|msg| validation::reject("organization_name", msg))?;
        validation::validate_email(&self.email).map_err(|msg| validation::reject("email", msg))?;
        validation::validate_password(&self.password)
            .map_err(|msg| validation::reject("password", msg))?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub organization_name: String,
    pub collection_name: String,
    pub admin_email: String,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

impl OrganizationResponse {
    fn from_record(organization: Organization, message: &str) -> Self {
        Self {
            organization_name: organization.organization_name,
            collection_name: organization.collection_name,
            admin_email: organization.admin_email,
            created_at: organization.created_at,
            message: message.to_string(),
        }
    }
}

/// Full organization payload for lookups and listings.
#[derive(Debug, Serialize)]
pub struct OrganizationRecord {
    pub organization_name: String,
    pub collection_name: String,
    pub admin_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Organization> for OrganizationRecord {
    fn from(organization: Organization) -> Self {
        Self {
            organization_name: organization.organization_name,
            collection_name: organization.collection_name,
            admin_email: organization.admin_email,
            created_at: organization.created_at,
            updated_at: organization.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OrganizationQuery {
    pub organization_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    pub old_organization_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub organization_name: String,
}

/// POST /org/create - register an organization with its administrator and
/// provision the tenant data partition.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<OrganizationPayload>,
) -> Result<(StatusCode, Json<OrganizationResponse>), ApiError> {
    payload.validate()?;

    let service = OrganizationService::new(state.db.clone());
    let organization = service
        .create_organization(&payload.organization_name, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrganizationResponse::from_record(
            organization,
            "Organization created successfully",
        )),
    ))
}

/// GET /org/get?organization_name= - lookup, 404 when absent.
pub async fn get(
    State(state): State<AppState>,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<OrganizationRecord>, ApiError> {
    let service = OrganizationService::new(state.db.clone());
    let organization = service
        .get_organization(&query.organization_name)
        .await?
        .ok_or_else(|| ApiError::not_found("Organization not found"))?;

    Ok(Json(organization.into()))
}

/// GET /org/list - capped listing, no pagination cursor.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<OrganizationRecord>>, ApiError> {
    let limit = query.limit.unwrap_or(100).clamp(1, 100);

    let service = OrganizationService::new(state.db.clone());
    let organizations = service.list_organizations(limit).await?;

    Ok(Json(organizations.into_iter().map(Into::into).collect()))
}

/// PUT /org/update?old_organization_name= - rename/update the organization
/// owned by the requesting administrator.
pub async fn update(
    State(state): State<AppState>,
    Query(query): Query<UpdateQuery>,
    Extension(admin): Extension<AuthAdmin>,
    Json(payload): Json<OrganizationPayload>,
) -> Result<Json<OrganizationResponse>, ApiError> {
    payload.validate()?;

    let service = OrganizationService::new(state.db.clone());
    let organization = service
        .update_organization(
            &query.old_organization_name,
            &payload.organization_name,
            &payload.email,
            &payload.password,
            &admin.email,
        )
        .await?;

    Ok(Json(OrganizationResponse::from_record(
        organization,
        "Organization updated successfully",
    )))
}

/// DELETE /org/delete?organization_name= - tear down the organization owned
/// by the requesting administrator.
pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<OrganizationQuery>,
    Extension(admin): Extension<AuthAdmin>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let service = OrganizationService::new(state.db.clone());
    let deleted = service
        .delete_organization(&query.organization_name, &admin.email)
        .await?;

    if !deleted {
        return Err(ApiError::not_found("Organization not found"));
    }

    Ok(Json(DeleteResponse {
        message: "Organization deleted successfully".to_string(),
        organization_name: query.organization_name,
    }))
}
