use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row in the master `admins` record set. Email is globally unique
/// across all tenants.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub organization_name: String,
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}
