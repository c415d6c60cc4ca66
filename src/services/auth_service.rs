use std::sync::Arc;

use crate::auth::{self, password, Claims};
use crate::config::AppConfig;
use crate::database::models::Admin;
use crate::database::DatabaseManager;
use crate::services::ServiceError;

/// Administrator authentication and bearer-token issue/verify.
pub struct AuthService {
    db: DatabaseManager,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(db: DatabaseManager, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// Look up an administrator and verify the password. Missing account,
    /// failed verification and an inactive account all return `None` so the
    /// caller cannot enumerate which one happened.
    pub async fn authenticate_admin(
        &self,
        email: &str,
        password_plain: &str,
    ) -> Result<Option<Admin>, ServiceError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, hashed_password, organization_name, organization_id, created_at, is_active \
             FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(admin) = admin else {
            return Ok(None);
        };

        if !password::verify_password(password_plain, &admin.hashed_password) {
            return Ok(None);
        }

        if !admin.is_active {
            return Ok(None);
        }

        Ok(Some(admin))
    }

    /// Issue a signed token carrying the admin's identity and organization.
    pub fn create_admin_token(&self, admin: &Admin) -> Result<String, ServiceError> {
        let claims = Claims::new(
            admin.email.clone(),
            admin.organization_name.clone(),
            admin
                .organization_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            self.config.security.access_token_expire_minutes,
        );
        Ok(auth::generate_token(&self.config.security, &claims)?)
    }

    pub fn verify_token(&self, token: &str) -> Option<Claims> {
        auth::verify_token(&self.config.security, token)
    }
}
