use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::auth::password;
use crate::database::models::{Admin, Organization};
use crate::database::DatabaseManager;
use crate::services::{map_unique_violation, ServiceError};

const ORGANIZATION_COLUMNS: &str =
    "id, organization_name, collection_name, admin_email, created_at, updated_at";
const ADMIN_COLUMNS: &str =
    "id, email, hashed_password, organization_name, organization_id, created_at, is_active";

/// Tenant lifecycle: provisioning, rename/migration and teardown of an
/// organization together with its administrator and data partition.
pub struct OrganizationService {
    db: DatabaseManager,
}

impl OrganizationService {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    /// Derive the partition identifier from an organization name: lowercase,
    /// every character outside [a-z0-9] replaced with '_', prefixed "org_".
    /// Deterministic but collision-prone; distinct names may share a slug.
    pub fn generate_collection_name(org_name: &str) -> String {
        let clean: String = org_name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("org_{}", clean)
    }

    pub async fn organization_exists(&self, organization_name: &str) -> Result<bool, ServiceError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM organizations WHERE organization_name = $1")
                .bind(organization_name)
                .fetch_one(self.db.pool())
                .await?;
        Ok(count.0 > 0)
    }

    pub async fn admin_exists(&self, email: &str) -> Result<bool, ServiceError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admins WHERE email = $1")
            .bind(email)
            .fetch_one(self.db.pool())
            .await?;
        Ok(count.0 > 0)
    }

    async fn find_org_admin(
        &self,
        email: &str,
        organization_name: &str,
    ) -> Result<Option<Admin>, ServiceError> {
        let query = format!(
            "SELECT {} FROM admins WHERE email = $1 AND organization_name = $2",
            ADMIN_COLUMNS
        );
        let admin = sqlx::query_as::<_, Admin>(&query)
            .bind(email)
            .bind(organization_name)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(admin)
    }

    /// Provision a tenant: organization record, owning administrator, and a
    /// seeded data partition. The steps are sequential and not wrapped in a
    /// transaction; the unique constraints on organization_name and email
    /// backstop the fast-path existence checks.
    pub async fn create_organization(
        &self,
        organization_name: &str,
        email: &str,
        password_plain: &str,
    ) -> Result<Organization, ServiceError> {
        if self.organization_exists(organization_name).await? {
            return Err(ServiceError::AlreadyExists(
                "Organization already exists".to_string(),
            ));
        }
        if self.admin_exists(email).await? {
            return Err(ServiceError::AlreadyExists(
                "Admin email already registered".to_string(),
            ));
        }

        let collection_name = Self::generate_collection_name(organization_name);
        let hashed_password = password::hash_password(password_plain)?;
        let now = Utc::now();

        let insert_org = format!(
            "INSERT INTO organizations (id, organization_name, collection_name, admin_email, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) RETURNING {}",
            ORGANIZATION_COLUMNS
        );
        let organization = sqlx::query_as::<_, Organization>(&insert_org)
            .bind(Uuid::new_v4())
            .bind(organization_name)
            .bind(&collection_name)
            .bind(email)
            .bind(now)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| map_unique_violation(e, "Organization already exists"))?;

        sqlx::query(
            "INSERT INTO admins (id, email, hashed_password, organization_name, organization_id, created_at, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, TRUE)",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(&hashed_password)
        .bind(organization_name)
        .bind(organization.id)
        .bind(now)
        .execute(self.db.pool())
        .await
        .map_err(|e| map_unique_violation(e, "Admin email already registered"))?;

        self.db.create_partition(&collection_name).await?;
        self.db
            .insert_document(
                &collection_name,
                &json!({
                    "type": "metadata",
                    "organization_name": organization_name,
                    "initialized_at": now,
                    "description": "Organization data collection",
                }),
            )
            .await?;

        info!("Created organization: {}", organization_name);
        Ok(organization)
    }

    pub async fn get_organization(
        &self,
        organization_name: &str,
    ) -> Result<Option<Organization>, ServiceError> {
        let query = format!(
            "SELECT {} FROM organizations WHERE organization_name = $1",
            ORGANIZATION_COLUMNS
        );
        let organization = sqlx::query_as::<_, Organization>(&query)
            .bind(organization_name)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(organization)
    }

    /// Rename/update a tenant. Documents are copied to the partition under
    /// the new identifier and the old partition is dropped, but only when
    /// the derived identifier actually changes — two names that slug to the
    /// same identifier share their partition, and dropping it would destroy
    /// the tenant's data. created_at is preserved.
    pub async fn update_organization(
        &self,
        old_org_name: &str,
        new_org_name: &str,
        email: &str,
        password_plain: &str,
        admin_email: &str,
    ) -> Result<Organization, ServiceError> {
        let old_org = self
            .get_organization(old_org_name)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Organization not found".to_string()))?;

        if self.find_org_admin(admin_email, old_org_name).await?.is_none() {
            return Err(ServiceError::Unauthorized(
                "Unauthorized: Admin does not belong to this organization".to_string(),
            ));
        }

        if old_org_name != new_org_name && self.organization_exists(new_org_name).await? {
            return Err(ServiceError::AlreadyExists(
                "New organization name already exists".to_string(),
            ));
        }

        let new_collection_name = Self::generate_collection_name(new_org_name);
        let old_collection_name = old_org.collection_name.clone();
        let collection_changed = new_collection_name != old_collection_name;

        let documents = self.db.read_partition(&old_collection_name).await?;
        if collection_changed && !documents.is_empty() {
            self.db.create_partition(&new_collection_name).await?;
            self.db
                .insert_documents(&new_collection_name, &documents)
                .await?;
        }

        let update_org = format!(
            "UPDATE organizations SET organization_name = $1, collection_name = $2, admin_email = $3, updated_at = $4 \
             WHERE organization_name = $5 RETURNING {}",
            ORGANIZATION_COLUMNS
        );
        let updated = sqlx::query_as::<_, Organization>(&update_org)
            .bind(new_org_name)
            .bind(&new_collection_name)
            .bind(email)
            .bind(Utc::now())
            .bind(old_org_name)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| map_unique_violation(e, "New organization name already exists"))?;

        let hashed_password = password::hash_password(password_plain)?;
        sqlx::query(
            "UPDATE admins SET email = $1, hashed_password = $2, organization_name = $3 WHERE email = $4",
        )
        .bind(email)
        .bind(&hashed_password)
        .bind(new_org_name)
        .bind(admin_email)
        .execute(self.db.pool())
        .await
        .map_err(|e| map_unique_violation(e, "Admin email already registered"))?;

        if collection_changed {
            self.db.drop_partition(&old_collection_name).await?;
        }

        info!("Updated organization: {} -> {}", old_org_name, new_org_name);
        Ok(updated)
    }

    /// Tear down a tenant. The partition and admins go first so that a crash
    /// mid-sequence leaves a visibly broken organization record rather than
    /// an orphaned partition with no owner.
    pub async fn delete_organization(
        &self,
        organization_name: &str,
        admin_email: &str,
    ) -> Result<bool, ServiceError> {
        let organization = self
            .get_organization(organization_name)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Organization not found".to_string()))?;

        if self
            .find_org_admin(admin_email, organization_name)
            .await?
            .is_none()
        {
            return Err(ServiceError::Unauthorized(
                "Unauthorized: Admin does not belong to this organization".to_string(),
            ));
        }

        self.db.drop_partition(&organization.collection_name).await?;

        sqlx::query("DELETE FROM admins WHERE organization_name = $1")
            .bind(organization_name)
            .execute(self.db.pool())
            .await?;

        let result = sqlx::query("DELETE FROM organizations WHERE organization_name = $1")
            .bind(organization_name)
            .execute(self.db.pool())
            .await?;

        info!("Deleted organization: {}", organization_name);
        Ok(result.rows_affected() > 0)
    }

    /// Capped listing, insertion order irrelevant.
    pub async fn list_organizations(&self, limit: i64) -> Result<Vec<Organization>, ServiceError> {
        let query = format!("SELECT {} FROM organizations LIMIT $1", ORGANIZATION_COLUMNS);
        let organizations = sqlx::query_as::<_, Organization>(&query)
            .bind(limit)
            .fetch_all(self.db.pool())
            .await?;
        Ok(organizations)
    }
}
