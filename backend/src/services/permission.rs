//! Role lookup and permission resolution

use uuid::Uuid;

use crate::db::{QueryExecutor, SqlParam};
use crate::error::AppResult;
use shared::models::UserPermissions;
use shared::permissions::resolve_user_permissions;

#[derive(Clone)]
pub struct PermissionService {
    db: QueryExecutor,
}

#[derive(sqlx::FromRow)]
struct RoleName {
    role: String,
}

impl PermissionService {
    pub fn new(db: QueryExecutor) -> Self {
        Self { db }
    }

    /// Distinct role names assigned to a user
    pub async fn roles_for_user(&self, user_id: Uuid) -> AppResult<Vec<String>> {
        let rows = self
            .db
            .fetch_all::<RoleName>(
                "SELECT DISTINCT role FROM user_roles WHERE user_id = $1 ORDER BY role",
                &[SqlParam::from(user_id)],
            )
            .await?;
        Ok(rows.into_iter().map(|r| r.role).collect())
    }

    /// Roles plus the flattened permission set; an unknown user has neither
    pub async fn user_permissions(&self, user_id: Uuid) -> AppResult<UserPermissions> {
        let roles = self.roles_for_user(user_id).await?;
        tracing::debug!(%user_id, roles = roles.len(), "Resolved user roles");
        Ok(resolve_user_permissions(user_id, roles))
    }
}
