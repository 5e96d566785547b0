//! Role repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use verrou_core::result::AppResult;
use verrou_entity::role::{Role, RoleName};

use crate::error::db_err;

/// Repository for the fixed set of roles.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All roles, oldest first.
    pub async fn find_all(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY created_at, name")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list roles"))
    }

    /// Find a role by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find role"))
    }

    /// Find a role by name.
    pub async fn find_by_name(&self, name: RoleName) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find role by name"))
    }

    /// Insert any missing role. Returns how many were created.
    pub async fn seed(&self) -> AppResult<u64> {
        let mut created = 0;
        for name in RoleName::ALL {
            let result = sqlx::query(
                "INSERT INTO roles (name, label) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING",
            )
            .bind(name)
            .bind(name.label())
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to seed roles"))?;
            created += result.rows_affected();
        }
        Ok(created)
    }
}
