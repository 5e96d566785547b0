//! Role listing.

use std::sync::Arc;

use verrou_core::error::AppError;
use verrou_database::repositories::RoleRepository;
use verrou_entity::role::Role;

#[derive(Debug, Clone)]
pub struct RoleService {
    role_repo: Arc<RoleRepository>,
}

impl RoleService {
    pub fn new(role_repo: Arc<RoleRepository>) -> Self {
        Self { role_repo }
    }

    pub async fn list(&self) -> Result<Vec<Role>, AppError> {
        self.role_repo.find_all().await
    }
}
