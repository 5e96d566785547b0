//! User administration, self-service profile and role listing.

pub mod admin;
pub mod profile;
pub mod role;

pub use admin::{AdminUpdateUserRequest, AdminUserService, CreateUserRequest};
pub use profile::{ChangePasswordRequest, ProfileService, UpdateProfileRequest};
pub use role::RoleService;

use tracing::debug;

use verrou_core::error::{AppError, ErrorKind};
use verrou_core::text::generate_pseudo;
use verrou_database::repositories::UserRepository;
use verrou_entity::user::{CreateUser, User};

/// Attempts made before giving up on finding a free pseudo.
pub const PSEUDO_ATTEMPTS: usize = 10;

/// Insert `data` under a freshly generated pseudo, retrying on collisions.
pub(crate) async fn insert_with_unique_pseudo(
    repo: &UserRepository,
    mut data: CreateUser,
) -> Result<User, AppError> {
    for attempt in 1..=PSEUDO_ATTEMPTS {
        data.pseudo = generate_pseudo();
        match repo.create(&data).await {
            Ok(user) => return Ok(user),
            Err(e) if e.kind == ErrorKind::Conflict => {
                debug!(attempt, pseudo = %data.pseudo, "Pseudo collision, retrying");
            }
            Err(e) => return Err(e),
        }
    }
    Err(AppError::internal(
        "Could not generate a unique pseudo, please retry",
    ))
}
