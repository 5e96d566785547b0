//! Admin user deletion against a real PostgreSQL database.
//!
//! Run with `cargo test -p verrou-service -- --ignored` and `DATABASE_URL` set.

use std::sync::Arc;

use serde_json::json;
use sqlx::PgPool;
use tempfile::TempDir;
use uuid::Uuid;

use verrou_auth::PasswordHasher;
use verrou_core::error::ErrorKind;
use verrou_database::repositories::{
    AssetRepository, CategoryRepository, PostRepository, RoleRepository, UserRepository,
};
use verrou_entity::asset::CreateAsset;
use verrou_entity::post::CreatePost;
use verrou_entity::role::RoleName;
use verrou_entity::user::CreateUser;
use verrou_notify::mail::LogMailer;
use verrou_service::{AdminUserService, RequestContext};
use verrou_storage::{LocalStorageProvider, Uploader};

struct Fixture {
    service: AdminUserService,
    users: Arc<UserRepository>,
    pool: PgPool,
    storage: TempDir,
}

impl Fixture {
    async fn new(pool: PgPool) -> Self {
        let storage = tempfile::tempdir().unwrap();
        let provider = Arc::new(LocalStorageProvider::new(storage.path()).await.unwrap());
        let users = Arc::new(UserRepository::new(pool.clone()));
        let service = AdminUserService::new(
            Arc::clone(&users),
            Arc::new(RoleRepository::new(pool.clone())),
            Arc::new(PostRepository::new(pool.clone())),
            Arc::new(PasswordHasher::new()),
            Arc::new(LogMailer),
            Arc::new(Uploader::new(provider, 5 * 1024 * 1024)),
        );
        Self {
            service,
            users,
            pool,
            storage,
        }
    }

    fn admin(&self) -> RequestContext {
        RequestContext::new(
            Uuid::new_v4(),
            RoleName::Admin,
            "admin@verrou.test".into(),
            "verrou_admin".into(),
            "127.0.0.1".into(),
            None,
        )
    }

    async fn client(&self) -> Uuid {
        let role = RoleRepository::new(self.pool.clone())
            .find_by_name(RoleName::Client)
            .await
            .unwrap()
            .unwrap();
        self.users
            .create(&CreateUser {
                first_name: "Yao".into(),
                last_name: "Kouassi".into(),
                pseudo: "verrou_yao".into(),
                email: "yao@verrou.test".into(),
                phone: None,
                password_hash: "hash".into(),
                role_id: role.id,
            })
            .await
            .unwrap()
            .id
    }

    async fn category(&self) -> Uuid {
        CategoryRepository::new(self.pool.clone())
            .create("Téléphones", "telephones", "uploads/categories/category_1.png")
            .await
            .unwrap()
            .id
    }

    fn put_file(&self, relative: &str) {
        let full = self.storage.path().join(relative);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, b"bytes").unwrap();
    }

    fn has_file(&self, relative: &str) -> bool {
        self.storage.path().join(relative).is_file()
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs DATABASE_URL"]
async fn deleting_a_user_removes_their_asset_files(pool: PgPool) {
    let fx = Fixture::new(pool).await;
    let user_id = fx.client().await;
    let category_id = fx.category().await;
    let image = "uploads/assets/images/asset_image_1.png";
    let invoice = "uploads/assets/invoices/asset_invoice_1.pdf";
    let picture = "uploads/profile/profile_1.png";
    for path in [image, invoice, picture] {
        fx.put_file(path);
    }
    fx.users.set_picture(user_id, picture).await.unwrap();
    AssetRepository::new(fx.pool.clone())
        .create_consuming_quota(&CreateAsset {
            data: json!({"modele": "Tecno Spark"}),
            images: vec![image.into()],
            invoices: vec![invoice.into()],
            category_id,
            user_id,
        })
        .await
        .unwrap();

    fx.service.delete_user(&fx.admin(), user_id).await.unwrap();

    assert!(fx.users.find_by_id(user_id).await.unwrap().is_none());
    for path in [image, invoice, picture] {
        assert!(!fx.has_file(path), "{path} was left on disk");
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs DATABASE_URL"]
async fn post_authors_are_refused_with_a_conflict(pool: PgPool) {
    let fx = Fixture::new(pool).await;
    let user_id = fx.client().await;
    let category_id = fx.category().await;
    PostRepository::new(fx.pool.clone())
        .create(&CreatePost {
            title: "Conseils".into(),
            slug: "conseils".into(),
            content: "Gravez vos vélos".into(),
            image: None,
            published: false,
            category_id,
            author_id: user_id,
        })
        .await
        .unwrap();

    let err = fx.service.delete_user(&fx.admin(), user_id).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(fx.users.find_by_id(user_id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs DATABASE_URL"]
async fn deleting_an_unknown_user_is_not_found(pool: PgPool) {
    let fx = Fixture::new(pool).await;

    let err = fx
        .service
        .delete_user(&fx.admin(), Uuid::new_v4())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
}
