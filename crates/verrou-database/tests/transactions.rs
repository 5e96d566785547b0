//! Repository tests against a real PostgreSQL database.
//!
//! `#[sqlx::test]` creates a throwaway database per test from
//! `DATABASE_URL` and applies the workspace migrations. Run with
//! `cargo test -p verrou-database -- --ignored`.

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use verrou_core::error::ErrorKind;
use verrou_database::repositories::{
    AlerteRepository, AssetRepository, CategoryRepository, PostRepository, RoleRepository,
    SignalRepository, SubscriptionRepository, UserRepository,
};
use verrou_entity::alerte::CreateAlerte;
use verrou_entity::asset::{AssetStatus, CreateAsset};
use verrou_entity::post::CreatePost;
use verrou_entity::role::RoleName;
use verrou_entity::signal::CreateSignal;
use verrou_entity::user::CreateUser;

async fn create_client(pool: &PgPool, tag: &str) -> Uuid {
    let role = RoleRepository::new(pool.clone())
        .find_by_name(RoleName::Client)
        .await
        .unwrap()
        .expect("client role is seeded by migrations");
    UserRepository::new(pool.clone())
        .create(&CreateUser {
            first_name: "Awa".into(),
            last_name: "Kone".into(),
            pseudo: format!("verrou_{tag}"),
            email: format!("{tag}@verrou.test"),
            phone: None,
            password_hash: "hash".into(),
            role_id: role.id,
        })
        .await
        .unwrap()
        .id
}

async fn create_category(pool: &PgPool) -> Uuid {
    CategoryRepository::new(pool.clone())
        .create("Vélos", "velos", "uploads/categories/category_1.png")
        .await
        .unwrap()
        .id
}

async fn asset_remaining(pool: &PgPool, user_id: Uuid) -> i32 {
    sqlx::query_scalar("SELECT asset_remaining FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn count(pool: &PgPool, table: &str, user_id: Uuid) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE user_id = $1"))
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn new_asset(user_id: Uuid, category_id: Uuid) -> CreateAsset {
    CreateAsset {
        data: json!({"marque": "Peugeot"}),
        images: vec!["uploads/assets/images/asset_image_1.png".into()],
        invoices: vec![],
        category_id,
        user_id,
    }
}

fn theft_alerte(asset_id: Uuid, user_id: Uuid) -> CreateAlerte {
    CreateAlerte {
        asset_id,
        user_id,
        motif: "Vol".into(),
        circonstance: "Pris devant le marché".into(),
        date: "2025-01-10".into(),
        heure: "14:30".into(),
        place: "Adjamé".into(),
        plaint_number: None,
        status: false,
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs DATABASE_URL"]
async fn asset_creation_consumes_quota_until_exhausted(pool: PgPool) {
    let user_id = create_client(&pool, "quota").await;
    let category_id = create_category(&pool).await;
    let repo = AssetRepository::new(pool.clone());
    assert_eq!(asset_remaining(&pool, user_id).await, 1);

    let asset = repo
        .create_consuming_quota(&new_asset(user_id, category_id))
        .await
        .unwrap();
    assert_eq!(asset.status, AssetStatus::Available);
    assert_eq!(asset_remaining(&pool, user_id).await, 0);

    let err = repo
        .create_consuming_quota(&new_asset(user_id, category_id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);
    assert_eq!(count(&pool, "assets", user_id).await, 1);
    assert_eq!(asset_remaining(&pool, user_id).await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs DATABASE_URL"]
async fn failed_asset_insert_gives_the_quota_back(pool: PgPool) {
    let user_id = create_client(&pool, "rollback").await;
    let repo = AssetRepository::new(pool.clone());

    let result = repo
        .create_consuming_quota(&new_asset(user_id, Uuid::new_v4()))
        .await;

    assert!(result.is_err());
    assert_eq!(asset_remaining(&pool, user_id).await, 1);
    assert_eq!(count(&pool, "assets", user_id).await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs DATABASE_URL"]
async fn alerte_moves_asset_status(pool: PgPool) {
    let user_id = create_client(&pool, "alerte").await;
    let category_id = create_category(&pool).await;
    let assets = AssetRepository::new(pool.clone());
    let alertes = AlerteRepository::new(pool.clone());
    let asset = assets
        .create_consuming_quota(&new_asset(user_id, category_id))
        .await
        .unwrap();

    let alerte = alertes
        .create_with_status(&theft_alerte(asset.id, user_id), AssetStatus::Theft)
        .await
        .unwrap();
    assert_eq!(alerte.asset_id, asset.id);
    let stolen = assets.find_by_id(asset.id).await.unwrap().unwrap();
    assert_eq!(stolen.status, AssetStatus::Theft);
    assert!(stolen.retrouve_at.is_none());

    let mut found = theft_alerte(asset.id, user_id);
    found.motif = "Retrouvé".into();
    alertes
        .create_with_status(&found, AssetStatus::Retrouve)
        .await
        .unwrap();
    let recovered = assets.find_by_id(asset.id).await.unwrap().unwrap();
    assert_eq!(recovered.status, AssetStatus::Retrouve);
    assert!(recovered.retrouve_at.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs DATABASE_URL"]
async fn rejected_alerte_leaves_asset_status(pool: PgPool) {
    let user_id = create_client(&pool, "noalerte").await;
    let category_id = create_category(&pool).await;
    let assets = AssetRepository::new(pool.clone());
    let asset = assets
        .create_consuming_quota(&new_asset(user_id, category_id))
        .await
        .unwrap();

    let result = AlerteRepository::new(pool.clone())
        .create_with_status(&theft_alerte(asset.id, Uuid::new_v4()), AssetStatus::Theft)
        .await;

    assert!(result.is_err());
    let unchanged = assets.find_by_id(asset.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, AssetStatus::Available);
    assert_eq!(count(&pool, "alertes", user_id).await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs DATABASE_URL"]
async fn purchase_credits_the_tier(pool: PgPool) {
    let user_id = create_client(&pool, "buyer").await;
    let repo = SubscriptionRepository::new(pool.clone());
    let tier = repo.create(5, 5000.0).await.unwrap();

    let purchase = repo.purchase(user_id, &tier, "TX-001").await.unwrap();

    assert_eq!(purchase.subscription_id, tier.id);
    assert_eq!(asset_remaining(&pool, user_id).await, 6);
    assert_eq!(count(&pool, "user_subscriptions", user_id).await, 1);
    assert_eq!(repo.purchase_count(tier.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs DATABASE_URL"]
async fn failed_purchase_credits_nothing(pool: PgPool) {
    let user_id = create_client(&pool, "nobuy").await;
    let repo = SubscriptionRepository::new(pool.clone());
    let mut tier = repo.create(5, 5000.0).await.unwrap();
    tier.id = Uuid::new_v4();

    let result = repo.purchase(user_id, &tier, "TX-002").await;

    assert!(result.is_err());
    assert_eq!(asset_remaining(&pool, user_id).await, 1);
    assert_eq!(count(&pool, "user_subscriptions", user_id).await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs DATABASE_URL"]
async fn post_author_cannot_be_deleted(pool: PgPool) {
    let user_id = create_client(&pool, "author").await;
    let category_id = create_category(&pool).await;
    let posts = PostRepository::new(pool.clone());
    posts
        .create(&CreatePost {
            title: "Bienvenue".into(),
            slug: "bienvenue".into(),
            content: "Premier article".into(),
            image: None,
            published: true,
            category_id,
            author_id: user_id,
        })
        .await
        .unwrap();
    assert_eq!(posts.count_by_author(user_id).await.unwrap(), 1);

    let err = UserRepository::new(pool.clone())
        .delete(user_id)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs DATABASE_URL"]
async fn owned_upload_paths_cover_assets_and_signals(pool: PgPool) {
    let owner = create_client(&pool, "owner").await;
    let finder = create_client(&pool, "finder").await;
    let category_id = create_category(&pool).await;
    let mut data = new_asset(owner, category_id);
    data.invoices = vec!["uploads/assets/invoices/asset_invoice_1.pdf".into()];
    let asset = AssetRepository::new(pool.clone())
        .create_consuming_quota(&data)
        .await
        .unwrap();
    SignalRepository::new(pool.clone())
        .create(&CreateSignal {
            asset_id: asset.id,
            user_id: finder,
            place: "Cocody".into(),
            latitude: None,
            longitude: None,
            date: "2025-02-01".into(),
            heure: "09:00".into(),
            circonstance: None,
            status: false,
            asset_images: vec!["uploads/signals/assets/retrouveAssetImage_1.png".into()],
            place_images: vec!["uploads/signals/places/retrouvePlaceImage_1.png".into()],
        })
        .await
        .unwrap();
    let users = UserRepository::new(pool.clone());

    let mut owner_files = users.owned_upload_paths(owner).await.unwrap();
    owner_files.sort();
    assert_eq!(
        owner_files,
        vec![
            "uploads/assets/images/asset_image_1.png",
            "uploads/assets/invoices/asset_invoice_1.pdf",
            "uploads/signals/assets/retrouveAssetImage_1.png",
            "uploads/signals/places/retrouvePlaceImage_1.png",
        ]
    );

    let finder_files = users.owned_upload_paths(finder).await.unwrap();
    assert_eq!(finder_files.len(), 2);

    assert!(users.delete(owner).await.unwrap());
    assert_eq!(count(&pool, "assets", owner).await, 0);
    assert_eq!(count(&pool, "signals", finder).await, 0);
}
