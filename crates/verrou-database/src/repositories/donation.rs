//! Donation repository implementation.

use sqlx::PgPool;

use verrou_core::result::AppResult;
use verrou_core::types::{Filter, Page, PageQuery};
use verrou_entity::donation::{CreateDonation, Donation};

use crate::error::db_err;
use crate::paginate::{ListSpec, paginate};

const LIST: ListSpec = ListSpec {
    from: "donations",
    select: "*",
    search: &["email", "name", "phone", "transaction_id"],
    sortable: &[("created_at", "created_at"), ("amount", "amount"), ("status", "status")],
};

/// Repository for donations.
#[derive(Debug, Clone)]
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    /// Create a new donation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a donation; it is validated when a transaction id is present.
    pub async fn create(&self, data: &CreateDonation) -> AppResult<Donation> {
        sqlx::query_as::<_, Donation>(
            "INSERT INTO donations (amount, transaction_id, email, phone, name, status, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.amount)
        .bind(&data.transaction_id)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.name)
        .bind(data.transaction_id.is_some())
        .bind(data.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create donation"))
    }

    /// Paginated listing.
    pub async fn list(&self, query: &PageQuery) -> AppResult<Page<Donation>> {
        paginate(&self.pool, &LIST, &Filter::new(), query).await
    }
}
