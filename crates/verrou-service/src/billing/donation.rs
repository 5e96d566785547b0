//! Public donations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use verrou_core::error::AppError;
use verrou_core::types::{Page, PageQuery};
use verrou_database::repositories::DonationRepository;
use verrou_entity::donation::{CreateDonation, Donation};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDonationRequest {
    #[validate(range(exclusive_min = 0.0, message = "Amount must be positive"))]
    pub amount: f64,
    pub transaction_id: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub name: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct DonationService {
    donation_repo: Arc<DonationRepository>,
}

impl DonationService {
    pub fn new(donation_repo: Arc<DonationRepository>) -> Self {
        Self { donation_repo }
    }

    /// Records a donation; it counts as validated when a transaction id is given.
    pub async fn create(&self, req: CreateDonationRequest) -> Result<Donation, AppError> {
        let transaction_id = req
            .transaction_id
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let donation = self
            .donation_repo
            .create(&CreateDonation {
                amount: req.amount,
                transaction_id,
                email: req.email,
                phone: req.phone,
                name: req.name,
                user_id: req.user_id,
            })
            .await?;

        info!(
            donation_id = %donation.id,
            amount = donation.amount,
            validated = donation.status,
            "Donation recorded"
        );
        Ok(donation)
    }

    pub async fn list(&self, query: &PageQuery) -> Result<Page<Donation>, AppError> {
        self.donation_repo.list(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: f64) -> CreateDonationRequest {
        CreateDonationRequest {
            amount,
            transaction_id: None,
            email: None,
            phone: None,
            name: None,
            user_id: None,
        }
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(request(0.0).validate().is_err());
        assert!(request(-5.0).validate().is_err());
        assert!(request(1500.0).validate().is_ok());
    }

    #[test]
    fn email_is_checked_when_present() {
        let mut req = request(10.0);
        req.email = Some("not-an-email".into());
        assert!(req.validate().is_err());
    }
}
