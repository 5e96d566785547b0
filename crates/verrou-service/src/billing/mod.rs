//! Donations and asset-quota subscriptions.

pub mod donation;
pub mod subscription;

pub use donation::{CreateDonationRequest, DonationService};
pub use subscription::{
    CreateSubscriptionRequest, PurchaseSubscriptionRequest, SubscriptionService,
    UpdateSubscriptionRequest,
};
