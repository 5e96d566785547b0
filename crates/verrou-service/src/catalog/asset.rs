//! Asset registration, owner edits, staff verification and search.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use verrou_core::error::AppError;
use verrou_core::types::{Filter, FilterValue, Page, PageQuery};
use verrou_database::repositories::{
    AlerteRepository, AssetRepository, CategoryRepository, UserRepository,
};
use verrou_entity::alerte::Alerte;
use verrou_entity::asset::{Asset, AssetCounts, AssetStatus, AssetView, CreateAsset};
use verrou_storage::{UploadPolicy, UploadedFile, Uploader};

use super::events::CatalogEvents;
use crate::context::RequestContext;
use crate::notification::NotificationService;

/// Maximum number of photos attached to an asset.
pub const MAX_IMAGES: usize = 10;
/// Maximum number of invoices attached to an asset.
pub const MAX_INVOICES: usize = 5;

/// Parsed multipart body of an asset creation.
#[derive(Debug, Clone)]
pub struct CreateAssetInput {
    /// Free-form description; must be a JSON object.
    pub data: serde_json::Value,
    pub category_id: Uuid,
    pub images: Vec<UploadedFile>,
    pub invoices: Vec<UploadedFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAssetRequest {
    pub data: Option<serde_json::Value>,
    pub category_id: Option<Uuid>,
}

/// Status filter of the owner's asset list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetFilter {
    #[default]
    All,
    /// THEFT or LOST.
    Alerted,
    /// RETROUVE.
    Retrouved,
}

impl AssetFilter {
    pub fn statuses(&self) -> Option<&'static [AssetStatus]> {
        match self {
            Self::All => None,
            Self::Alerted => Some(&AssetStatus::ALERTED),
            Self::Retrouved => Some(&[AssetStatus::Retrouve]),
        }
    }
}

/// The owner's assets plus their counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAssets {
    pub assets: Vec<AssetView>,
    #[serde(flatten)]
    pub counts: AssetCounts,
}

/// One asset with its alert history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub asset: AssetView,
    pub alertes: Vec<Alerte>,
}

/// Handles the asset lifecycle.
#[derive(Debug, Clone)]
pub struct AssetService {
    asset_repo: Arc<AssetRepository>,
    user_repo: Arc<UserRepository>,
    category_repo: Arc<CategoryRepository>,
    alerte_repo: Arc<AlerteRepository>,
    notifications: Arc<NotificationService>,
    uploader: Arc<Uploader>,
    events: Arc<CatalogEvents>,
}

impl AssetService {
    pub fn new(
        asset_repo: Arc<AssetRepository>,
        user_repo: Arc<UserRepository>,
        category_repo: Arc<CategoryRepository>,
        alerte_repo: Arc<AlerteRepository>,
        notifications: Arc<NotificationService>,
        uploader: Arc<Uploader>,
        events: Arc<CatalogEvents>,
    ) -> Self {
        Self {
            asset_repo,
            user_repo,
            category_repo,
            alerte_repo,
            notifications,
            uploader,
            events,
        }
    }

    /// Registers an asset and consumes one unit of the caller's quota.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateAssetInput,
    ) -> Result<Asset, AppError> {
        if !input.data.is_object() {
            return Err(AppError::validation("data must be a JSON object"));
        }
        check_count("images", input.images.len(), MAX_IMAGES)?;
        check_count("invoices", input.invoices.len(), MAX_INVOICES)?;

        let user = self
            .user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        if !user.has_asset_quota() {
            return Err(AppError::bad_request("Maximum number of assets reached"));
        }
        self.ensure_category(input.category_id).await?;

        let images = self
            .uploader
            .store_all(&UploadPolicy::asset_image(), &input.images)
            .await?;
        let invoices = match self
            .uploader
            .store_all(&UploadPolicy::asset_invoice(), &input.invoices)
            .await
        {
            Ok(paths) => paths,
            Err(e) => {
                self.uploader.delete_all(&images).await;
                return Err(e);
            }
        };

        let created = self
            .asset_repo
            .create_consuming_quota(&CreateAsset {
                data: input.data,
                images: images.clone(),
                invoices: invoices.clone(),
                category_id: input.category_id,
                user_id: ctx.user_id,
            })
            .await;
        let asset = match created {
            Ok(asset) => asset,
            Err(e) => {
                self.uploader.delete_all(&images).await;
                self.uploader.delete_all(&invoices).await;
                return Err(e);
            }
        };

        info!(
            user_id = %ctx.user_id,
            asset_id = %asset.id,
            images = asset.images.len(),
            invoices = asset.invoices.len(),
            "Asset registered"
        );
        self.events.assets_changed(ctx.user_id).await;
        Ok(asset)
    }

    /// Every asset, for the back office.
    pub async fn list(&self, query: &PageQuery) -> Result<Page<AssetView>, AppError> {
        self.asset_repo.list(&Filter::new(), query).await
    }

    /// Assets of one category.
    pub async fn list_by_category(
        &self,
        category_id: Uuid,
        query: &PageQuery,
    ) -> Result<Page<AssetView>, AppError> {
        let filter = Filter::new().eq("a.category_id", FilterValue::Uuid(category_id));
        self.asset_repo.list(&filter, query).await
    }

    /// The caller's assets of one category.
    pub async fn list_own_by_category(
        &self,
        ctx: &RequestContext,
        category_id: Uuid,
        query: &PageQuery,
    ) -> Result<Page<AssetView>, AppError> {
        let filter = Filter::new()
            .eq("a.user_id", FilterValue::Uuid(ctx.user_id))
            .eq("a.category_id", FilterValue::Uuid(category_id));
        self.asset_repo.list(&filter, query).await
    }

    /// The caller's assets with their counters.
    pub async fn list_for_user(
        &self,
        ctx: &RequestContext,
        filter: AssetFilter,
        search_key: Option<&str>,
    ) -> Result<UserAssets, AppError> {
        let search_key = search_key.map(str::trim).filter(|s| !s.is_empty());
        let assets = self
            .asset_repo
            .list_for_user(ctx.user_id, filter.statuses(), search_key)
            .await?;
        let counts = self.asset_repo.counts(Some(ctx.user_id)).await?;
        Ok(UserAssets { assets, counts })
    }

    /// One asset with its category, owner and alertes.
    pub async fn get(&self, id: Uuid) -> Result<AssetDetail, AppError> {
        let asset = self
            .asset_repo
            .find_view(id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;
        let alertes = self.alerte_repo.find_by_asset(id).await?;
        Ok(AssetDetail { asset, alertes })
    }

    /// Public search over the asset description.
    pub async fn search(&self, key: &str) -> Result<Vec<AssetView>, AppError> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(Vec::new());
        }
        self.asset_repo.search(key).await
    }

    /// Owner edit of the description or category; verification is reset.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateAssetRequest,
    ) -> Result<Asset, AppError> {
        self.owned(ctx, id).await?;
        if let Some(data) = &req.data {
            if !data.is_object() {
                return Err(AppError::validation("data must be a JSON object"));
            }
        }
        if let Some(category_id) = req.category_id {
            self.ensure_category(category_id).await?;
        }

        let asset = self
            .asset_repo
            .update_details(id, req.data.as_ref(), req.category_id)
            .await?;

        info!(user_id = %ctx.user_id, asset_id = %id, "Asset updated");
        self.events.assets_changed(asset.user_id).await;
        Ok(asset)
    }

    /// Replaces the photo list with `existing` plus the new uploads.
    pub async fn update_images(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        existing: Vec<String>,
        files: Vec<UploadedFile>,
    ) -> Result<Asset, AppError> {
        let asset = self.owned(ctx, id).await?;
        let (kept, removed) = retain_known(&asset.images, existing);
        check_count("images", kept.len() + files.len(), MAX_IMAGES)?;

        let added = self
            .uploader
            .store_all(&UploadPolicy::asset_image(), &files)
            .await?;
        let images: Vec<String> = kept.into_iter().chain(added.iter().cloned()).collect();

        let updated = match self.asset_repo.set_images(id, &images).await {
            Ok(updated) => updated,
            Err(e) => {
                self.uploader.delete_all(&added).await;
                return Err(e);
            }
        };
        self.uploader.delete_all(&removed).await;

        info!(
            user_id = %ctx.user_id,
            asset_id = %id,
            added = added.len(),
            removed = removed.len(),
            "Asset images replaced"
        );
        self.events.assets_changed(updated.user_id).await;
        Ok(updated)
    }

    /// Replaces the invoice list with `existing` plus the new PDFs.
    pub async fn update_invoices(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        existing: Vec<String>,
        files: Vec<UploadedFile>,
    ) -> Result<Asset, AppError> {
        let asset = self.owned(ctx, id).await?;
        let (kept, removed) = retain_known(&asset.invoices, existing);
        check_count("invoices", kept.len() + files.len(), MAX_INVOICES)?;

        let added = self
            .uploader
            .store_all(&UploadPolicy::asset_invoice(), &files)
            .await?;
        let invoices: Vec<String> = kept.into_iter().chain(added.iter().cloned()).collect();

        let updated = match self.asset_repo.set_invoices(id, &invoices).await {
            Ok(updated) => updated,
            Err(e) => {
                self.uploader.delete_all(&added).await;
                return Err(e);
            }
        };
        self.uploader.delete_all(&removed).await;

        info!(user_id = %ctx.user_id, asset_id = %id, "Asset invoices replaced");
        self.events.assets_changed(updated.user_id).await;
        Ok(updated)
    }

    /// Staff toggle of the verification flag; the owner is notified.
    pub async fn toggle_verified(&self, ctx: &RequestContext, id: Uuid) -> Result<Asset, AppError> {
        let asset = self
            .asset_repo
            .toggle_verified(id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;

        let message = if asset.is_verified {
            "Your asset has been validated"
        } else {
            "Your asset has been rejected"
        };
        if let Some(owner) = self.user_repo.find_by_id(asset.user_id).await? {
            self.notifications
                .notify_owner(&owner, Some(asset.id), "Asset status updated", message)
                .await?;
        }

        info!(
            user_id = %ctx.user_id,
            asset_id = %id,
            verified = asset.is_verified,
            "Asset verification toggled"
        );
        self.events.assets_changed(asset.user_id).await;
        Ok(asset)
    }

    /// Owner deletion; attached files are removed afterwards.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let asset = self.owned(ctx, id).await?;
        if !self.asset_repo.delete(id).await? {
            return Err(AppError::not_found("Asset not found"));
        }
        self.uploader.delete_all(&asset.images).await;
        self.uploader.delete_all(&asset.invoices).await;

        info!(user_id = %ctx.user_id, asset_id = %id, "Asset deleted");
        self.events.assets_changed(asset.user_id).await;
        Ok(())
    }

    async fn owned(&self, ctx: &RequestContext, id: Uuid) -> Result<Asset, AppError> {
        let asset = self
            .asset_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;
        if !asset.is_owned_by(ctx.user_id) {
            return Err(AppError::forbidden("You do not own this asset"));
        }
        Ok(asset)
    }

    async fn ensure_category(&self, category_id: Uuid) -> Result<(), AppError> {
        match self.category_repo.find_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::bad_request("Category not found")),
        }
    }
}

fn check_count(field: &str, count: usize, max: usize) -> Result<(), AppError> {
    if count > max {
        return Err(AppError::validation(format!(
            "At most {max} {field} are allowed"
        )));
    }
    Ok(())
}

/// Split `current` into the entries the client kept and the ones it dropped.
///
/// Paths the asset does not already reference are ignored.
fn retain_known(current: &[String], requested: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut kept = Vec::new();
    for path in requested {
        if current.contains(&path) && !kept.contains(&path) {
            kept.push(path);
        }
    }
    let removed = current
        .iter()
        .filter(|p| !kept.contains(p))
        .cloned()
        .collect();
    (kept, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verrou_core::error::ErrorKind;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn filter_maps_to_statuses() {
        assert_eq!(AssetFilter::All.statuses(), None);
        assert_eq!(
            AssetFilter::Alerted.statuses(),
            Some(&[AssetStatus::Theft, AssetStatus::Lost][..])
        );
        assert_eq!(
            AssetFilter::Retrouved.statuses(),
            Some(&[AssetStatus::Retrouve][..])
        );
    }

    #[test]
    fn filter_parses_from_query_value() {
        let f: AssetFilter = serde_json::from_str("\"retrouved\"").unwrap();
        assert_eq!(f, AssetFilter::Retrouved);
    }

    #[test]
    fn unknown_paths_are_not_adopted() {
        let current = paths(&["uploads/a.png", "uploads/b.png"]);
        let (kept, removed) = retain_known(
            &current,
            paths(&["uploads/b.png", "uploads/../../etc/passwd", "uploads/b.png"]),
        );
        assert_eq!(kept, paths(&["uploads/b.png"]));
        assert_eq!(removed, paths(&["uploads/a.png"]));
    }

    #[test]
    fn file_limits_are_enforced() {
        assert!(check_count("images", MAX_IMAGES, MAX_IMAGES).is_ok());
        let err = check_count("invoices", MAX_INVOICES + 1, MAX_INVOICES).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
