//! Theft, loss and found reports raised by asset owners.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use verrou_core::error::AppError;
use verrou_core::types::{Page, PageQuery};
use verrou_database::repositories::{AlerteRepository, AssetRepository};
use verrou_entity::alerte::{Alerte, CreateAlerte, Motif};

use super::events::CatalogEvents;
use crate::context::RequestContext;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAlerteRequest {
    pub asset_id: Uuid,
    /// `vol`, `perte` or `trouve`; anything else puts the asset back to available.
    #[validate(length(min = 1, message = "Motif is required"))]
    pub motif: String,
    #[serde(default)]
    pub circonstance: String,
    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,
    #[validate(length(min = 1, message = "Hour is required"))]
    pub heure: String,
    #[validate(length(min = 1, message = "Place is required"))]
    pub place: String,
    pub plaint_number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AlerteService {
    alerte_repo: Arc<AlerteRepository>,
    asset_repo: Arc<AssetRepository>,
    events: Arc<CatalogEvents>,
}

impl AlerteService {
    pub fn new(
        alerte_repo: Arc<AlerteRepository>,
        asset_repo: Arc<AssetRepository>,
        events: Arc<CatalogEvents>,
    ) -> Self {
        Self {
            alerte_repo,
            asset_repo,
            events,
        }
    }

    /// Records an alerte and moves the asset to the matching status.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateAlerteRequest,
    ) -> Result<Alerte, AppError> {
        let asset = self
            .asset_repo
            .find_by_id(req.asset_id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;
        if !asset.is_owned_by(ctx.user_id) {
            return Err(AppError::forbidden("You do not own this asset"));
        }

        let motif = Motif::parse(&req.motif);
        let status = motif.asset_status();
        let alerte = self
            .alerte_repo
            .create_with_status(
                &CreateAlerte {
                    asset_id: asset.id,
                    user_id: ctx.user_id,
                    motif: motif.as_str().to_string(),
                    circonstance: req.circonstance,
                    date: req.date,
                    heure: req.heure,
                    place: req.place,
                    plaint_number: req.plaint_number,
                    status: motif.resolves_alert(),
                },
                status,
            )
            .await?;

        info!(
            user_id = %ctx.user_id,
            asset_id = %asset.id,
            motif = %motif.as_str(),
            status = %status,
            "Alerte raised"
        );
        self.events.assets_changed(asset.user_id).await;
        Ok(alerte)
    }

    pub async fn list(&self, query: &PageQuery) -> Result<Page<Alerte>, AppError> {
        self.alerte_repo.list(query).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Alerte, AppError> {
        self.alerte_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Alerte not found"))
    }

    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        if !self.alerte_repo.delete(id).await? {
            return Err(AppError::not_found("Alerte not found"));
        }
        info!(user_id = %ctx.user_id, alerte_id = %id, "Alerte deleted");
        Ok(())
    }
}
