//! Public "I found this" reports on registered assets.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use verrou_core::error::AppError;
use verrou_database::repositories::{AssetRepository, SignalRepository, UserRepository};
use verrou_entity::signal::{CreateSignal, Signal};
use verrou_storage::{UploadPolicy, UploadedFile, Uploader};

use crate::context::RequestContext;
use crate::notification::NotificationService;

/// Parsed multipart body of a signal.
#[derive(Debug, Clone, Default)]
pub struct CreateSignalInput {
    pub asset_id: Option<Uuid>,
    pub place: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub date: String,
    pub heure: String,
    pub circonstance: Option<String>,
    pub status: Option<bool>,
    pub asset_images: Vec<UploadedFile>,
    pub place_images: Vec<UploadedFile>,
}

#[derive(Debug, Clone)]
pub struct SignalService {
    signal_repo: Arc<SignalRepository>,
    asset_repo: Arc<AssetRepository>,
    user_repo: Arc<UserRepository>,
    notifications: Arc<NotificationService>,
    uploader: Arc<Uploader>,
}

impl SignalService {
    pub fn new(
        signal_repo: Arc<SignalRepository>,
        asset_repo: Arc<AssetRepository>,
        user_repo: Arc<UserRepository>,
        notifications: Arc<NotificationService>,
        uploader: Arc<Uploader>,
    ) -> Self {
        Self {
            signal_repo,
            asset_repo,
            user_repo,
            notifications,
            uploader,
        }
    }

    /// Records a signal and notifies the asset owner.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateSignalInput,
    ) -> Result<Signal, AppError> {
        let asset_id = input
            .asset_id
            .ok_or_else(|| AppError::validation("asset_id is required"))?;
        for (field, value) in [
            ("place", &input.place),
            ("date", &input.date),
            ("heure", &input.heure),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{field} is required")));
            }
        }
        let latitude = parse_coordinate("latitude", input.latitude.as_deref())?;
        let longitude = parse_coordinate("longitude", input.longitude.as_deref())?;

        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let asset = self
            .asset_repo
            .find_by_id(asset_id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;

        let asset_images = self
            .uploader
            .store_all(&UploadPolicy::signal_asset(), &input.asset_images)
            .await?;
        let place_images = match self
            .uploader
            .store_all(&UploadPolicy::signal_place(), &input.place_images)
            .await
        {
            Ok(paths) => paths,
            Err(e) => {
                self.uploader.delete_all(&asset_images).await;
                return Err(e);
            }
        };

        let created = self
            .signal_repo
            .create(&CreateSignal {
                asset_id,
                user_id: ctx.user_id,
                place: input.place.trim().to_string(),
                latitude,
                longitude,
                date: input.date,
                heure: input.heure,
                circonstance: input.circonstance,
                status: input.status.unwrap_or(false),
                asset_images: asset_images.clone(),
                place_images: place_images.clone(),
            })
            .await;
        let signal = match created {
            Ok(signal) => signal,
            Err(e) => {
                self.uploader.delete_all(&asset_images).await;
                self.uploader.delete_all(&place_images).await;
                return Err(e);
            }
        };

        if let Some(owner) = self.user_repo.find_by_id(asset.user_id).await? {
            self.notifications
                .notify_owner(
                    &owner,
                    Some(asset.id),
                    "Asset reported",
                    &format!("Someone reported your asset near {}", signal.place),
                )
                .await?;
        }

        info!(
            user_id = %ctx.user_id,
            asset_id = %asset_id,
            signal_id = %signal.id,
            "Asset signalled"
        );
        Ok(signal)
    }
}

/// Parse an optional coordinate field; blank counts as absent.
pub fn parse_coordinate(field: &str, raw: Option<&str>) -> Result<Option<f64>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| AppError::validation(format!("{field} must be a number"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verrou_core::error::ErrorKind;

    #[test]
    fn coordinates_parse_as_floats() {
        assert_eq!(parse_coordinate("latitude", Some(" 5.3364 ")).unwrap(), Some(5.3364));
        assert_eq!(parse_coordinate("latitude", Some("")).unwrap(), None);
        assert_eq!(parse_coordinate("latitude", None).unwrap(), None);
    }

    #[test]
    fn garbage_coordinates_are_rejected() {
        let err = parse_coordinate("longitude", Some("abc")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("longitude"));
        assert!(parse_coordinate("longitude", Some("NaN")).is_err());
    }
}
