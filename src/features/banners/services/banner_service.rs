use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::banners::dtos::{BannerQueryParams, BannerRequestDto, BannerResponseDto};
use crate::features::banners::models::BannerFilter;
use crate::features::banners::repositories::BannerRepository;

/// Service for banner operations
pub struct BannerService {
    repository: Arc<dyn BannerRepository>,
}

impl BannerService {
    pub fn new(repository: Arc<dyn BannerRepository>) -> Self {
        Self { repository }
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("Banner with id {} not found", id))
    }

    /// Normalise and validate a request body; nothing is persisted on failure
    fn check(dto: BannerRequestDto) -> Result<BannerRequestDto> {
        let dto = dto.normalized();
        dto.validate_all()?;
        Ok(dto)
    }

    /// Create a new banner
    pub async fn create(&self, dto: BannerRequestDto) -> Result<BannerResponseDto> {
        let dto = Self::check(dto)?;

        let banner = self.repository.insert(dto.into_fields()).await?;
        info!(
            "Banner created: id={}, title={:?}, order={}",
            banner.id, banner.title, banner.display_order
        );

        Ok(banner.into())
    }

    /// Replace the editable fields of an existing banner
    pub async fn update(&self, id: Uuid, dto: BannerRequestDto) -> Result<BannerResponseDto> {
        let dto = Self::check(dto)?;

        let banner = self
            .repository
            .update(id, dto.into_fields())
            .await?
            .ok_or_else(|| Self::not_found(id))?;
        info!("Banner updated: id={}", banner.id);

        Ok(banner.into())
    }

    /// Get banner by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<BannerResponseDto> {
        self.repository
            .find_by_id(id)
            .await?
            .map(BannerResponseDto::from)
            .ok_or_else(|| Self::not_found(id))
    }

    /// Delete a banner; an unknown id is reported as not found
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(Self::not_found(id));
        }
        info!("Banner deleted: id={}", id);
        Ok(())
    }

    /// Banners currently eligible for the storefront carousel
    pub async fn list_public(&self) -> Result<Vec<BannerResponseDto>> {
        self.list_public_at(Utc::now()).await
    }

    pub async fn list_public_at(&self, now: DateTime<Utc>) -> Result<Vec<BannerResponseDto>> {
        let banners = self.repository.list_visible(now).await?;
        Ok(banners.into_iter().map(BannerResponseDto::from).collect())
    }

    /// List banners with pagination and filters (admin)
    pub async fn list(&self, params: &BannerQueryParams) -> Result<(Vec<BannerResponseDto>, i64)> {
        let filter = BannerFilter {
            is_active: params.is_active,
            search: params
                .search
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            limit: params.limit(),
            offset: params.offset(),
        };

        let (banners, total) = self.repository.list(&filter).await?;
        Ok((
            banners.into_iter().map(BannerResponseDto::from).collect(),
            total,
        ))
    }
}
