use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use uuid::Uuid;

use super::BannerRepository;
use crate::core::error::{AppError, Result};
use crate::features::banners::models::{Banner, BannerFields, BannerFilter};

/// In-process store used by tests
#[derive(Default)]
pub struct InMemoryBannerRepository {
    banners: Mutex<Vec<Banner>>,
}

impl InMemoryBannerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Banner>>> {
        self.banners
            .lock()
            .map_err(|_| AppError::Internal("banner store lock poisoned".to_string()))
    }

    fn sorted(mut banners: Vec<Banner>) -> Vec<Banner> {
        banners.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then(a.created_at.cmp(&b.created_at))
        });
        banners
    }
}

#[async_trait]
impl BannerRepository for InMemoryBannerRepository {
    async fn insert(&self, fields: BannerFields) -> Result<Banner> {
        let now = Utc::now();
        let banner = Banner {
            id: Uuid::now_v7(),
            title: fields.title,
            subtitle: fields.subtitle,
            description: fields.description,
            image: fields.image,
            badge: fields.badge,
            link: fields.link,
            button_text: fields.button_text,
            features: fields.features,
            display_order: fields.display_order,
            is_active: fields.is_active,
            start_date: fields.start_date,
            end_date: fields.end_date,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.push(banner.clone());
        Ok(banner)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Banner>> {
        Ok(self.lock()?.iter().find(|b| b.id == id).cloned())
    }

    async fn update(&self, id: Uuid, fields: BannerFields) -> Result<Option<Banner>> {
        let mut banners = self.lock()?;
        let Some(banner) = banners.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };

        banner.title = fields.title;
        banner.subtitle = fields.subtitle;
        banner.description = fields.description;
        banner.image = fields.image;
        banner.badge = fields.badge;
        banner.link = fields.link;
        banner.button_text = fields.button_text;
        banner.features = fields.features;
        banner.display_order = fields.display_order;
        banner.is_active = fields.is_active;
        banner.start_date = fields.start_date;
        banner.end_date = fields.end_date;
        banner.updated_at = Utc::now();

        Ok(Some(banner.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut banners = self.lock()?;
        let before = banners.len();
        banners.retain(|b| b.id != id);
        Ok(banners.len() < before)
    }

    async fn list_visible(&self, now: DateTime<Utc>) -> Result<Vec<Banner>> {
        let visible = self
            .lock()?
            .iter()
            .filter(|b| b.is_visible_at(now))
            .cloned()
            .collect();
        Ok(Self::sorted(visible))
    }

    async fn list(&self, filter: &BannerFilter) -> Result<(Vec<Banner>, i64)> {
        let needle = filter.search.as_ref().map(|s| s.to_lowercase());
        let matching: Vec<Banner> = self
            .lock()?
            .iter()
            .filter(|b| filter.is_active.is_none_or(|active| b.is_active == active))
            .filter(|b| {
                needle
                    .as_ref()
                    .is_none_or(|n| b.title.to_lowercase().contains(n.as_str()))
            })
            .cloned()
            .collect();

        let total = matching.len() as i64;
        let page = Self::sorted(matching)
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }
}
