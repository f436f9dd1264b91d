//! In-process fakes for the banner API and the image host.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::api::BannerApi;
use super::error::ClientError;
use crate::features::banners::dtos::{BannerRequestDto, BannerResponseDto};
use crate::modules::image_host::{ImageHost, ImageHostError, LocalImage, UploadedImage};

pub fn banner(title: &str, order: i32) -> BannerResponseDto {
    let now = Utc::now();
    BannerResponseDto {
        id: Uuid::now_v7(),
        title: title.to_string(),
        subtitle: None,
        description: None,
        image: format!("https://cdn.example.com/{}.png", order),
        badge: None,
        link: None,
        button_text: None,
        features: Vec::new(),
        order,
        is_active: true,
        start_date: None,
        end_date: None,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub struct FakeBannerApi {
    banners: Mutex<Vec<BannerResponseDto>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub last_request: Mutex<Option<BannerRequestDto>>,
}

impl FakeBannerApi {
    pub fn with_banners(banners: Vec<BannerResponseDto>) -> Self {
        Self {
            banners: Mutex::new(banners),
            ..Default::default()
        }
    }

    pub fn stored(&self) -> Vec<BannerResponseDto> {
        self.banners.lock().unwrap().clone()
    }

    fn read(&self) -> Result<(), ClientError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        Ok(())
    }

    fn write(&self, body: &BannerRequestDto) -> Result<(), ClientError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(body.clone());
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 500,
                message: "Internal server error".to_string(),
            });
        }
        Ok(())
    }
}

fn apply(target: &mut BannerResponseDto, body: &BannerRequestDto) {
    target.title = body.title.clone();
    target.subtitle = body.subtitle.clone();
    target.description = body.description.clone();
    target.image = body.image.clone();
    target.badge = body.badge.clone();
    target.link = body.link.clone();
    target.button_text = body.button_text.clone();
    target.features = body.features.clone();
    target.order = body.order;
    target.is_active = body.is_active;
    target.start_date = body.start_date;
    target.end_date = body.end_date;
    target.updated_at = Utc::now();
}

#[async_trait]
impl BannerApi for FakeBannerApi {
    async fn list_public_banners(&self) -> Result<Vec<BannerResponseDto>, ClientError> {
        self.read()?;
        Ok(self.stored())
    }

    async fn get_banner(&self, id: Uuid) -> Result<BannerResponseDto, ClientError> {
        self.read()?;
        self.stored()
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("Banner with id {} not found", id)))
    }

    async fn create_banner(
        &self,
        body: &BannerRequestDto,
    ) -> Result<BannerResponseDto, ClientError> {
        self.write(body)?;
        let mut created = banner(&body.title, body.order);
        apply(&mut created, body);
        self.banners.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_banner(
        &self,
        id: Uuid,
        body: &BannerRequestDto,
    ) -> Result<BannerResponseDto, ClientError> {
        self.write(body)?;
        let mut banners = self.banners.lock().unwrap();
        let target = banners
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("Banner with id {} not found", id)))?;
        apply(target, body);
        Ok(target.clone())
    }

    async fn delete_banner(&self, id: Uuid) -> Result<(), ClientError> {
        self.banners.lock().unwrap().retain(|b| b.id != id);
        Ok(())
    }
}

pub struct FakeImageHost {
    outcome: Result<String, String>,
    pub uploads: AtomicUsize,
}

impl FakeImageHost {
    pub fn accepting(secure_url: &str) -> Self {
        Self {
            outcome: Ok(secure_url.to_string()),
            uploads: AtomicUsize::new(0),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            uploads: AtomicUsize::new(0),
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(&self, _image: &LocalImage) -> Result<UploadedImage, ImageHostError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(url) => Ok(UploadedImage {
                secure_url: url.clone(),
                public_id: Some("banners/fake".to_string()),
            }),
            Err(message) => Err(ImageHostError::Rejected {
                status: 400,
                message: message.clone(),
            }),
        }
    }
}
