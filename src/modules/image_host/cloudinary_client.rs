//! Cloudinary unsigned uploads.
//!
//! An unsigned upload posts the raw file together with the name of an upload
//! preset configured on the Cloudinary account; no API secret is involved, so
//! this client is safe to run on the admin's side.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::env;
use tracing::{debug, info, warn};

use super::{ImageHost, ImageHostError, LocalImage, UploadedImage};

const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com";

/// Public (client-visible) Cloudinary settings
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: Option<String>,
    pub upload_preset: Option<String>,
    /// API origin, overridable for tests and proxies
    pub base_url: String,
}

impl CloudinaryConfig {
    pub fn from_env() -> Self {
        let read = |key: &str| env::var(key).ok().filter(|s| !s.is_empty());

        Self {
            cloud_name: read("CLOUDINARY_CLOUD_NAME"),
            upload_preset: read("CLOUDINARY_UPLOAD_PRESET"),
            base_url: read("CLOUDINARY_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

pub struct CloudinaryClient {
    config: CloudinaryConfig,
    http_client: reqwest::Client,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn upload_url(&self, cloud_name: &str) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(cloud_name)
        )
    }
}

#[async_trait]
impl ImageHost for CloudinaryClient {
    async fn upload(&self, image: &LocalImage) -> Result<UploadedImage, ImageHostError> {
        let cloud_name = self
            .config
            .cloud_name
            .as_deref()
            .ok_or(ImageHostError::MissingConfig("CLOUDINARY_CLOUD_NAME"))?;
        let upload_preset = self
            .config
            .upload_preset
            .as_deref()
            .ok_or(ImageHostError::MissingConfig("CLOUDINARY_UPLOAD_PRESET"))?;

        let file = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|e| ImageHostError::InvalidResponse(format!("Invalid content type: {}", e)))?;

        let form = Form::new()
            .part("file", file)
            .text("upload_preset", upload_preset.to_string());

        let url = self.upload_url(cloud_name);
        debug!(
            "Uploading {} ({} bytes) to {}",
            image.file_name,
            image.bytes.len(),
            url
        );

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Image upload request failed: {}", e);
                ImageHostError::Network(e.to_string())
            })?;

        let status = response.status();
        let body = response.json::<UploadResponse>().await;

        if !status.is_success() {
            let message = body
                .ok()
                .and_then(|b| b.error)
                .map(|e| e.message)
                .unwrap_or_else(|| "Cloudinary upload failed".to_string());
            warn!("Image host rejected upload ({}): {}", status, message);
            return Err(ImageHostError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = body.map_err(|e| ImageHostError::InvalidResponse(e.to_string()))?;
        let secure_url = body
            .secure_url
            .ok_or_else(|| ImageHostError::InvalidResponse("missing secure_url".to_string()))?;

        info!("Image uploaded: {}", secure_url);

        Ok(UploadedImage {
            secure_url,
            public_id: body.public_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Multipart, Path},
        http::StatusCode,
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};

    /// Minimal stand-in for the upload endpoint: accepts preset "banners" only
    async fn fake_upload(
        Path(cloud): Path<String>,
        mut multipart: Multipart,
    ) -> (StatusCode, Json<Value>) {
        let mut preset = None;
        let mut file_len = 0;
        while let Ok(Some(field)) = multipart.next_field().await {
            match field.name().unwrap_or_default() {
                "upload_preset" => preset = field.text().await.ok(),
                "file" => file_len = field.bytes().await.map(|b| b.len()).unwrap_or(0),
                _ => {}
            }
        }

        if preset.as_deref() != Some("banners") || file_len == 0 {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": { "message": "Upload preset must be whitelisted for unsigned uploads" } })),
            );
        }

        (
            StatusCode::OK,
            Json(json!({
                "public_id": "banners/abc123",
                "secure_url": format!("https://res.cloudinary.com/{}/image/upload/v1/banners/abc123.png", cloud),
            })),
        )
    }

    async fn spawn_fake_host() -> String {
        let app = Router::new().route("/v1_1/{cloud}/image/upload", post(fake_upload));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String, preset: Option<&str>) -> CloudinaryClient {
        CloudinaryClient::new(CloudinaryConfig {
            cloud_name: Some("demo".to_string()),
            upload_preset: preset.map(String::from),
            base_url,
        })
    }

    #[tokio::test]
    async fn test_upload_returns_secure_url() {
        let base_url = spawn_fake_host().await;
        let image = LocalImage::new("hero.png", vec![0x89, 0x50, 0x4e, 0x47]);

        let uploaded = client(base_url, Some("banners"))
            .upload(&image)
            .await
            .unwrap();

        assert_eq!(
            uploaded.secure_url,
            "https://res.cloudinary.com/demo/image/upload/v1/banners/abc123.png"
        );
        assert_eq!(uploaded.public_id.as_deref(), Some("banners/abc123"));
    }

    #[tokio::test]
    async fn test_rejected_upload_carries_host_message() {
        let base_url = spawn_fake_host().await;
        let image = LocalImage::new("hero.png", vec![1, 2, 3]);

        let err = client(base_url, Some("signed-only"))
            .upload(&image)
            .await
            .unwrap_err();

        match err {
            ImageHostError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("whitelisted"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_preset_fails_before_any_request() {
        // Nothing listens here; a request attempt would surface as Network
        let image = LocalImage::new("hero.png", vec![1]);
        let err = client("http://127.0.0.1:9".to_string(), None)
            .upload(&image)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ImageHostError::MissingConfig("CLOUDINARY_UPLOAD_PRESET")
        ));
    }
}
