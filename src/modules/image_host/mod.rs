//! External image hosting.
//!
//! Banner images are never stored by this system; the admin console uploads
//! the raw bytes to the host and keeps only the returned URL.

mod cloudinary_client;
mod local_image;

pub use cloudinary_client::{CloudinaryClient, CloudinaryConfig};
pub use local_image::LocalImage;

use async_trait::async_trait;
use thiserror::Error;

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Durable https URL to store on the banner
    pub secure_url: String,
    /// Host-side identifier, used to reconcile orphaned uploads
    pub public_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum ImageHostError {
    #[error("Missing image host configuration: {0}")]
    MissingConfig(&'static str),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Image upload failed: {0}")]
    Network(String),

    #[error("Unexpected image host response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, image: &LocalImage) -> Result<UploadedImage, ImageHostError>;
}
