use std::env;

use crate::modules::image_host::CloudinaryConfig;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5001/api";

/// Settings for the admin console and storefront clients
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base of the banner API, including the `/api` prefix
    pub api_base_url: String,
    pub image_host: CloudinaryConfig,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, String> {
        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        Ok(Self {
            api_base_url: normalize_base_url(&api_base_url)?,
            image_host: CloudinaryConfig::from_env(),
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(format!("API_BASE_URL must be an http(s) URL, got '{}'", raw));
    }
    Ok(trimmed.to_string())
}
