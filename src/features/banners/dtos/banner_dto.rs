use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::features::banners::models::{Banner, BannerFields};
use crate::shared::types::{clamp_page, clamp_page_size, default_page, default_page_size};
use crate::shared::validation::{
    is_valid_window, parse_date_input, END_BEFORE_START_MESSAGE, IMAGE_URL_REGEX, LINK_REGEX,
};

const MAX_FEATURE_LENGTH: usize = 100;

fn default_true() -> bool {
    true
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("Title is required".into()));
    }
    Ok(())
}

fn validate_features(features: &[String]) -> Result<(), ValidationError> {
    if features.iter().any(|f| f.chars().count() > MAX_FEATURE_LENGTH) {
        return Err(ValidationError::new("length")
            .with_message(format!("Each feature must be at most {} characters", MAX_FEATURE_LENGTH).into()));
    }
    Ok(())
}

fn validate_image(image: &str) -> Result<(), ValidationError> {
    if image.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("Image is required".into()));
    }
    if !IMAGE_URL_REGEX.is_match(image) {
        return Err(ValidationError::new("url")
            .with_message("Image must be an absolute http(s) URL".into()));
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD`, RFC 3339, `null` or an empty string
fn deserialize_date_input<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => parse_date_input(&value).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Request body for creating or replacing a banner
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BannerRequestDto {
    #[validate(
        custom(function = "validate_title"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "Subtitle must be at most 200 characters"))]
    pub subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    /// URL of the image on the external host
    #[serde(default)]
    #[validate(custom(function = "validate_image"))]
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50, message = "Badge must be at most 50 characters"))]
    pub badge: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(
        path = *LINK_REGEX,
        message = "Link must be a site path (\"/products/...\") or an http(s) URL"
    ))]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50, message = "Button text must be at most 50 characters"))]
    pub button_text: Option<String>,

    /// Short selling points listed on the slide
    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 features"), custom(function = "validate_features"))]
    pub features: Vec<String>,

    /// Lower numbers are shown first
    #[serde(default)]
    pub order: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_date_input"
    )]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_date_input"
    )]
    pub end_date: Option<DateTime<Utc>>,
}

impl BannerRequestDto {
    /// Trim text and turn blank optional fields into `None`
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            subtitle: blank_to_none(self.subtitle),
            description: blank_to_none(self.description),
            image: self.image.trim().to_string(),
            badge: blank_to_none(self.badge),
            link: blank_to_none(self.link),
            button_text: blank_to_none(self.button_text),
            features: self
                .features
                .into_iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            ..self
        }
    }

    /// Field rules plus the cross-field date window rule, reported on `end_date`
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if !is_valid_window(self.start_date, self.end_date) {
            errors.add(
                "end_date",
                ValidationError::new("date_order").with_message(END_BEFORE_START_MESSAGE.into()),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn into_fields(self) -> BannerFields {
        BannerFields {
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            image: self.image,
            badge: self.badge,
            link: self.link,
            button_text: self.button_text,
            features: self.features,
            display_order: self.order,
            is_active: self.is_active,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Banner as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BannerResponseDto {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub order: i32,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Banner> for BannerResponseDto {
    fn from(b: Banner) -> Self {
        Self {
            id: b.id,
            title: b.title,
            subtitle: b.subtitle,
            description: b.description,
            image: b.image,
            badge: b.badge,
            link: b.link,
            button_text: b.button_text,
            features: b.features,
            order: b.display_order,
            is_active: b.is_active,
            start_date: b.start_date,
            end_date: b.end_date,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

// Query params for the admin listing
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BannerQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Case-insensitive match on title
    pub search: Option<String>,

    /// Filter by active status (none = all)
    pub is_active: Option<bool>,
}

impl Default for BannerQueryParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            search: None,
            is_active: None,
        }
    }
}

impl BannerQueryParams {
    pub fn page(&self) -> i64 {
        clamp_page(self.page)
    }

    pub fn limit(&self) -> i64 {
        clamp_page_size(self.page_size)
    }

    /// Saturates instead of overflowing on absurd page numbers
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}
