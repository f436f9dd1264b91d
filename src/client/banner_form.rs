//! Create/edit form for a single banner in the admin console.
//!
//! The form owns a text-level draft of the banner. Submitting validates the
//! draft locally, uploads a pending image file to the image host, then saves
//! the banner through the API. The draft survives every failure so the admin
//! can correct it and resubmit.

use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::api::BannerApi;
use super::error::{ClientError, FieldErrors};
use super::upload_ledger::UploadLedger;
use crate::features::banners::dtos::{BannerRequestDto, BannerResponseDto};
use crate::modules::image_host::{ImageHost, LocalImage};
use crate::shared::validation::{
    format_date_input, is_valid_window, parse_date_input, END_BEFORE_START_MESSAGE,
};
use validator::Validate;

pub const BANNER_LIST_ROUTE: &str = "/admin/banners";

/// Where the console should go after a form action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    BannerList,
}

impl Navigation {
    pub fn path(&self) -> &'static str {
        match self {
            Navigation::BannerList => BANNER_LIST_ROUTE,
        }
    }
}

/// Image currently attached to the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Already hosted
    Url(String),
    /// Picked locally, uploaded on submit
    Pending(LocalImage),
}

/// Banner fields as typed into the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerDraft {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image: Option<ImageSource>,
    pub badge: String,
    pub link: String,
    pub button_text: String,
    pub features: Vec<String>,
    pub order: String,
    pub is_active: bool,
    pub start_date: String,
    pub end_date: String,
}

impl Default for BannerDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            description: String::new(),
            image: None,
            badge: String::new(),
            link: String::new(),
            button_text: String::new(),
            features: Vec::new(),
            order: "0".to_string(),
            is_active: true,
            start_date: String::new(),
            end_date: String::new(),
        }
    }
}

/// Stand-in URL so a not-yet-uploaded file passes the hosted-URL rule
const PENDING_IMAGE_URL: &str = "https://upload.pending/image";

/// Leading integer of `text`, 0 when there is none ("2abc" is 2, "3.5" is 3)
fn parse_order(text: &str) -> i32 {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i32>().map(|n| sign * n).unwrap_or(0)
}

/// Form key for a request field reported by the request validator
fn form_key(field: &str) -> Option<&'static str> {
    match field {
        "title" => Some("title"),
        "subtitle" => Some("subtitle"),
        "description" => Some("description"),
        "image" => Some("image"),
        "badge" => Some("badge"),
        "link" => Some("link"),
        "button_text" => Some("buttonText"),
        "features" => Some("features"),
        _ => None,
    }
}

fn optional(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

impl BannerDraft {
    pub fn from_banner(banner: &BannerResponseDto) -> Self {
        Self {
            title: banner.title.clone(),
            subtitle: banner.subtitle.clone().unwrap_or_default(),
            description: banner.description.clone().unwrap_or_default(),
            image: Some(ImageSource::Url(banner.image.clone())),
            badge: banner.badge.clone().unwrap_or_default(),
            link: banner.link.clone().unwrap_or_default(),
            button_text: banner.button_text.clone().unwrap_or_default(),
            features: banner.features.clone(),
            order: banner.order.to_string(),
            is_active: banner.is_active,
            start_date: format_date_input(banner.start_date),
            end_date: format_date_input(banner.end_date),
        }
    }

    /// Applies the same field rules the API enforces, plus date parsing
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let image_url = match &self.image {
            Some(ImageSource::Url(url)) => url.trim().to_string(),
            Some(ImageSource::Pending(_)) => PENDING_IMAGE_URL.to_string(),
            None => String::new(),
        };
        if let Err(field_errors) = self.to_request(image_url).normalized().validate() {
            for (field, errs) in field_errors.field_errors() {
                let (Some(key), Some(first)) = (form_key(&field), errs.first()) else {
                    continue;
                };
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                errors.insert(key, message);
            }
        }

        let start = parse_date_input(&self.start_date);
        let end = parse_date_input(&self.end_date);
        match (start, end) {
            (Ok(start), Ok(end)) => {
                if !is_valid_window(start, end) {
                    errors.insert("endDate", END_BEFORE_START_MESSAGE);
                }
            }
            (start, end) => {
                if let Err(e) = start {
                    errors.insert("startDate", e);
                }
                if let Err(e) = end {
                    errors.insert("endDate", e);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Request body for a validated draft whose image is hosted at `image_url`
    pub fn to_request(&self, image_url: String) -> BannerRequestDto {
        BannerRequestDto {
            title: self.title.trim().to_string(),
            subtitle: optional(&self.subtitle),
            description: optional(&self.description),
            image: image_url,
            badge: optional(&self.badge),
            link: optional(&self.link),
            button_text: optional(&self.button_text),
            features: self
                .features
                .iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            order: parse_order(&self.order),
            is_active: self.is_active,
            start_date: parse_date_input(&self.start_date).ok().flatten(),
            end_date: parse_date_input(&self.end_date).ok().flatten(),
        }
    }
}

/// Text inputs of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Subtitle,
    Description,
    Badge,
    Link,
    ButtonText,
    Order,
    StartDate,
    EndDate,
}

impl DraftField {
    pub fn key(&self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Subtitle => "subtitle",
            DraftField::Description => "description",
            DraftField::Badge => "badge",
            DraftField::Link => "link",
            DraftField::ButtonText => "buttonText",
            DraftField::Order => "order",
            DraftField::StartDate => "startDate",
            DraftField::EndDate => "endDate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Loading,
    LoadFailed(String),
    Idle,
    Validating,
    Submitting,
    Success,
    Failure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

pub struct BannerForm {
    mode: FormMode,
    state: FormState,
    draft: BannerDraft,
    errors: FieldErrors,
    notification: Option<String>,
    api: Arc<dyn BannerApi>,
    image_host: Arc<dyn ImageHost>,
    ledger: UploadLedger,
}

impl BannerForm {
    /// Empty form for a new banner
    pub fn create(
        api: Arc<dyn BannerApi>,
        image_host: Arc<dyn ImageHost>,
        ledger: UploadLedger,
    ) -> Self {
        Self {
            mode: FormMode::Create,
            state: FormState::Idle,
            draft: BannerDraft::default(),
            errors: FieldErrors::new(),
            notification: None,
            api,
            image_host,
            ledger,
        }
    }

    /// Form for an existing banner; call [`BannerForm::load`] before editing
    pub fn edit(
        id: Uuid,
        api: Arc<dyn BannerApi>,
        image_host: Arc<dyn ImageHost>,
        ledger: UploadLedger,
    ) -> Self {
        Self {
            mode: FormMode::Edit(id),
            state: FormState::Loading,
            ..Self::create(api, image_host, ledger)
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn draft(&self) -> &BannerDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    /// Fetch the banner being edited. Returns a redirect when it cannot be loaded.
    pub async fn load(&mut self) -> Option<Navigation> {
        let FormMode::Edit(id) = self.mode else {
            return None;
        };

        self.state = FormState::Loading;
        match self.api.get_banner(id).await {
            Ok(banner) => {
                self.draft = BannerDraft::from_banner(&banner);
                self.state = FormState::Idle;
                None
            }
            Err(e) => {
                error!("Failed to load banner {}: {}", id, e);
                let message = format!("Failed to load banner: {}", e);
                self.notification = Some(message.clone());
                self.state = FormState::LoadFailed(message);
                Some(Navigation::BannerList)
            }
        }
    }

    pub fn set_text(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            DraftField::Title => &mut self.draft.title,
            DraftField::Subtitle => &mut self.draft.subtitle,
            DraftField::Description => &mut self.draft.description,
            DraftField::Badge => &mut self.draft.badge,
            DraftField::Link => &mut self.draft.link,
            DraftField::ButtonText => &mut self.draft.button_text,
            DraftField::Order => &mut self.draft.order,
            DraftField::StartDate => &mut self.draft.start_date,
            DraftField::EndDate => &mut self.draft.end_date,
        };
        *slot = value;
        self.errors.remove(field.key());
    }

    /// Replace the feature bullets; blank entries are dropped on submit
    pub fn set_features<I, S>(&mut self, features: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.draft.features = features.into_iter().map(Into::into).collect();
        self.errors.remove("features");
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.draft.is_active = is_active;
    }

    pub fn set_image_url(&mut self, url: impl Into<String>) {
        self.draft.image = Some(ImageSource::Url(url.into()));
        self.errors.remove("image");
    }

    /// Attach a local file; it replaces any hosted image and is uploaded on submit
    pub fn select_file(&mut self, image: LocalImage) {
        self.draft.image = Some(ImageSource::Pending(image));
        self.errors.remove("image");
    }

    /// What the image preview should show
    pub fn preview(&self) -> Option<String> {
        match &self.draft.image {
            Some(ImageSource::Url(url)) => Some(url.clone()),
            Some(ImageSource::Pending(image)) => Some(image.preview_url()),
            None => None,
        }
    }

    pub fn cancel(&self) -> Navigation {
        Navigation::BannerList
    }

    pub async fn submit(&mut self) -> Result<Navigation, ClientError> {
        if matches!(self.state, FormState::Loading | FormState::LoadFailed(_)) {
            return Err(ClientError::NotFound(
                "Banner has not been loaded".to_string(),
            ));
        }

        self.state = FormState::Validating;
        self.notification = None;
        if let Err(errors) = self.draft.validate() {
            self.errors = errors.clone();
            self.state = FormState::Idle;
            return Err(ClientError::Validation(errors));
        }
        self.errors = FieldErrors::new();

        self.state = FormState::Submitting;
        match self.persist().await {
            Ok(banner) => {
                info!("Banner saved: id={}, title={:?}", banner.id, banner.title);
                self.notification = Some(match self.mode {
                    FormMode::Create => "Banner created successfully".to_string(),
                    FormMode::Edit(_) => "Banner updated successfully".to_string(),
                });
                self.state = FormState::Success;
                Ok(Navigation::BannerList)
            }
            Err(e) => {
                warn!("Banner submission failed: {}", e);
                self.notification = Some(e.to_string());
                self.state = FormState::Failure(e.to_string());
                Err(e)
            }
        }
    }

    /// Upload a pending file if any, then create or update the banner
    async fn persist(&mut self) -> Result<BannerResponseDto, ClientError> {
        let image_url = match self.draft.image.clone() {
            Some(ImageSource::Url(url)) => url.trim().to_string(),
            Some(ImageSource::Pending(file)) => {
                let uploaded = self.image_host.upload(&file).await?;
                self.ledger.record(&file.file_name, &uploaded);
                // a retry after a failed save reuses this URL
                self.draft.image = Some(ImageSource::Url(uploaded.secure_url.clone()));
                uploaded.secure_url
            }
            None => {
                let mut errors = FieldErrors::new();
                errors.insert("image", "Image is required");
                return Err(ClientError::Validation(errors));
            }
        };

        let request = self.draft.to_request(image_url.clone());
        let banner = match self.mode {
            FormMode::Create => self.api.create_banner(&request).await?,
            FormMode::Edit(id) => self.api.update_banner(id, &request).await?,
        };

        self.ledger.settle(&image_url);
        Ok(banner)
    }
}
