use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::shared::validation::is_within_window;

/// Database model for banner
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Banner {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image: String,
    pub badge: Option<String>,
    pub link: Option<String>,
    pub button_text: Option<String>,
    pub features: Vec<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Banner {
    /// Active and inside its visibility window at `now`
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && is_within_window(now, self.start_date, self.end_date)
    }
}

/// Validated, normalised field set written on create and update
#[derive(Debug, Clone, PartialEq)]
pub struct BannerFields {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image: String,
    pub badge: Option<String>,
    pub link: Option<String>,
    pub button_text: Option<String>,
    pub features: Vec<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Admin listing filter
#[derive(Debug, Clone, Default)]
pub struct BannerFilter {
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
