use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::banners::models::{Banner, BannerFields, BannerFilter};

const BANNER_COLUMNS: &str = r#"
    id, title, subtitle, description, image, badge, link, button_text, features,
    display_order, is_active, start_date, end_date, created_at, updated_at
"#;

/// Persistence boundary for banners
#[async_trait]
pub trait BannerRepository: Send + Sync {
    async fn insert(&self, fields: BannerFields) -> Result<Banner>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Banner>>;

    /// Replace all editable fields; `None` when the id is unknown
    async fn update(&self, id: Uuid, fields: BannerFields) -> Result<Option<Banner>>;

    /// `true` when a row was removed
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Active banners whose window contains `now`, by display order ascending
    async fn list_visible(&self, now: DateTime<Utc>) -> Result<Vec<Banner>>;

    /// Filtered page plus the total count before paging
    async fn list(&self, filter: &BannerFilter) -> Result<(Vec<Banner>, i64)>;
}

/// PostgreSQL-backed banner store
pub struct PgBannerRepository {
    pool: PgPool,
}

impl PgBannerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so search text matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Convert database error to a more specific AppError
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // check_violation (PostgreSQL error code 23514)
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23514")) {
            if db_err.constraint() == Some("banners_window_check") {
                return AppError::validation(
                    "endDate: End date must be after start date".to_string(),
                );
            }
            return AppError::validation(format!("Constraint violated: {}", db_err.message()));
        }
    }

    tracing::error!("Banner query failed: {:?}", e);
    AppError::Database(e)
}

#[async_trait]
impl BannerRepository for PgBannerRepository {
    async fn insert(&self, fields: BannerFields) -> Result<Banner> {
        let query = format!(
            r#"
            INSERT INTO banners (id, title, subtitle, description, image, badge, link, button_text,
                                 features, display_order, is_active, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            BANNER_COLUMNS
        );

        sqlx::query_as::<_, Banner>(&query)
            .bind(Uuid::now_v7())
            .bind(fields.title)
            .bind(fields.subtitle)
            .bind(fields.description)
            .bind(fields.image)
            .bind(fields.badge)
            .bind(fields.link)
            .bind(fields.button_text)
            .bind(fields.features)
            .bind(fields.display_order)
            .bind(fields.is_active)
            .bind(fields.start_date)
            .bind(fields.end_date)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Banner>> {
        let query = format!("SELECT {} FROM banners WHERE id = $1", BANNER_COLUMNS);

        sqlx::query_as::<_, Banner>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn update(&self, id: Uuid, fields: BannerFields) -> Result<Option<Banner>> {
        let query = format!(
            r#"
            UPDATE banners
            SET title = $1,
                subtitle = $2,
                description = $3,
                image = $4,
                badge = $5,
                link = $6,
                button_text = $7,
                features = $8,
                display_order = $9,
                is_active = $10,
                start_date = $11,
                end_date = $12,
                updated_at = NOW()
            WHERE id = $13
            RETURNING {}
            "#,
            BANNER_COLUMNS
        );

        sqlx::query_as::<_, Banner>(&query)
            .bind(fields.title)
            .bind(fields.subtitle)
            .bind(fields.description)
            .bind(fields.image)
            .bind(fields.badge)
            .bind(fields.link)
            .bind(fields.button_text)
            .bind(fields.features)
            .bind(fields.display_order)
            .bind(fields.is_active)
            .bind(fields.start_date)
            .bind(fields.end_date)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM banners WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_visible(&self, now: DateTime<Utc>) -> Result<Vec<Banner>> {
        let query = format!(
            r#"
            SELECT {}
            FROM banners
            WHERE is_active = TRUE
              AND (start_date IS NULL OR start_date <= $1)
              AND (end_date IS NULL OR end_date >= $1)
            ORDER BY display_order ASC, created_at ASC
            "#,
            BANNER_COLUMNS
        );

        sqlx::query_as::<_, Banner>(&query)
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn list(&self, filter: &BannerFilter) -> Result<(Vec<Banner>, i64)> {
        let mut conditions = Vec::new();
        let mut next_param = 1;

        if filter.is_active.is_some() {
            conditions.push(format!("is_active = ${}", next_param));
            next_param += 1;
        }

        let search_pattern = filter
            .search
            .as_ref()
            .map(|s| format!("%{}%", escape_like(s)));
        if search_pattern.is_some() {
            conditions.push(format!(r"title ILIKE ${} ESCAPE '\'", next_param));
            next_param += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Get total count
        let count_query = format!("SELECT COUNT(*) FROM banners {}", where_clause);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(is_active) = filter.is_active {
            count = count.bind(is_active);
        }
        if let Some(ref pattern) = search_pattern {
            count = count.bind(pattern);
        }
        let total = count.fetch_one(&self.pool).await.map_err(handle_db_error)?;

        // Get paginated results
        let query = format!(
            r#"
            SELECT {}
            FROM banners
            {}
            ORDER BY display_order ASC, created_at ASC
            LIMIT ${} OFFSET ${}
            "#,
            BANNER_COLUMNS,
            where_clause,
            next_param,
            next_param + 1
        );

        let mut rows = sqlx::query_as::<_, Banner>(&query);
        if let Some(is_active) = filter.is_active {
            rows = rows.bind(is_active);
        }
        if let Some(ref pattern) = search_pattern {
            rows = rows.bind(pattern);
        }
        let banners = rows
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok((banners, total))
    }
}
