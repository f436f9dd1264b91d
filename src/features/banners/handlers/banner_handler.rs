use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::banners::dtos::{BannerQueryParams, BannerRequestDto, BannerResponseDto};
use crate::features::banners::services::BannerService;
use crate::shared::types::{ApiResponse, Meta};

/// List banners currently shown on the storefront (public)
///
/// Active banners inside their visibility window, ordered by `order` ascending.
#[utoipa::path(
    get,
    path = "/api/banners/public",
    responses(
        (status = 200, description = "Visible banners", body = ApiResponse<Vec<BannerResponseDto>>),
    ),
    tag = "banners"
)]
pub async fn list_public_banners(
    State(service): State<Arc<BannerService>>,
) -> Result<Json<ApiResponse<Vec<BannerResponseDto>>>> {
    let banners = service.list_public().await?;
    Ok(Json(ApiResponse::ok(banners)))
}

/// List all banners with pagination and filters (admin only)
#[utoipa::path(
    get,
    path = "/api/banners",
    params(BannerQueryParams),
    responses(
        (status = 200, description = "Banners retrieved successfully", body = ApiResponse<Vec<BannerResponseDto>>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "banners",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_banners(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<BannerService>>,
    Query(params): Query<BannerQueryParams>,
) -> Result<Json<ApiResponse<Vec<BannerResponseDto>>>> {
    let (banners, total) = service.list(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(banners),
        None,
        Some(Meta {
            total,
            page: params.page(),
            page_size: params.limit(),
        }),
    )))
}

/// Create a banner (admin only)
#[utoipa::path(
    post,
    path = "/api/banners",
    request_body = BannerRequestDto,
    responses(
        (status = 201, description = "Banner created successfully", body = ApiResponse<BannerResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "banners",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_banner(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<BannerService>>,
    AppJson(dto): AppJson<BannerRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<BannerResponseDto>>)> {
    tracing::debug!("Banner create requested by {}", user.user_id);
    let banner = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(banner),
            Some("Banner created successfully".to_string()),
            None,
        )),
    ))
}

/// Get a banner by ID (admin only)
#[utoipa::path(
    get,
    path = "/api/banners/{id}",
    params(
        ("id" = Uuid, Path, description = "Banner ID")
    ),
    responses(
        (status = 200, description = "Banner retrieved successfully", body = ApiResponse<BannerResponseDto>),
        (status = 404, description = "Banner not found"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "banners",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_banner(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<BannerService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BannerResponseDto>>> {
    let banner = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok(banner)))
}

/// Replace a banner's editable fields (admin only)
#[utoipa::path(
    put,
    path = "/api/banners/{id}",
    params(
        ("id" = Uuid, Path, description = "Banner ID")
    ),
    request_body = BannerRequestDto,
    responses(
        (status = 200, description = "Banner updated successfully", body = ApiResponse<BannerResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Banner not found"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "banners",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_banner(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<BannerService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<BannerRequestDto>,
) -> Result<Json<ApiResponse<BannerResponseDto>>> {
    tracing::debug!("Banner {} update requested by {}", id, user.user_id);
    let banner = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(banner),
        Some("Banner updated successfully".to_string()),
        None,
    )))
}

/// Delete a banner (admin only)
#[utoipa::path(
    delete,
    path = "/api/banners/{id}",
    params(
        ("id" = Uuid, Path, description = "Banner ID")
    ),
    responses(
        (status = 200, description = "Banner deleted successfully"),
        (status = 404, description = "Banner not found"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "banners",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_banner(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<BannerService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    tracing::debug!("Banner {} delete requested by {}", id, user.user_id);
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Banner deleted successfully".to_string()),
        None,
    )))
}
