use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::banners::{handlers, services::BannerService};

/// Storefront routes (no authentication required)
pub fn public_routes(service: Arc<BannerService>) -> Router {
    Router::new()
        .route("/api/banners/public", get(handlers::list_public_banners))
        .with_state(service)
}

/// Admin console routes; callers must layer the auth middleware on top
pub fn admin_routes(service: Arc<BannerService>) -> Router {
    Router::new()
        .route(
            "/api/banners",
            get(handlers::list_banners).post(handlers::create_banner),
        )
        .route(
            "/api/banners/{id}",
            get(handlers::get_banner)
                .put(handlers::update_banner)
                .delete(handlers::delete_banner),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::banners::dtos::BannerResponseDto;
    use crate::features::banners::repositories::InMemoryBannerRepository;
    use crate::shared::test_helpers::{with_admin_auth, with_customer_auth};
    use crate::shared::types::ApiResponse;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn service() -> Arc<BannerService> {
        Arc::new(BannerService::new(Arc::new(InMemoryBannerRepository::new())))
    }

    fn admin_server() -> TestServer {
        let service = service();
        let app = Router::new()
            .merge(public_routes(Arc::clone(&service)))
            .merge(with_admin_auth(admin_routes(service)));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch_over_http() {
        let server = admin_server();

        let response = server
            .post("/api/banners")
            .json(&json!({
                "title": "Coca Cola Deal",
                "image": "https://host/img.png",
                "order": 2,
                "isActive": true
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: ApiResponse<BannerResponseDto> = response.json();
        let created = created.data.unwrap();

        let response = server.get(&format!("/api/banners/{}", created.id)).await;
        response.assert_status_ok();
        let fetched: ApiResponse<BannerResponseDto> = response.json();
        let fetched = fetched.data.unwrap();
        assert_eq!(fetched.title, "Coca Cola Deal");
        assert_eq!(fetched.order, 2);
        assert!(fetched.is_active);
    }

    #[tokio::test]
    async fn test_create_validation_error_names_end_date() {
        let server = admin_server();

        let response = server
            .post("/api/banners")
            .json(&json!({
                "title": "Weekend Deal",
                "image": "https://host/img.png",
                "startDate": "2026-05-10",
                "endDate": "2026-05-09"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(
            body["errors"][0],
            "endDate: End date must be after start date"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let server = admin_server();

        let response = server
            .post("/api/banners")
            .content_type("application/json")
            .text("{ not json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_public_listing_is_reachable_without_admin() {
        let service = service();
        let app = Router::new()
            .merge(public_routes(Arc::clone(&service)))
            .merge(with_customer_auth(admin_routes(service)));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/banners/public").await;
        response.assert_status_ok();
        let body: ApiResponse<Vec<BannerResponseDto>> = response.json();
        assert!(body.data.unwrap().is_empty());

        let response = server.get("/api/banners").await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_delete_unknown_banner_is_not_found() {
        let server = admin_server();

        let response = server
            .delete("/api/banners/0192f3a4-0000-7000-8000-000000000000")
            .await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_admin_listing_reports_meta() {
        let server = admin_server();
        for order in [3, 1] {
            server
                .post("/api/banners")
                .json(&json!({
                    "title": format!("Deal {}", order),
                    "image": "https://host/img.png",
                    "order": order
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get("/api/banners?pageSize=1").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["meta"]["pageSize"], 1);
        assert_eq!(body["data"][0]["title"], "Deal 1");
    }

    #[tokio::test]
    async fn test_huge_page_number_returns_empty_page() {
        let server = admin_server();

        let response = server
            .get("/api/banners?page=9223372036854775807&pageSize=100")
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["meta"]["page"], i64::MAX);
    }
}
