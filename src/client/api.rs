use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::error::ClientError;
use super::session::AdminSession;
use crate::features::banners::dtos::{BannerRequestDto, BannerResponseDto};
use crate::shared::types::ApiResponse;

/// Banner endpoints as seen from the admin console and the storefront
#[async_trait]
pub trait BannerApi: Send + Sync {
    async fn list_public_banners(&self) -> Result<Vec<BannerResponseDto>, ClientError>;

    async fn get_banner(&self, id: Uuid) -> Result<BannerResponseDto, ClientError>;

    async fn create_banner(&self, body: &BannerRequestDto)
        -> Result<BannerResponseDto, ClientError>;

    async fn update_banner(
        &self,
        id: Uuid,
        body: &BannerRequestDto,
    ) -> Result<BannerResponseDto, ClientError>;

    async fn delete_banner(&self, id: Uuid) -> Result<(), ClientError>;
}

pub struct HttpBannerApi {
    base_url: String,
    session: AdminSession,
    http_client: reqwest::Client,
}

impl HttpBannerApi {
    pub fn new(base_url: impl Into<String>, session: AdminSession) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>, ClientError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();

        if status.is_success() {
            return response
                .json::<ApiResponse<T>>()
                .await
                .map_err(|e| ClientError::Network(format!("Invalid response body: {}", e)));
        }

        let body = response.json::<ApiResponse<serde_json::Value>>().await.ok();
        let message = error_message(status, body);
        tracing::debug!("Banner API returned {}: {}", status, message);

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(message));
        }
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn error_message(status: StatusCode, body: Option<ApiResponse<serde_json::Value>>) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    };

    match body {
        Some(ApiResponse {
            message,
            errors: Some(errors),
            ..
        }) if !errors.is_empty() => {
            format!("{}: {}", message.unwrap_or_else(fallback), errors.join("; "))
        }
        Some(ApiResponse { message, .. }) => message.unwrap_or_else(fallback),
        None => fallback(),
    }
}

fn into_data<T>(response: ApiResponse<T>) -> Result<T, ClientError> {
    response
        .data
        .ok_or_else(|| ClientError::Network("Response carried no data".to_string()))
}

#[async_trait]
impl BannerApi for HttpBannerApi {
    async fn list_public_banners(&self) -> Result<Vec<BannerResponseDto>, ClientError> {
        let request = self.http_client.get(self.url("/banners/public"));
        into_data(self.send(request).await?)
    }

    async fn get_banner(&self, id: Uuid) -> Result<BannerResponseDto, ClientError> {
        let request = self.http_client.get(self.url(&format!("/banners/{}", id)));
        into_data(self.send(request).await?)
    }

    async fn create_banner(
        &self,
        body: &BannerRequestDto,
    ) -> Result<BannerResponseDto, ClientError> {
        let request = self.http_client.post(self.url("/banners")).json(body);
        into_data(self.send(request).await?)
    }

    async fn update_banner(
        &self,
        id: Uuid,
        body: &BannerRequestDto,
    ) -> Result<BannerResponseDto, ClientError> {
        let request = self
            .http_client
            .put(self.url(&format!("/banners/{}", id)))
            .json(body);
        into_data(self.send(request).await?)
    }

    async fn delete_banner(&self, id: Uuid) -> Result<(), ClientError> {
        let request = self
            .http_client
            .delete(self.url(&format!("/banners/{}", id)));
        self.send::<serde_json::Value>(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::middleware::auth_middleware;
    use crate::features::auth::{Claims, JwtValidator};
    use crate::features::banners::repositories::InMemoryBannerRepository;
    use crate::features::banners::{routes, BannerService};
    use crate::shared::test_helpers::create_admin_user;
    use axum::Router;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use std::sync::Arc;
    use std::time::Duration;

    const SECRET: &str = "client-test-secret-value";

    fn admin_token() -> String {
        let claims = Claims {
            sub: "test-admin-id".to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as u64,
            email: None,
            role: Some("admin".to_string()),
            is_admin: None,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    /// Real banner routes behind the real bearer middleware, on a random port
    async fn spawn_api() -> String {
        let service = Arc::new(BannerService::new(Arc::new(InMemoryBannerRepository::new())));
        let validator = Arc::new(JwtValidator::new(SECRET, Duration::from_secs(0)));

        let app = Router::new()
            .merge(routes::public_routes(Arc::clone(&service)))
            .merge(routes::admin_routes(service).route_layer(
                axum::middleware::from_fn_with_state(validator, auth_middleware),
            ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    fn request(title: &str, order: i32) -> BannerRequestDto {
        BannerRequestDto {
            title: title.to_string(),
            image: "https://res.cloudinary.com/demo/image/upload/deal.png".to_string(),
            order,
            is_active: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_admin_round_trip_over_http() {
        let base_url = spawn_api().await;
        let api = HttpBannerApi::new(base_url, AdminSession::start(admin_token(), create_admin_user()));

        let created = api.create_banner(&request("Coca Cola Deal", 2)).await.unwrap();
        let fetched = api.get_banner(created.id).await.unwrap();
        assert_eq!(fetched, created);

        let updated = api
            .update_banner(created.id, &request("Pepsi Deal", 1))
            .await
            .unwrap();
        assert_eq!(updated.title, "Pepsi Deal");

        let public = api.list_public_banners().await.unwrap();
        assert_eq!(public.len(), 1);

        api.delete_banner(created.id).await.unwrap();
        assert!(matches!(
            api.get_banner(created.id).await,
            Err(ClientError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ended_session_is_unauthorized() {
        let base_url = spawn_api().await;
        let session = AdminSession::start(admin_token(), create_admin_user());
        let api = HttpBannerApi::new(base_url, session.clone());

        session.end();

        match api.create_banner(&request("Coca Cola Deal", 0)).await {
            Err(ClientError::Api { status, .. }) => assert_eq!(status, 401),
            other => panic!("unexpected result: {:?}", other),
        }
        // the public listing needs no credentials
        assert!(api.list_public_banners().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_validation_errors_are_reported() {
        let base_url = spawn_api().await;
        let api = HttpBannerApi::new(base_url, AdminSession::start(admin_token(), create_admin_user()));

        match api.create_banner(&request("  ", 0)).await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert!(message.starts_with("Validation failed: title:"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let api = HttpBannerApi::new("http://127.0.0.1:9/api", AdminSession::anonymous());
        assert!(matches!(
            api.list_public_banners().await,
            Err(ClientError::Network(_))
        ));
    }
}
