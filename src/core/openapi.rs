use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::banners::{dtos as banners_dtos, handlers as banners_handlers};
use crate::features::health;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Banners (public)
        banners_handlers::list_public_banners,
        // Banners (admin)
        banners_handlers::list_banners,
        banners_handlers::create_banner,
        banners_handlers::get_banner,
        banners_handlers::update_banner,
        banners_handlers::delete_banner,
    ),
    components(
        schemas(
            // Shared
            Meta,
            auth::model::AuthenticatedUser,
            // Health
            health::HealthResponseDto,
            // Banners
            banners_dtos::BannerRequestDto,
            banners_dtos::BannerResponseDto,
            banners_dtos::BannerQueryParams,
            ApiResponse<banners_dtos::BannerResponseDto>,
            ApiResponse<Vec<banners_dtos::BannerResponseDto>>,
        )
    ),
    tags(
        (name = "health", description = "Service liveness"),
        (name = "banners", description = "Storefront promotional banners"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "API documentation for the storefront banner service",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_banner_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/api/banners/public"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/banners/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/health"));

        let schemes = doc.components.unwrap().security_schemes;
        assert!(schemes.contains_key("bearer_auth"));
    }
}
