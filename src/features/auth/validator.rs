use super::model::AuthenticatedUser;
use crate::core::error::AppError;
use crate::shared::constants::ROLE_ADMIN;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Validates HS256 bearer tokens issued by the storefront login flow
pub struct JwtValidator {
    decoding_key: DecodingKey,
    leeway: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Legacy admin flag; older tokens carry it as a bool or the string "true"
    #[serde(rename = "isAdmin", default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<serde_json::Value>,
}

impl Claims {
    fn roles(&self) -> Vec<String> {
        let mut roles: Vec<String> = self.role.iter().map(|r| r.to_lowercase()).collect();

        let flagged_admin = match &self.is_admin {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        };

        if flagged_admin && !roles.iter().any(|r| r == ROLE_ADMIN) {
            roles.push(ROLE_ADMIN.to_string());
        }

        roles
    }
}

impl JwtValidator {
    pub fn new(secret: &str, leeway: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway: leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AppError::Unauthorized(format!("Invalid token: {}", e))
        })?;

        let claims = token_data.claims;
        let roles = claims.roles();

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email,
            roles,
        })
    }
}
