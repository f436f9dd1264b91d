use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::ROLE_ADMIN;

/// Identity attached to a request by the auth middleware
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_role_is_case_insensitive() {
        let user = AuthenticatedUser {
            user_id: "u1".to_string(),
            email: None,
            roles: vec!["Admin".to_string()],
        };
        assert!(user.is_admin());
    }

    #[test]
    fn test_customer_is_not_admin() {
        let user = AuthenticatedUser {
            user_id: "u2".to_string(),
            email: None,
            roles: vec!["customer".to_string()],
        };
        assert!(!user.is_admin());
    }
}
