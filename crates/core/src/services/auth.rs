//! Bearer-token verification and admin authorization.
//!
//! The platform issues HS256 tokens carrying the user ID and an optional
//! role; this service only verifies them. Admin capability is a membership
//! check against the configured role-ID allowlist, injected into handlers as
//! a value rather than scattered comparisons.

use std::collections::HashSet;

use arbiter_common::{AppError, AppResult, ModerationConfig};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by a platform bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    /// Platform role ID, if any.
    #[serde(default)]
    pub role: Option<String>,
    /// Expiry as a unix timestamp.
    pub exp: usize,
}

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct Actor {
    /// User ID from the token subject.
    pub id: String,
    /// Platform role ID, if any.
    pub role: Option<String>,
}

/// Verifies platform bearer tokens.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    /// Create a verifier for the given shared secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verify a bearer token and return the calling actor.
    pub fn verify(&self, token: &str) -> AppResult<Actor> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::Unauthorized)?;

        Ok(Actor {
            id: data.claims.sub,
            role: data.claims.role,
        })
    }
}

/// Admin capability check backed by the role-ID allowlist.
#[derive(Debug, Clone)]
pub struct AdminPolicy {
    role_ids: HashSet<String>,
}

impl AdminPolicy {
    /// Build the policy from the moderation flags.
    #[must_use]
    pub fn new(config: &ModerationConfig) -> Self {
        Self {
            role_ids: config
                .admin_role_ids
                .iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
        }
    }

    /// Whether the actor holds an allowlisted admin role.
    #[must_use]
    pub fn is_admin(&self, actor: &Actor) -> bool {
        actor
            .role
            .as_ref()
            .is_some_and(|role| self.role_ids.contains(role))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn mint(secret: &str, sub: &str, role: Option<&str>) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            role: role.map(ToString::to_string),
            exp: usize::try_from(chrono::Utc::now().timestamp()).unwrap() + 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let service = AuthService::new("test-secret");
        let token = mint("test-secret", "u1", Some("moderators"));

        let actor = service.verify(&token).unwrap();
        assert_eq!(actor.id, "u1");
        assert_eq!(actor.role.as_deref(), Some("moderators"));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let service = AuthService::new("test-secret");
        let token = mint("other-secret", "u1", None);

        assert!(matches!(
            service.verify(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_verify_garbage_token() {
        let service = AuthService::new("test-secret");

        assert!(matches!(
            service.verify("not.a.token"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_is_admin_allowlist() {
        let config = ModerationConfig {
            admin_role_ids: vec!["moderators".to_string(), "staff".to_string()],
            ..ModerationConfig::default()
        };
        let policy = AdminPolicy::new(&config);

        let admin = Actor {
            id: "a1".to_string(),
            role: Some("staff".to_string()),
        };
        let user = Actor {
            id: "u1".to_string(),
            role: Some("members".to_string()),
        };
        let roleless = Actor {
            id: "u2".to_string(),
            role: None,
        };

        assert!(policy.is_admin(&admin));
        assert!(!policy.is_admin(&user));
        assert!(!policy.is_admin(&roleless));
    }
}
