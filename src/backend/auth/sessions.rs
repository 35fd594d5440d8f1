/**
 * Session Tokens
 *
 * Bearer tokens are HMAC-signed JWTs carrying the user id in `sub`.
 * Signing secret, algorithm and lifetime come from `AppConfig` and are
 * fixed for the life of the process.
 */

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::backend::auth::identity::UserId;
use crate::shared::config::AppConfig;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User ID, as a decimal string
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp). Zero when the token carries none.
    #[serde(default)]
    pub iat: u64,
}

/// Signing and verification keys for session tokens
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &[u8], algorithm: Algorithm, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            algorithm,
            ttl,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.secret_key.as_bytes(),
            config.algorithm,
            config.access_token_ttl,
        )
    }

    /// Create a token for a user, valid for the configured lifetime
    ///
    /// # Arguments
    /// * `user_id` - User ID
    ///
    /// # Returns
    /// JWT token string
    pub fn create_token(&self, user_id: UserId) -> Result<String, jsonwebtoken::errors::Error> {
        let now = now_secs();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now.saturating_add(self.ttl.as_secs()),
            iat: now,
        };
        self.encode_claims(&claims)
    }

    pub fn encode_claims(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(self.algorithm), claims, &self.encoding)
    }

    /// Verify signature, algorithm and expiry and decode the claims
    ///
    /// Expiry is checked with no leeway.
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(token_data.claims)
    }

    /// Resolve a token to the user id it was issued for
    ///
    /// Every failure (signature, structure, expiry, missing or non-numeric
    /// subject) collapses to `None`.
    pub fn subject(&self, token: &str) -> Option<UserId> {
        let claims = match self.verify_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Token rejected: {:?}", e.kind());
                return None;
            }
        };

        match claims.sub.parse::<UserId>() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::debug!("Token subject is not a user id");
                None
            }
        }
    }
}

pub(crate) fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}
