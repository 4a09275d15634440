//! JWT access-token generation and validation.
//!
//! Access tokens are HS256-signed JWTs carrying only the user id and expiry.
//! A valid signature is necessary but not sufficient: the guard also requires
//! a matching active row in `auth_tokens`, which is what makes logout stick.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use payhere_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The user's internal database id.
    #[serde(rename = "userID")]
    pub user_id: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Session lifetime in hours (default: 24).
    pub expiry_hours: i64,
}

/// Default session lifetime in hours.
const DEFAULT_EXPIRY_HOURS: i64 = 24;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var            | Required | Default |
    /// |--------------------|----------|---------|
    /// | `JWT_SECRET`       | **yes**  | --      |
    /// | `JWT_EXPIRY_HOURS` | no       | `24`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty, or if
    /// `JWT_EXPIRY_HOURS` is not a positive integer.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let expiry_hours: i64 = std::env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_HOURS.to_string())
            .parse()
            .expect("JWT_EXPIRY_HOURS must be a valid i64");
        assert!(expiry_hours > 0, "JWT_EXPIRY_HOURS must be positive");

        Self {
            secret,
            expiry_hours,
        }
    }
}

/// Sign an HS256 access token for `user_id` expiring at `expires_at`.
pub fn generate_access_token(
    user_id: DbId,
    expires_at: Timestamp,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        user_id,
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify an access token and return its [`Claims`].
///
/// Only HS256 is accepted. A missing or non-integer `userID` claim fails
/// deserialization and is reported as an error like a bad signature.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serde_json::json;

    use super::*;

    /// Helper to build a test config with a known secret.
    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_hours: 24,
        }
    }

    fn sign_raw(claims: &serde_json::Value, algorithm: Algorithm, config: &JwtConfig) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = test_config();
        let expires_at = Utc::now() + Duration::hours(1);
        let token = generate_access_token(42, expires_at, &config)
            .expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_claims_use_user_id_key() {
        let claims = Claims {
            user_id: 7,
            exp: 1_700_000_000,
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value, json!({ "userID": 7, "exp": 1_700_000_000 }));
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();
        // Well beyond the default 60-second leeway.
        let expires_at = Utc::now() - Duration::minutes(5);
        let token = generate_access_token(1, expires_at, &config).unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = JwtConfig {
            secret: "secret-alpha".to_string(),
            expiry_hours: 24,
        };
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
            expiry_hours: 24,
        };

        let token =
            generate_access_token(1, Utc::now() + Duration::hours(1), &config_a).unwrap();

        assert!(
            validate_token(&token, &config_b).is_err(),
            "token signed with a different secret must fail"
        );
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let config = test_config();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = sign_raw(&json!({ "userID": 1, "exp": exp }), Algorithm::HS384, &config);

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_missing_or_mistyped_user_id_fails() {
        let config = test_config();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();

        let missing = sign_raw(&json!({ "exp": exp }), Algorithm::HS256, &config);
        assert!(validate_token(&missing, &config).is_err());

        let mistyped = sign_raw(&json!({ "userID": "one", "exp": exp }), Algorithm::HS256, &config);
        assert!(validate_token(&mistyped, &config).is_err());
    }
}
