use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

pub mod password;

/// Claims carried by admin bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin email.
    pub sub: String,
    pub organization_name: String,
    pub organization_id: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(
        sub: String,
        organization_name: String,
        organization_id: String,
        expire_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub,
            organization_name,
            organization_id,
            exp: (now + Duration::minutes(expire_minutes)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token generation error: {0}")]
    Generation(String),

    #[error("signing secret is not configured")]
    MissingSecret,
}

/// Sign a token with the configured secret and algorithm.
pub fn generate_token(security: &SecurityConfig, claims: &Claims) -> Result<String, TokenError> {
    if security.secret_key.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.secret_key.as_bytes());
    let header = Header::new(security.algorithm);

    encode(&header, claims, &encoding_key).map_err(|e| TokenError::Generation(e.to_string()))
}

/// Decode and verify a token. Invalid signature, malformed input and expiry
/// all fold into `None` so callers cannot distinguish the cases.
pub fn verify_token(security: &SecurityConfig, token: &str) -> Option<Claims> {
    if security.secret_key.is_empty() {
        return None;
    }

    let decoding_key = DecodingKey::from_secret(security.secret_key.as_bytes());
    let validation = Validation::new(security.algorithm);

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    fn security() -> SecurityConfig {
        SecurityConfig {
            secret_key: "test-secret".to_string(),
            algorithm: Algorithm::HS256,
            access_token_expire_minutes: 30,
        }
    }

    #[test]
    fn issued_token_round_trips() {
        let security = security();
        let claims = Claims::new(
            "admin@techcorp.com".to_string(),
            "TechCorp".to_string(),
            "d1f2".to_string(),
            security.access_token_expire_minutes,
        );

        let token = generate_token(&security, &claims).unwrap();
        let decoded = verify_token(&security, &token).expect("token should verify");

        assert_eq!(decoded.sub, "admin@techcorp.com");
        assert_eq!(decoded.organization_name, "TechCorp");
        assert_eq!(decoded.organization_id, "d1f2");
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let security = security();
        let claims = Claims::new(
            "admin@techcorp.com".to_string(),
            "TechCorp".to_string(),
            String::new(),
            // Far enough in the past to clear jsonwebtoken's default leeway
            -5,
        );

        let token = generate_token(&security, &claims).unwrap();
        assert!(verify_token(&security, &token).is_none());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let sec = security();
        let claims = Claims::new(
            "admin@techcorp.com".to_string(),
            "TechCorp".to_string(),
            String::new(),
            30,
        );

        let mut token = generate_token(&sec, &claims).unwrap();
        token.push('x');
        assert!(verify_token(&sec, &token).is_none());

        let other = SecurityConfig {
            secret_key: "different-secret".to_string(),
            ..sec.clone()
        };
        let signed_elsewhere = generate_token(&other, &claims).unwrap();
        assert!(verify_token(&sec, &signed_elsewhere).is_none());
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let security = SecurityConfig {
            secret_key: String::new(),
            algorithm: Algorithm::HS256,
            access_token_expire_minutes: 30,
        };
        let claims = Claims::new("a@b.co".to_string(), "A".to_string(), String::new(), 30);
        assert!(matches!(
            generate_token(&security, &claims),
            Err(TokenError::MissingSecret)
        ));
    }
}
