//! Self-issued session tokens (HS256 JWT).

use crate::domain::user::UserAccount;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token missing")]
    Missing,
    #[error("token malformed")]
    Malformed,
    #[error("token expired")]
    Expired,
    #[error("token signature invalid")]
    Invalid,
}

/// Mints and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user: &UserAccount) -> anyhow::Result<String> {
        self.issue_at(user, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, user: &UserAccount, now: DateTime<Utc>) -> anyhow::Result<String> {
        let claims = Claims {
            user_id: user.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::ImmatureSignature => TokenError::Invalid,
                _ => TokenError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::AccountType;

    fn user() -> UserAccount {
        UserAccount {
            user_id: 42,
            username: "lupita".to_string(),
            email: "lupita@example.com".to_string(),
            password_hash: String::new(),
            full_name: "Lupita".to_string(),
            joined_date: Utc::now(),
            last_login: None,
            verified: true,
            verification_code_hash: None,
            account_type: AccountType::User,
            is_profile_picture: false,
            favorites: vec![],
        }
    }

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(secret.as_bytes(), Duration::days(7))
    }

    #[test]
    fn issued_token_verifies_with_claims() {
        let tokens = issuer("a-test-secret-of-decent-length");
        let token = tokens.issue(&user()).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "lupita");
        assert_eq!(claims.email, "lupita@example.com");
        assert_eq!(claims.exp - claims.iat, Duration::days(7).num_seconds());
    }

    #[test]
    fn claims_use_camel_case_user_id() {
        let claims = Claims {
            user_id: 1,
            username: "u".into(),
            email: "e".into(),
            iat: 0,
            exp: 1,
        };
        let v = serde_json::to_value(&claims).unwrap();
        assert_eq!(v["userId"], 1);
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let token = issuer("first-secret-first-secret").issue(&user()).unwrap();
        assert_eq!(
            issuer("second-secret-second-secret").verify(&token),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = issuer("a-test-secret-of-decent-length");
        let token = tokens
            .issue_at(&user(), Utc::now() - Duration::days(8))
            .unwrap();
        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_and_empty_tokens() {
        let tokens = issuer("a-test-secret-of-decent-length");
        assert_eq!(tokens.verify("not.a.jwt"), Err(TokenError::Malformed));
        assert_eq!(tokens.verify("   "), Err(TokenError::Missing));
    }
}
