//! Account lifecycle: signup, email verification, login, current user.
//!
//! Every operation is a short sequence of store reads/writes. Uniqueness of usernames
//! and emails is ultimately enforced by the store, so two racing signups still end with
//! one row and one 409.

use crate::app::error::ServiceError;
use crate::crypto::password::{hash_password_async, verify_password_async};
use crate::crypto::{
    hash_verification_code, verification_code_matches, Claims, TokenError, TokenIssuer,
};
use crate::domain::validation::{normalize_email, password_long_enough};
use crate::domain::verification::generate_code;
use crate::domain::{NewUser, PublicUser};
use crate::infra::mailer::{resend_mail, verification_mail, Mailer};
use crate::storage::{StoreError, UniqueField, UserStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// A verified user together with a freshly minted token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

pub struct AccountService {
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        tokens: TokenIssuer,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            mailer,
            tokens,
            bcrypt_cost,
        }
    }

    pub async fn signup(&self, input: SignupInput) -> Result<PublicUser, ServiceError> {
        let username = input.username.trim().to_string();
        let email = normalize_email(&input.email);
        if username.is_empty() || email.is_empty() || !password_long_enough(&input.password)
        {
            return Err(ServiceError::bad_request(
                "Valid username, email, and password are required",
            ));
        }

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(ServiceError::conflict("Username already exists"));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::conflict("Email already registered"));
        }

        let password_hash = hash_password_async(input.password, self.bcrypt_cost).await?;
        let code = generate_code();

        let new_user = NewUser {
            username,
            email: email.clone(),
            password_hash,
            full_name: input.full_name.unwrap_or_default().trim().to_string(),
            verification_code_hash: hash_verification_code(&email, &code),
            joined_date: Utc::now(),
        };

        let user = match self.users.insert(new_user).await {
            Ok(user) => user,
            Err(StoreError::Conflict(UniqueField::Username)) => {
                return Err(ServiceError::conflict("Username already exists"))
            }
            Err(StoreError::Conflict(UniqueField::Email)) => {
                return Err(ServiceError::conflict("Email already registered"))
            }
            Err(StoreError::Backend(e)) => return Err(ServiceError::failed("Signup failed", e)),
        };
        info!(user_id = user.user_id, username = %user.username, "user signed up");

        self.mailer
            .send(verification_mail(&user.email, user.display_name(), &code))
            .await
            .map_err(|e| ServiceError::failed("Signup failed", e))?;

        Ok(user.to_public())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ServiceError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ServiceError::bad_request("Username and password are required"));
        }

        let mut user = match self.users.find_by_username(username).await? {
            Some(u) if u.verified => u,
            _ => {
                return Err(ServiceError::unauthorized(
                    "Invalid credentials or not verified",
                ))
            }
        };

        if !verify_password_async(password.to_string(), user.password_hash.clone()).await? {
            warn!(user_id = user.user_id, "login with wrong password");
            return Err(ServiceError::unauthorized("Invalid username or password"));
        }

        let now = Utc::now();
        self.users.touch_last_login(user.user_id, now).await?;
        user.last_login = Some(now);

        let token = self.tokens.issue(&user)?;
        info!(user_id = user.user_id, "user logged in");
        Ok(Session {
            user: user.to_public(),
            token,
        })
    }

    pub async fn verify_email(&self, email: &str, code: &str) -> Result<Session, ServiceError> {
        let email = normalize_email(email);
        let invalid = || ServiceError::bad_request("Invalid verification code or already verified");

        let mut user = self
            .users
            .find_unverified_by_email(&email)
            .await?
            .ok_or_else(invalid)?;

        let matches = user
            .verification_code_hash
            .as_deref()
            .map(|stored| verification_code_matches(&email, code, stored))
            .unwrap_or(false);
        if !matches {
            return Err(invalid());
        }

        if !self
            .users
            .mark_verified(user.user_id)
            .await
            .map_err(|e| ServiceError::failed("Failed to verify email", e))?
        {
            // Verified concurrently by another request.
            return Err(invalid());
        }
        user.verified = true;
        user.verification_code_hash = None;

        let token = self.tokens.issue(&user)?;
        info!(user_id = user.user_id, "email verified");
        Ok(Session {
            user: user.to_public(),
            token,
        })
    }

    pub async fn resend_verification(&self, email: &str) -> Result<(), ServiceError> {
        let email = normalize_email(email);
        let user = self
            .users
            .find_unverified_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found or already verified"))?;

        let code = generate_code();
        let updated = self
            .users
            .set_verification_code(user.user_id, &hash_verification_code(&email, &code))
            .await
            .map_err(|e| ServiceError::failed("Failed to update verification code", e))?;
        if !updated {
            return Err(ServiceError::not_found("User not found or already verified"));
        }

        self.mailer
            .send(resend_mail(&user.email, user.display_name(), &code))
            .await
            .map_err(|e| ServiceError::failed("Failed to send verification email", e))?;
        info!(user_id = user.user_id, "verification code resent");
        Ok(())
    }

    /// Resolves the bearer token of `GET /auth/user`.
    pub async fn current_user(&self, token: Option<&str>) -> Result<PublicUser, ServiceError> {
        let token = token.ok_or_else(|| ServiceError::unauthorized("No token provided"))?;
        let claims = self.authenticate(token).map_err(|e| {
            warn!(error = %e, "rejected token on current-user lookup");
            ServiceError::unauthorized("Invalid token")
        })?;

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(|| ServiceError::unauthorized("Invalid token"))?;
        Ok(user.to_public())
    }

    pub fn authenticate(&self, token: &str) -> Result<Claims, TokenError> {
        self.tokens.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::mailer::RecordingMailer;
    use crate::storage::MemoryStore;
    use chrono::Duration;

    fn service() -> (AccountService, MemoryStore, RecordingMailer) {
        let store = MemoryStore::new();
        let mailer = RecordingMailer::new();
        let tokens = TokenIssuer::new(b"unit-test-secret-unit-test", Duration::hours(1));
        let svc = AccountService::new(Arc::new(store.clone()), Arc::new(mailer.clone()), tokens, 4);
        (svc, store, mailer)
    }

    fn input(username: &str, email: &str) -> SignupInput {
        SignupInput {
            username: username.to_string(),
            email: email.to_string(),
            password: "s3cret!".to_string(),
            full_name: Some("  Rosa Diaz ".to_string()),
        }
    }

    fn code_in(html: &str) -> String {
        html.split(|c: char| !c.is_ascii_digit())
            .find(|run| run.len() == 6)
            .expect("six digit code in mail")
            .to_string()
    }

    #[tokio::test]
    async fn signup_stores_only_digests() {
        let (svc, store, mailer) = service();
        let user = svc.signup(input("rosa", " Rosa@Example.com")).await.unwrap();
        assert_eq!(user.email, "rosa@example.com");
        assert_eq!(user.full_name, "Rosa Diaz");
        assert!(!user.verified);

        let code = code_in(&mailer.last_to("rosa@example.com").await.unwrap().html);
        let row = store.find_by_username("rosa").await.unwrap().unwrap();
        assert_ne!(row.password_hash, "s3cret!");
        let stored = row.verification_code_hash.unwrap();
        assert_ne!(stored, code);
        assert!(verification_code_matches("rosa@example.com", &code, &stored));
    }

    #[tokio::test]
    async fn signup_accepts_any_non_blank_email() {
        let (svc, _store, mailer) = service();
        let user = svc.signup(input("chef", "chef@localhost")).await.unwrap();
        assert_eq!(user.email, "chef@localhost");
        assert!(mailer.last_to("chef@localhost").await.is_some());

        let err = svc.signup(input("blank", "   ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn signup_mail_failure_keeps_row_and_reports_failure() {
        let (svc, store, mailer) = service();
        mailer.set_failing(true);
        let err = svc.signup(input("rosa", "rosa@example.com")).await.unwrap_err();
        assert_eq!(err.public_message(), "Signup failed");
        assert_eq!(store.user_count().await, 1);

        mailer.set_failing(false);
        svc.resend_verification("rosa@example.com").await.unwrap();
        assert_eq!(mailer.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn verify_then_login_issues_tokens_for_the_same_user() {
        let (svc, _store, mailer) = service();
        svc.signup(input("rosa", "rosa@example.com")).await.unwrap();
        let code = code_in(&mailer.last_to("rosa@example.com").await.unwrap().html);

        let verified = svc.verify_email("ROSA@example.com", &code).await.unwrap();
        assert!(verified.user.verified);
        let claims = svc.authenticate(&verified.token).unwrap();
        assert_eq!(claims.user_id, verified.user.user_id);

        let again = svc.verify_email("rosa@example.com", &code).await.unwrap_err();
        assert!(matches!(again, ServiceError::BadRequest(_)));

        let session = svc.login("rosa", "s3cret!").await.unwrap();
        assert!(session.user.last_login.is_some());
        let me = svc.current_user(Some(&session.token)).await.unwrap();
        assert_eq!(me.username, "rosa");
    }

    #[tokio::test]
    async fn login_rejections() {
        let (svc, _store, _mailer) = service();
        svc.signup(input("rosa", "rosa@example.com")).await.unwrap();

        let unverified = svc.login("rosa", "s3cret!").await.unwrap_err();
        assert_eq!(unverified.public_message(), "Invalid credentials or not verified");
        let unknown = svc.login("nobody", "s3cret!").await.unwrap_err();
        assert_eq!(unknown.public_message(), "Invalid credentials or not verified");
        let missing = svc.login("", "").await.unwrap_err();
        assert!(matches!(missing, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn current_user_rejections() {
        let (svc, _store, _mailer) = service();
        let none = svc.current_user(None).await.unwrap_err();
        assert_eq!(none.public_message(), "No token provided");
        let bad = svc.current_user(Some("abc.def.ghi")).await.unwrap_err();
        assert_eq!(bad.public_message(), "Invalid token");
    }
}
