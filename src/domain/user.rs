//! User account records and their public projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    User,
    Admin,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::User => "user",
            AccountType::Admin => "admin",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(AccountType::User),
            "admin" => Ok(AccountType::Admin),
            other => Err(format!("unknown account type '{}'", other)),
        }
    }
}

/// A full `users` row. Holds secrets; never serialize this directly.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub joined_date: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub verified: bool,
    pub verification_code_hash: Option<String>,
    pub account_type: AccountType,
    pub is_profile_picture: bool,
    pub favorites: Vec<i32>,
}

impl UserAccount {
    /// Name used to greet the user in mail.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            user_id: self.user_id,
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            joined_date: self.joined_date,
            last_login: self.last_login,
            verified: self.verified,
            account_type: self.account_type,
            is_profile_picture: self.is_profile_picture,
            favorites: self.favorites.clone(),
        }
    }
}

/// What clients get to see of a user: no password hash, no verification code.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PublicUser {
    #[serde(rename = "userID")]
    pub user_id: i32,
    pub username: String,
    pub email: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "joinedDate")]
    pub joined_date: DateTime<Utc>,
    #[serde(rename = "lastLogin", skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub verified: bool,
    pub account_type: AccountType,
    #[serde(rename = "isProfilePicture")]
    pub is_profile_picture: bool,
    pub favorites: Vec<i32>,
}

/// Insert payload for a freshly signed-up (unverified) user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub verification_code_hash: String,
    pub joined_date: DateTime<Utc>,
}
