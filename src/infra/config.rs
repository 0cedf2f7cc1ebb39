//! Centralized configuration (environment variables + defaults).

use crate::app::ServiceSettings;
use crate::crypto::password::DEFAULT_COST;
use anyhow::{anyhow, bail, Context};
use chrono::Duration;
use std::fmt::Display;
use std::str::FromStr;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 7 * 24;
const DEFAULT_FRONTEND_ORIGINS: &str =
    "http://localhost:3000,http://localhost:5173,http://localhost:5175";
const MIN_JWT_SECRET_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected 'text' or 'json', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender address; `SMTP_FROM`, falling back to `SMTP_USER`.
    pub from: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub frontend_origins: Vec<String>,
    pub smtp: SmtpSettings,
    pub catering_inbox: Option<String>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up `.env`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| var(key).ok_or_else(|| anyhow!("{} must be set", key));

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            bail!("JWT_SECRET must be at least {} bytes", MIN_JWT_SECRET_LEN);
        }

        let bcrypt_cost: u32 = parse_or(var("BCRYPT_COST"), "BCRYPT_COST", DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31, got {}", bcrypt_cost);
        }

        let ttl_hours: i64 = parse_or(
            var("TOKEN_TTL_HOURS"),
            "TOKEN_TTL_HOURS",
            DEFAULT_TOKEN_TTL_HOURS,
        )?;
        if ttl_hours <= 0 {
            bail!("TOKEN_TTL_HOURS must be positive");
        }

        let frontend_origins: Vec<String> = var("FRONTEND_URL")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();
        // Credentialed CORS needs explicit origins.
        if frontend_origins.iter().any(|o| o.contains('*')) {
            bail!("FRONTEND_URL must list explicit origins; '*' is not allowed with credentials");
        }

        let smtp_user = var("SMTP_USER");
        let smtp_from = var("SMTP_FROM").or_else(|| smtp_user.clone());
        let smtp = SmtpSettings {
            host: var("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
            port: parse_or(var("SMTP_PORT"), "SMTP_PORT", 587)?,
            username: smtp_user,
            password: var("SMTP_PASS"),
            from: smtp_from.clone(),
        };

        Ok(Self {
            port: parse_or(var("PORT"), "PORT", DEFAULT_PORT)?,
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(
                var("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            jwt_secret,
            token_ttl: Duration::hours(ttl_hours),
            bcrypt_cost,
            frontend_origins,
            smtp,
            catering_inbox: var("CATERING_INBOX").or(smtp_from),
            log_format: parse_or(var("LOG_FORMAT"), "LOG_FORMAT", LogFormat::Text)?,
        })
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            bcrypt_cost: self.bcrypt_cost,
            catering_inbox: self.catering_inbox.clone(),
        }
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("invalid {} value '{}'", key, raw)),
    }
}
