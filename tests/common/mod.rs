//! Shared harness: the full app on an ephemeral port, backed by the in-memory store and a
//! mailer that records instead of sending.

#![allow(dead_code)]

use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;
use taqueria_backend::app::ServiceSettings;
use taqueria_backend::crypto::TokenIssuer;
use taqueria_backend::infra::RecordingMailer;
use taqueria_backend::storage::MemoryStore;
use taqueria_backend::transport;

pub const JWT_SECRET: &[u8] = b"integration-test-secret-0123456789";
pub const CATERING_INBOX: &str = "catering@taqueria.test";
pub const FRONTEND_ORIGIN: &str = "http://localhost:5173";
pub const PASSWORD: &str = "hunter22";

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub store: MemoryStore,
    pub mailer: RecordingMailer,
    pub tokens: TokenIssuer,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn post_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("request failed")
    }

    /// Signs up `username`, reads the code out of the recorded mail, and verifies.
    /// Returns the token issued by verification.
    pub async fn register_verified(&self, username: &str) -> String {
        let email = format!("{}@example.com", username);
        let resp = self
            .post_json(
                "/auth/signup",
                json!({"username": username, "email": email, "password": PASSWORD}),
            )
            .await;
        assert_eq!(resp.status(), 201, "signup of {} failed", username);

        let code = self.code_for(&email).await;
        let resp = self
            .post_json(
                "/auth/verify-email",
                json!({"email": email, "verificationCode": code}),
            )
            .await;
        assert_eq!(resp.status(), 200, "verification of {} failed", username);
        let body: Value = resp.json().await.expect("verify body");
        body["token"].as_str().expect("token").to_string()
    }

    /// The most recent verification code mailed to `email`.
    pub async fn code_for(&self, email: &str) -> String {
        let mail = self.mailer.last_to(email).await.expect("no mail recorded");
        extract_code(&mail.html)
    }
}

pub fn extract_code(html: &str) -> String {
    html.split(|c: char| !c.is_ascii_digit())
        .find(|run| run.len() == 6)
        .expect("six digit code in mail")
        .to_string()
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(Some(CATERING_INBOX.to_string())).await
}

pub async fn spawn_app_with(catering_inbox: Option<String>) -> TestApp {
    let store = MemoryStore::with_sample_menu();
    let mailer = RecordingMailer::new();
    let tokens = TokenIssuer::new(JWT_SECRET, Duration::hours(1));

    let app_state = transport::http::AppState::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(mailer.clone()),
        tokens.clone(),
        ServiceSettings {
            bcrypt_cost: 4,
            catering_inbox,
        },
    );
    let app = transport::http::create_app(app_state, &[FRONTEND_ORIGIN.to_string()]);

    // Bind to an ephemeral port to avoid conflicts with a running server.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        store,
        mailer,
        tokens,
    }
}
