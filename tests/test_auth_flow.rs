//! Signup, verification, login and current-user lookup over HTTP.

mod common;

use common::{spawn_app, PASSWORD};
use serde_json::{json, Value};

#[tokio::test]
async fn signup_verify_login_round() {
    let app = spawn_app().await;

    let resp = app
        .post_json(
            "/auth/signup",
            json!({
                "username": "rosa",
                "email": " Rosa@Example.com ",
                "password": PASSWORD,
                "fullName": "Rosa Diaz"
            }),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Check your email for verification code.");
    assert_eq!(body["user"]["email"], "rosa@example.com");
    assert_eq!(body["user"]["fullName"], "Rosa Diaz");
    assert_eq!(body["user"]["verified"], false);
    assert_eq!(body["user"]["account_type"], "user");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body.get("token").is_none());

    // Unverified users cannot log in yet.
    let resp = app
        .post_json("/auth/login", json!({"username": "rosa", "password": PASSWORD}))
        .await;
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid credentials or not verified");

    let code = app.code_for("rosa@example.com").await;
    let resp = app
        .post_json(
            "/auth/verify-email",
            json!({"email": "rosa@example.com", "verificationCode": code}),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Email verified successfully");
    assert_eq!(body["user"]["verified"], true);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let resp = app
        .post_json("/auth/login", json!({"username": "rosa", "password": PASSWORD}))
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Login successful");
    assert!(body["user"]["lastLogin"].is_string());
    let token = body["token"].as_str().unwrap().to_string();

    let resp = app
        .client
        .get(app.url("/auth/user"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["user"]["username"], "rosa");
    assert_eq!(body["user"]["favorites"], json!([]));
}

#[tokio::test]
async fn signup_rejects_bad_input_and_duplicates() {
    let app = spawn_app().await;

    let resp = app
        .post_json(
            "/auth/signup",
            json!({"username": "mo", "email": "mo@example.com", "password": "short"}),
        )
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Valid username, email, and password are required");

    let resp = app
        .post_json(
            "/auth/signup",
            json!({"username": "", "email": "mo@example.com", "password": PASSWORD}),
        )
        .await;
    assert_eq!(resp.status(), 400);

    app.register_verified("mo").await;

    let resp = app
        .post_json(
            "/auth/signup",
            json!({"username": "mo", "email": "other@example.com", "password": PASSWORD}),
        )
        .await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Username already exists");

    let resp = app
        .post_json(
            "/auth/signup",
            json!({"username": "mo2", "email": "MO@example.com", "password": PASSWORD}),
        )
        .await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Email already registered");

    assert_eq!(app.store.user_count().await, 1);
}

#[tokio::test]
async fn malformed_json_is_unprocessable() {
    let app = spawn_app().await;
    let resp = app
        .client
        .post(app.url("/auth/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn login_failures() {
    let app = spawn_app().await;
    app.register_verified("luz").await;

    let resp = app
        .post_json("/auth/login", json!({"username": "luz", "password": ""}))
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Username and password are required");

    let resp = app
        .post_json("/auth/login", json!({"username": "luz", "password": "wrong-pass"}))
        .await;
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid username or password");

    let resp = app
        .post_json("/auth/login", json!({"username": "nobody", "password": PASSWORD}))
        .await;
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid credentials or not verified");
}

#[tokio::test]
async fn verification_code_rules() {
    let app = spawn_app().await;
    app.post_json(
        "/auth/signup",
        json!({"username": "ana", "email": "ana@example.com", "password": PASSWORD}),
    )
    .await;
    let first = app.code_for("ana@example.com").await;

    let wrong = if first == "123456" { "654321" } else { "123456" };
    let resp = app
        .post_json(
            "/auth/verify-email",
            json!({"email": "ana@example.com", "verificationCode": wrong}),
        )
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid verification code or already verified");

    // A resend replaces the code; the new one is accepted, given as a JSON number.
    let resp = app
        .post_json("/auth/resend-verification", json!({"email": "ana@example.com"}))
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Verification code resent.");
    let second = app.code_for("ana@example.com").await;

    // The first code no longer works once a new one is issued.
    if first != second {
        let resp = app
            .post_json(
                "/auth/verify-email",
                json!({"email": "ana@example.com", "verificationCode": first}),
            )
            .await;
        assert_eq!(resp.status(), 400);
    }

    let numeric: u64 = second.parse().unwrap();
    let resp = app
        .post_json(
            "/auth/verify-email",
            json!({"email": "ana@example.com", "verificationCode": numeric}),
        )
        .await;
    assert_eq!(resp.status(), 200);

    // Verifying twice fails the same way as a bad code.
    let resp = app
        .post_json(
            "/auth/verify-email",
            json!({"email": "ana@example.com", "verificationCode": second}),
        )
        .await;
    assert_eq!(resp.status(), 400);

    let resp = app
        .post_json("/auth/resend-verification", json!({"email": "ana@example.com"}))
        .await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "User not found or already verified");
}

#[tokio::test]
async fn current_user_requires_valid_token() {
    let app = spawn_app().await;

    let resp = app.client.get(app.url("/auth/user")).send().await.unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No token provided");

    let resp = app
        .client
        .get(app.url("/auth/user"))
        .bearer_auth("not.a.token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn logout_always_succeeds() {
    let app = spawn_app().await;
    let token = app.register_verified("eli").await;

    for auth in [Some(token.as_str()), None, Some("garbage")] {
        let mut req = app.client.post(app.url("/auth/logout"));
        if let Some(t) = auth {
            req = req.bearer_auth(t);
        }
        let resp = req.send().await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Logged out successfully");
    }
}

#[tokio::test]
async fn signup_reports_mail_failure() {
    let app = spawn_app().await;
    app.mailer.set_failing(true);
    let resp = app
        .post_json(
            "/auth/signup",
            json!({"username": "kai", "email": "kai@example.com", "password": PASSWORD}),
        )
        .await;
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Signup failed");
}
