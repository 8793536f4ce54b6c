mod common;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Duration, Utc};
use common::{token_of, TestApp};
use serde_json::json;

#[tokio::test]
async fn registered_user_can_log_in_and_read_profile() {
    let app = TestApp::spawn().await;
    app.register("john", "John").await;

    let login = app.login("john", "secret123").await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["token_type"], "bearer");
    assert_eq!(login.body["userName"], "john");

    let me = app.get("/api/me", &token_of(&login)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["userName"], "john");
    assert_eq!(me.body["email"], "john@example.com");
    assert_eq!(me.body["gender"], "unspecified");
    assert_eq!(me.body["friendsCount"], 0);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = TestApp::spawn().await;
    app.register("john", "John").await;

    let login = app.login("john", "not-the-password").await;
    assert_eq!(login.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        login.body["error"]["message"],
        "The user name or password is incorrect."
    );

    let unknown = app.login("nobody", "secret123").await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registration_rules() {
    let app = TestApp::spawn().await;
    app.register("john", "John").await;

    let register = |username: &str, email: &str, confirm: &str| {
        json!({
            "username": username,
            "name": "Someone",
            "email": email,
            "password": "secret123",
            "confirmPassword": confirm,
        })
    };

    let taken = app
        .request(
            Method::POST,
            "/api/users/Register",
            None,
            Some(register("john", "other@example.com", "secret123")),
        )
        .await;
    assert_eq!(taken.status, StatusCode::BAD_REQUEST);
    assert_eq!(taken.body["error"]["message"], "Username is already taken.");

    let email_taken = app
        .request(
            Method::POST,
            "/api/users/Register",
            None,
            Some(register("johnny", "john@example.com", "secret123")),
        )
        .await;
    assert_eq!(email_taken.status, StatusCode::BAD_REQUEST);

    let mismatch = app
        .request(
            Method::POST,
            "/api/users/Register",
            None,
            Some(register("maryann", "mary@example.com", "different")),
        )
        .await;
    assert_eq!(mismatch.status, StatusCode::BAD_REQUEST);

    let blank = app
        .request(
            Method::POST,
            "/api/users/Register",
            None,
            Some(register("   ", "blank@example.com", "secret123")),
        )
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn short_usernames_are_accepted() {
    let app = TestApp::spawn().await;
    let token = app.register("eve", "Eve").await;

    let me = app.get("/api/me", &token).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["userName"], "eve");
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let app = TestApp::spawn().await;

    let incomplete = app
        .request(
            Method::POST,
            "/api/users/Register",
            None,
            Some(json!({ "username": "john" })),
        )
        .await;
    assert_eq!(incomplete.status, StatusCode::BAD_REQUEST);
    assert!(incomplete.body["error"]["message"].is_string());

    let token = app.register("john", "John").await;
    let wrong_type = app
        .put("/api/me", &token, json!({ "name": 42, "email": "john@example.com" }))
        .await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert!(wrong_type.body["error"]["message"].is_string());
}

async fn session_expiry(app: &TestApp, token: &str) -> DateTime<Utc> {
    sqlx::query_scalar("SELECT expires_at FROM user_sessions WHERE token = $1")
        .bind(token)
        .fetch_one(&app.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn rejected_login_leaves_session_expiry_alone() {
    let app = TestApp::spawn().await;
    let token = app.register("john", "John").await;

    let pinned = Utc::now() + Duration::hours(1);
    sqlx::query("UPDATE user_sessions SET expires_at = $1 WHERE token = $2")
        .bind(pinned)
        .bind(&token)
        .execute(&app.pool)
        .await
        .unwrap();

    let login = app
        .request(
            Method::POST,
            "/api/users/Login",
            Some(&token),
            Some(json!({ "username": "john", "password": "secret123" })),
        )
        .await;
    assert_eq!(login.status, StatusCode::BAD_REQUEST);
    assert_eq!(session_expiry(&app, &token).await, pinned);

    // an authenticated request does slide it
    assert_eq!(app.get("/api/me", &token).await.status, StatusCode::OK);
    assert!(session_expiry(&app, &token).await > pinned);
}

#[tokio::test]
async fn logged_in_user_cannot_register_or_log_in_again() {
    let app = TestApp::spawn().await;
    let token = app.register("john", "John").await;

    let response = app
        .request(
            Method::POST,
            "/api/users/Login",
            Some(&token),
            Some(json!({ "username": "john", "password": "secret123" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["message"], "User is already logged in.");
}

#[tokio::test]
async fn protected_routes_require_a_live_session() {
    let app = TestApp::spawn().await;

    let missing = app.request(Method::GET, "/api/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let bogus = app.get("/api/me", "not-a-real-token").await;
    assert_eq!(bogus.status, StatusCode::UNAUTHORIZED);

    let wall = app.request(Method::GET, "/api/users/john/wall", None, None).await;
    assert_eq!(wall.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_invalidates_the_token() {
    let app = TestApp::spawn().await;
    let token = app.register("john", "John").await;

    let logout = app.request(Method::POST, "/api/users/Logout", Some(&token), None).await;
    assert_eq!(logout.status, StatusCode::OK);

    let me = app.get("/api/me", &token).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    // a fresh login works again
    let login = app.login("john", "secret123").await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn user_details_reflect_relation_to_viewer() {
    let app = TestApp::spawn().await;
    let john = app.register("john", "John").await;
    let mary = app.register("mary", "Mary").await;

    let details = app.get("/api/users/mary", &john).await;
    assert_eq!(details.status, StatusCode::OK);
    assert_eq!(details.body["userName"], "mary");
    assert_eq!(details.body["isFriend"], false);
    assert_eq!(details.body["hasPendingRequest"], false);

    app.send_request(&john, "mary").await;

    // pending in either direction counts
    let seen_by_mary = app.get("/api/users/john/preview", &mary).await;
    assert_eq!(seen_by_mary.status, StatusCode::OK);
    assert_eq!(seen_by_mary.body["hasPendingRequest"], true);
    assert_eq!(seen_by_mary.body["isFriend"], false);

    let missing = app.get("/api/users/nobody", &john).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_can_be_edited() {
    let app = TestApp::spawn().await;
    let john = app.register("john", "John").await;
    app.register("mary", "Mary").await;

    let update = app
        .put(
            "/api/me",
            &john,
            json!({
                "name": "John Smith",
                "email": "smith@example.com",
                "phoneNumber": "555-0100",
                "gender": "male",
            }),
        )
        .await;
    assert_eq!(update.status, StatusCode::OK, "{}", update.body);

    let me = app.get("/api/me", &john).await;
    assert_eq!(me.body["name"], "John Smith");
    assert_eq!(me.body["email"], "smith@example.com");
    assert_eq!(me.body["phoneNumber"], "555-0100");
    assert_eq!(me.body["gender"], "male");

    let stolen_email = app
        .put(
            "/api/me",
            &john,
            json!({ "name": "John", "email": "mary@example.com" }),
        )
        .await;
    assert_eq!(stolen_email.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_profile_image_is_rejected() {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    let app = TestApp::spawn().await;
    let john = app.register("john", "John").await;

    let image = STANDARD.encode(vec![7u8; 129 * 1024]);
    let update = app
        .put(
            "/api/me",
            &john,
            json!({
                "name": "John",
                "email": "john@example.com",
                "profileImageData": image,
            }),
        )
        .await;
    assert_eq!(update.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn password_change_requires_old_password() {
    let app = TestApp::spawn().await;
    let john = app.register("john", "John").await;

    let wrong = app
        .put(
            "/api/me/ChangePassword",
            &john,
            json!({
                "oldPassword": "wrong",
                "newPassword": "brandnew1",
                "confirmPassword": "brandnew1",
            }),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);

    let changed = app
        .put(
            "/api/me/ChangePassword",
            &john,
            json!({
                "oldPassword": "secret123",
                "newPassword": "brandnew1",
                "confirmPassword": "brandnew1",
            }),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK, "{}", changed.body);

    assert_eq!(app.login("john", "secret123").await.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.login("john", "brandnew1").await.status, StatusCode::OK);
}

#[tokio::test]
async fn admin_password_cannot_be_changed() {
    let app = TestApp::spawn().await;
    let admin = app.register("admin", "Administrator").await;

    let response = app
        .put(
            "/api/me/ChangePassword",
            &admin,
            json!({
                "oldPassword": "secret123",
                "newPassword": "brandnew1",
                "confirmPassword": "brandnew1",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
