use std::str::FromStr;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use social_network::{app_state::AppState, config::AuthSettings, db, routes::create_routes};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tower::ServiceExt;

pub struct TestApp {
    router: Router,
    pub pool: SqlitePool,
}

pub struct Response {
    pub status: StatusCode,
    pub body: Value,
}

#[allow(dead_code)]
impl TestApp {
    /// Fresh app over its own in-memory database.
    pub async fn spawn() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        // a single connection that never closes keeps the in-memory database alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();

        let state = AppState {
            db_pool: pool.clone(),
            auth: AuthSettings {
                bcrypt_cost: 4,
                ..AuthSettings::default()
            },
        };

        Self {
            router: create_routes(state),
            pool,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        Response { status, body }
    }

    pub async fn get(&self, uri: &str, token: &str) -> Response {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Response {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Response {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Registers `username` with password `secret123` and returns its token.
    pub async fn register(&self, username: &str, name: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/users/Register",
                None,
                Some(json!({
                    "username": username,
                    "name": name,
                    "email": format!("{}@example.com", username),
                    "password": "secret123",
                    "confirmPassword": "secret123",
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        token_of(&response)
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.request(
            Method::POST,
            "/api/users/Login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// `from` sends a request to `to_username`; returns the request id.
    pub async fn send_request(&self, from: &str, to_username: &str) -> i64 {
        let response = self
            .request(
                Method::POST,
                &format!("/api/me/requests/{}", to_username),
                Some(from),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }

    pub async fn resolve_request(&self, token: &str, request_id: i64, status: &str) -> Response {
        self.request(
            Method::PUT,
            &format!("/api/me/requests/{}?status={}", request_id, status),
            Some(token),
            None,
        )
        .await
    }

    /// Makes the two users friends through a request and its approval.
    pub async fn befriend(&self, from: &str, to: &str, to_username: &str) {
        let request_id = self.send_request(from, to_username).await;
        let response = self.resolve_request(to, request_id, "approved").await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    }

    /// Posts on `wall_username`'s wall and returns the new post id.
    pub async fn add_post(&self, token: &str, wall_username: &str, content: &str) -> i64 {
        let response = self
            .post(
                &format!("/api/users/{}/wall", wall_username),
                token,
                json!({ "content": content }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["post"]["id"].as_i64().unwrap()
    }
}

#[allow(dead_code)]
pub fn token_of(response: &Response) -> String {
    response.body["access_token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}
