//! Common test utilities for integration tests.
//!
//! These helpers run the full router against a real PostgreSQL database
//! given by `TEST_DATABASE_URL`. Without it the database tests return early.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use domain::models::{Account, AccountRole, NewAccount};
use domain::services::AccountStore;
use gossip_api::{app::create_app, config::Config};
use persistence::repositories::AccountRepository;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "kalamees123";

fn database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL")
        .ok()
        .filter(|url| !url.is_empty())
}

/// Create a test database pool with migrations applied, or `None` when
/// `TEST_DATABASE_URL` is unset.
pub async fn create_test_pool() -> Option<PgPool> {
    let Some(url) = database_url() else {
        eprintln!("TEST_DATABASE_URL not set, skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    persistence::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    Some(pool)
}

/// Test configuration: rate limiting off, database from the environment.
pub fn test_config(database_url: &str) -> Config {
    Config::load_for_test(&[("database.url", database_url)]).expect("Failed to build test config")
}

pub async fn create_test_app() -> Option<(Router, PgPool)> {
    let pool = create_test_pool().await?;
    let url = database_url()?;
    Some((create_app(test_config(&url), pool.clone()), pool))
}

/// A username no other test run uses.
pub fn unique_username() -> String {
    format!("t{}", &uuid::Uuid::new_v4().simple().to_string()[..12])
}

/// Insert an account directly, bypassing invite codes.
pub async fn seed_account(pool: &PgPool, role: AccountRole, cohort: i32) -> Account {
    let username = unique_username();
    AccountRepository::new(pool.clone())
        .create_account(NewAccount {
            display_name: username.clone(),
            username,
            password_hash: shared::password::hash_password(TEST_PASSWORD).unwrap(),
            role,
            cohort,
        })
        .await
        .expect("Failed to seed account")
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Attach a session cookie (`name=value`) to a request.
pub fn with_cookie(mut request: Request<Body>, cookie: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    request
}

/// The `name=value` part of the response's Set-Cookie header.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}

pub async fn parse_response_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

/// Log in and return the session cookie.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            serde_json::json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response).expect("login sets a session cookie")
}
