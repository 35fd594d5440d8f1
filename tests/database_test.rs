//! Postgres user store tests
//!
//! Run against `DATABASE_URL`; every test returns early when it is unset.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::database::{run_migrations, TestDatabase};
use common::{auth_header, test_config};
use scrapyflow::backend::auth::handlers::{TokenResponse, UserResponse};
use scrapyflow::backend::auth::{NewUser, PgUserStore, StoreError, UserStore};
use scrapyflow::backend::server::{create_app, AppState};

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        full_name: "Test".to_string(),
        hashed_password: "$2b$04$notarealhash".to_string(),
    }
}

#[tokio::test]
async fn test_migrations_run_successfully() {
    let Some(db) = TestDatabase::new().await else { return };

    // Already applied by the fixture; a second run must be a no-op.
    assert!(run_migrations(db.pool()).await.is_ok());

    let result = sqlx::query("SELECT 1 FROM users LIMIT 1").execute(db.pool()).await;
    assert!(result.is_ok(), "Users table should exist");
}

#[tokio::test]
async fn test_create_and_lookup_user() {
    let Some(db) = TestDatabase::new().await else { return };
    let store = PgUserStore::new(db.pool().clone());

    let created = store.create_user(new_user("ada@example.com")).await.unwrap();
    assert_eq!(created.email, "ada@example.com");
    assert_eq!(created.full_name, "Test");
    assert!(created.is_active);
    assert!(created.updated_at.is_none());

    let by_id = store.get_user_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "ada@example.com");
    assert_eq!(by_id.hashed_password, "$2b$04$notarealhash");
    assert_eq!(by_id.created_at, created.created_at);

    let by_email = store.get_user_by_email("ada@example.com").await.unwrap().unwrap();
    assert_eq!(by_email.id, created.id);

    assert!(store.get_user_by_id(created.id + 100).await.unwrap().is_none());
    assert!(store.get_user_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let Some(db) = TestDatabase::new().await else { return };
    let store = PgUserStore::new(db.pool().clone());

    store.create_user(new_user("dup@example.com")).await.unwrap();
    let result = store.create_user(new_user("dup@example.com")).await;

    assert_matches!(result, Err(StoreError::DuplicateEmail(email)) if email == "dup@example.com");
}

#[tokio::test]
async fn test_first_user_is_admin() {
    let Some(db) = TestDatabase::new().await else { return };
    let store = PgUserStore::new(db.pool().clone());

    let first = store.create_user(new_user("first@example.com")).await.unwrap();
    let second = store.create_user(new_user("second@example.com")).await.unwrap();

    assert!(first.is_admin);
    assert!(!second.is_admin);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_registrations_yield_one_admin() {
    let Some(db) = TestDatabase::new().await else { return };
    let store = PgUserStore::new(db.pool().clone());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.create_user(new_user(&format!("user{i}@example.com"))).await })
        })
        .collect();

    let mut admins = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_admin {
            admins += 1;
        }
    }
    assert_eq!(admins, 1);
}

#[tokio::test]
async fn test_register_login_me_over_postgres() {
    let Some(db) = TestDatabase::new().await else { return };
    let state = AppState::new(test_config(), Arc::new(PgUserStore::new(db.pool().clone())));
    let server = TestServer::new(create_app(state)).unwrap();

    let response = server
        .post("/auth/register")
        .json(&json!({"email": "ada@example.com", "password": "password123"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let registered: UserResponse = response.json();
    assert!(registered.is_admin);

    let response = server
        .post("/auth/login")
        .form(&[("username", "ada@example.com"), ("password", "password123")])
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let token: TokenResponse = response.json();

    let response = server
        .get("/auth/me")
        .add_header(AUTHORIZATION, HeaderValue::from_str(&auth_header(&token.access_token)).unwrap())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let me: UserResponse = response.json();
    assert_eq!(me.id, registered.id);
    assert_eq!(me.email, "ada@example.com");
}
