//! Authentication test helpers
//!
//! Builds an `AppState` over the in-memory user store and creates users
//! directly through the store, bypassing HTTP.

use std::sync::Arc;

use scrapyflow::backend::auth::{InMemoryUserStore, NewUser, User, UserStore};
use scrapyflow::backend::server::AppState;
use scrapyflow::shared::AppConfig;

pub const TEST_PASSWORD: &str = "test_password_123";

/// Test user credentials
pub struct TestUser {
    pub user: User,
    pub password: String,
    pub token: String,
}

/// Config with a fixed secret and the cheapest bcrypt cost
pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .app_name("ScrapyFlow Test")
        .secret_key("integration-test-secret")
        .bcrypt_cost(4)
        .build()
        .expect("test config is valid")
}

/// State over a fresh in-memory store; the store is returned for direct access
pub fn test_state() -> (AppState, Arc<InMemoryUserStore>) {
    let store = Arc::new(InMemoryUserStore::new());
    (AppState::new(test_config(), store.clone()), store)
}

/// Create a user in the store and sign a token for it
pub async fn create_test_user(state: &AppState, email: &str) -> TestUser {
    let hashed_password = bcrypt::hash(TEST_PASSWORD, 4).expect("bcrypt hash");
    let user = state
        .authenticator
        .users()
        .create_user(NewUser {
            email: email.to_string(),
            full_name: email.split('@').next().unwrap_or_default().to_string(),
            hashed_password,
        })
        .await
        .expect("create test user");
    let token = state
        .authenticator
        .keys()
        .create_token(user.id)
        .expect("sign test token");

    TestUser {
        user,
        password: TEST_PASSWORD.to_string(),
        token,
    }
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
