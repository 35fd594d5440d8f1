/**
 * Server Resource Loading
 *
 * Turns `AppConfig` into the runtime resources the server needs.
 *
 * # Database
 *
 * With `DATABASE_URL` set, users live in Postgres and migrations run at
 * startup. Without it, or if the database cannot be reached, the server
 * falls back to an in-memory user store and logs a warning; accounts then
 * last only as long as the process.
 */

use std::sync::Arc;

use sqlx::PgPool;

use crate::backend::auth::users::{InMemoryUserStore, PgUserStore, UserStore};
use crate::shared::AppConfig;

pub type DatabaseConfig = Option<PgPool>;

/// Connect to Postgres and run migrations
pub async fn load_database(config: &AppConfig) -> DatabaseConfig {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Database features will be disabled.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(()) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

/// Pick the user store backing authentication
pub async fn load_user_store(config: &AppConfig) -> Arc<dyn UserStore> {
    match load_database(config).await {
        Some(pool) => {
            tracing::info!("Using Postgres user store");
            Arc::new(PgUserStore::new(pool))
        }
        None => {
            tracing::warn!("Using in-memory user store; accounts will not survive a restart");
            Arc::new(InMemoryUserStore::new())
        }
    }
}
