//! Database test fixtures
//!
//! Tests that need Postgres read `DATABASE_URL` and are skipped when it is
//! unset. Every fixture runs migrations and truncates `users`, and holds a
//! process-wide lock so tests in one binary never see each other's rows.

use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard};

static DATABASE_LOCK: Mutex<()> = Mutex::const_new(());

/// Connect to the test database, or `None` when `DATABASE_URL` is unset
pub async fn create_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    Some(
        PgPool::connect(&database_url)
            .await
            .expect("Failed to create test database pool"),
    )
}

/// Run database migrations for testing
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Remove all rows and reset id sequences, keeping the schema
pub async fn cleanup_test_data(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("TRUNCATE TABLE users RESTART IDENTITY CASCADE")
        .execute(pool)
        .await?;
    Ok(())
}

/// Migrated, empty database held exclusively for one test
pub struct TestDatabase {
    pool: PgPool,
    _guard: MutexGuard<'static, ()>,
}

impl TestDatabase {
    /// `None` when no database is configured; the caller should return early
    pub async fn new() -> Option<Self> {
        let Some(pool) = create_test_pool().await else {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        };
        let guard = DATABASE_LOCK.lock().await;

        run_migrations(&pool).await.expect("Failed to run migrations");
        cleanup_test_data(&pool).await.expect("Failed to clean test data");

        Some(Self { pool, _guard: guard })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
