//! Shared test utilities for ticklist integration tests.
//!
//! Each test gets its own on-disk SQLite database inside a temp directory,
//! with migrations applied. The [`TestDb`] handle keeps the directory alive
//! for the duration of the test; dropping it removes the files.

use sqlx::SqlitePool;
use tempfile::TempDir;

use ticklist_db::config::DbConfig;
use ticklist_db::pool;

/// A migrated throwaway database. Holds the temp directory so the file
/// survives until the handle is dropped.
pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

/// Create a temporary database with migrations applied.
pub async fn create_test_db() -> TestDb {
    let dir = TempDir::new().expect("failed to create temp dir");
    let db_path = dir.path().join("ticklist.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = pool::create_pool(&DbConfig::new(url))
        .await
        .expect("failed to open test database");

    pool::run_migrations(&pool)
        .await
        .expect("migrations should succeed");

    TestDb { pool, _dir: dir }
}
