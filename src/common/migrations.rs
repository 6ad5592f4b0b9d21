// src/common/migrations.rs
//! Schema management for the SQL-backed user store

use sqlx::SqlitePool;
use tracing::info;

/// Create the tables the SQL user store needs when they are missing
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    create_profile_tables(pool).await?;
    create_indexes(pool).await?;

    info!("✅ Database migration completed successfully!");

    Ok(())
}

async fn create_profile_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY NOT NULL,
            email TEXT NOT NULL,
            full_name TEXT,
            username TEXT UNIQUE,
            avatar_url TEXT,
            website TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_profiles_created_at ON profiles(created_at, id)")
        .execute(pool)
        .await?;

    Ok(())
}
