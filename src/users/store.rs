//! User persistence seam
//!
//! `MockUserStore` is the default and never touches a datastore. `SqlUserStore`
//! is the extension point for real persistence, selected with
//! `USERS_BACKEND=database`.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

use super::models::{NewUser, Profile, User};
use crate::common::config::DatabaseConfig;
use crate::common::{generate_time_id, generate_user_id, migrations, now_rfc3339};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, in a stable order
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;
}

/// Stand-in store: a fixed sample list, and creations that are echoed back
/// without being kept
#[derive(Debug, Default)]
pub struct MockUserStore;

impl MockUserStore {
    fn sample(id: &str, email: &str, full_name: &str) -> User {
        User {
            id: id.to_string(),
            email: email.to_string(),
            full_name: Some(full_name.to_string()),
            created_at: None,
        }
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(vec![
            Self::sample("1", "user1@example.com", "User One"),
            Self::sample("2", "user2@example.com", "User Two"),
        ])
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        Ok(User {
            id: generate_time_id(),
            email: new_user.email,
            full_name: Some(new_user.full_name),
            created_at: Some(now_rfc3339()),
        })
    }
}

/// Profiles persisted in SQLite
pub struct SqlUserStore {
    db: SqlitePool,
}

impl SqlUserStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Open a pool from `config` and make sure the schema exists
    pub async fn connect(database_url: &str, config: &DatabaseConfig) -> Result<Self, StoreError> {
        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .idle_timeout(config.idle_timeout)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(connect_options)
            .await?;

        migrations::run_migrations(&pool).await?;
        info!(max_connections = config.max_connections, "SQL user store connected");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for SqlUserStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let profiles = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, email, full_name, username, avatar_url, website, created_at, updated_at
            FROM profiles
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(profiles.into_iter().map(User::from).collect())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let id = generate_user_id();
        let now = now_rfc3339();

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, email, full_name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, email, full_name, username, avatar_url, website, created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(&new_user.email)
        .bind(&new_user.full_name)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.db)
        .await?;

        Ok(profile.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqlUserStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        migrations::run_migrations(&pool).await.expect("migrations");
        SqlUserStore::new(pool)
    }

    fn new_user(email: &str, name: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            full_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_store_returns_fresh_sample_list() {
        let store = MockUserStore;
        let first = store.list_users().await.unwrap();
        let second = store.list_users().await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(first[0].email, "user1@example.com");
        assert_eq!(first[1].full_name.as_deref(), Some("User Two"));
    }

    #[tokio::test]
    async fn test_mock_store_does_not_persist_creations() {
        let store = MockUserStore;
        let created = store
            .create_user(new_user("c@example.com", "Cee"))
            .await
            .unwrap();

        assert_eq!(created.email, "c@example.com");
        assert!(created.created_at.is_some());
        assert_eq!(store.list_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_sql_store_round_trips_created_profiles() {
        let store = memory_store().await;
        assert!(store.list_users().await.unwrap().is_empty());

        let a = store
            .create_user(new_user("a@example.com", "Ay"))
            .await
            .unwrap();
        let b = store
            .create_user(new_user("b@example.com", "Bee"))
            .await
            .unwrap();

        assert!(a.id.starts_with("U_"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.full_name.as_deref(), Some("Ay"));

        let mut expected = vec![a, b];
        expected.sort_by(|x, y| (&x.created_at, &x.id).cmp(&(&y.created_at, &y.id)));
        assert_eq!(store.list_users().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_sql_store_lists_by_created_at_then_id() {
        let store = memory_store().await;
        let rows = [
            ("U_C", "2024-01-02T00:00:00.000Z"),
            ("U_B", "2024-01-01T00:00:00.000Z"),
            ("U_A", "2024-01-01T00:00:00.000Z"),
        ];
        for (id, created_at) in rows {
            sqlx::query(
                "INSERT INTO profiles (id, email, created_at, updated_at) VALUES (?, ?, ?, ?)",
            )
            .bind(id)
            .bind(format!("{}@example.com", id))
            .bind(created_at)
            .bind(created_at)
            .execute(&store.db)
            .await
            .unwrap();
        }

        let ids: Vec<String> = store
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["U_A", "U_B", "U_C"]);
    }

    #[tokio::test]
    async fn test_sql_store_surfaces_database_errors() {
        let store = memory_store().await;
        sqlx::query("DROP TABLE profiles")
            .execute(&store.db)
            .await
            .unwrap();

        assert!(matches!(
            store.list_users().await,
            Err(StoreError::Database(_))
        ));
    }
}
