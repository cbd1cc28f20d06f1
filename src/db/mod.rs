use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::{Role, UserId};
use crate::entities::{image_history, search_history};

pub mod migrator;
pub mod repositories;

pub use repositories::history::CleanupCounts;
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Each pooled connection to an in-memory database would otherwise see its own copy
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn search_repo(&self) -> repositories::history::SearchHistoryRepository {
        repositories::history::SearchHistoryRepository::new(self.conn.clone())
    }

    fn image_repo(&self) -> repositories::history::ImageHistoryRepository {
        repositories::history::ImageHistoryRepository::new(self.conn.clone())
    }

    // Users

    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        role: Role,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo()
            .create(email, password, role, security)
            .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn rotate_access_token(&self, id: UserId) -> Result<User> {
        self.user_repo().rotate_access_token(id).await
    }

    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        self.user_repo().get_by_token(token).await
    }

    // Search history

    pub async fn add_search_entry(
        &self,
        user_id: UserId,
        query: &str,
        results_json: &str,
    ) -> Result<search_history::Model> {
        self.search_repo()
            .insert(user_id, query, results_json, Utc::now())
            .await
    }

    pub async fn add_search_entry_at(
        &self,
        user_id: UserId,
        query: &str,
        results_json: &str,
        created_at: DateTime<Utc>,
    ) -> Result<search_history::Model> {
        self.search_repo()
            .insert(user_id, query, results_json, created_at)
            .await
    }

    pub async fn list_search_entries(
        &self,
        user_id: UserId,
        filter: Option<&str>,
    ) -> Result<Vec<search_history::Model>> {
        self.search_repo().list_for_user(user_id, filter).await
    }

    pub async fn get_search_entry(
        &self,
        id: i32,
        user_id: UserId,
    ) -> Result<Option<search_history::Model>> {
        self.search_repo().get(id, user_id).await
    }

    pub async fn delete_search_entry(&self, id: i32, user_id: UserId) -> Result<bool> {
        self.search_repo().delete(id, user_id).await
    }

    // Image history

    pub async fn add_image_entry(
        &self,
        user_id: UserId,
        prompt: &str,
        image_url: Option<&str>,
        meta_json: &str,
    ) -> Result<image_history::Model> {
        self.image_repo()
            .insert(user_id, prompt, image_url, meta_json, Utc::now())
            .await
    }

    pub async fn add_image_entry_at(
        &self,
        user_id: UserId,
        prompt: &str,
        image_url: Option<&str>,
        meta_json: &str,
        created_at: DateTime<Utc>,
    ) -> Result<image_history::Model> {
        self.image_repo()
            .insert(user_id, prompt, image_url, meta_json, created_at)
            .await
    }

    pub async fn list_image_entries(
        &self,
        user_id: UserId,
        filter: Option<&str>,
    ) -> Result<Vec<image_history::Model>> {
        self.image_repo().list_for_user(user_id, filter).await
    }

    pub async fn get_image_entry(
        &self,
        id: i32,
        user_id: UserId,
    ) -> Result<Option<image_history::Model>> {
        self.image_repo().get(id, user_id).await
    }

    pub async fn delete_image_entry(&self, id: i32, user_id: UserId) -> Result<bool> {
        self.image_repo().delete(id, user_id).await
    }

    /// Removes every untitled entry of both kinds owned by `user_id`.
    pub async fn delete_empty_entries(&self, user_id: UserId) -> Result<CleanupCounts> {
        let search = self.search_repo().delete_empty(user_id).await?;
        let image = self.image_repo().delete_empty(user_id).await?;
        Ok(CleanupCounts { search, image })
    }
}
