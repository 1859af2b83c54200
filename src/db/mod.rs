use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::orders;

pub mod migrator;
pub mod repositories;

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

        if db_url.starts_with("sqlite:") && !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

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

    fn order_repo(&self) -> repositories::order::OrderRepository {
        repositories::order::OrderRepository::new(self.conn.clone())
    }

    pub async fn username_or_email_taken(&self, username: &str, email: &str) -> Result<bool> {
        self.user_repo()
            .username_or_email_taken(username, email)
            .await
    }

    pub async fn create_user(&self, username: &str, email: &str, password: &str) -> Result<User> {
        self.user_repo().create(username, email, password).await
    }

    pub async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<crate::entities::users::Model>> {
        self.user_repo().find_by_username(username).await
    }

    pub async fn verify_password(&self, password_hash: &str, password: &str) -> Result<bool> {
        self.user_repo()
            .verify_password(password_hash, password)
            .await
    }

    pub async fn create_order(
        &self,
        user_id: i32,
        quantity: i32,
        pizza_size: &str,
    ) -> Result<orders::Model> {
        self.order_repo().create(user_id, quantity, pizza_size).await
    }

    pub async fn get_order(&self, id: i32) -> Result<Option<orders::Model>> {
        self.order_repo().get(id).await
    }

    pub async fn update_order_status(
        &self,
        id: i32,
        status: orders::OrderStatus,
    ) -> Result<Option<orders::Model>> {
        self.order_repo().update_status(id, status).await
    }

    pub async fn list_all_orders(&self) -> Result<Vec<orders::Model>> {
        self.order_repo().list_all().await
    }

    pub async fn list_orders_for_user(&self, user_id: i32) -> Result<Vec<orders::Model>> {
        self.order_repo().list_for_user(user_id).await
    }

    pub async fn delete_order(&self, id: i32) -> Result<bool> {
        self.order_repo().delete(id).await
    }
}
