//! Domain service for pizza orders and the owner/staff access policy.

use serde::Serialize;
use thiserror::Error;

use crate::entities::orders::{self, OrderStatus};

/// Errors specific to order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The authenticated subject no longer resolves to a user.
    #[error("Unauthorized")]
    Unauthorized,

    /// The resolved user lacks permission for this operation.
    #[error("Forbidden")]
    Forbidden,

    #[error("Order not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for OrderError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for OrderError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Order DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDto {
    pub id: i32,
    pub quantity: i32,
    pub pizza_size: String,
    pub order_status: OrderStatus,
    pub user_id: Option<i32>,
    pub created_at: String,
}

impl From<orders::Model> for OrderDto {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            quantity: model.quantity,
            pizza_size: model.pizza_size,
            order_status: model.order_status,
            user_id: model.user_id,
            created_at: model.created_at,
        }
    }
}

/// Domain service trait for orders.
///
/// Every operation takes the authenticated subject (username) and applies
/// the owner/staff policy before touching storage.
#[async_trait::async_trait]
pub trait OrderService: Send + Sync {
    /// Creates an order owned by the subject, with status Pending.
    async fn create_order(
        &self,
        subject: &str,
        quantity: i32,
        pizza_size: &str,
    ) -> Result<OrderDto, OrderError>;

    /// Sets a new status on an order. Staff only.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Forbidden`] for non-staff subjects and
    /// [`OrderError::NotFound`] for unknown order ids.
    async fn update_status(
        &self,
        subject: &str,
        order_id: i32,
        new_status: OrderStatus,
    ) -> Result<OrderDto, OrderError>;

    /// Returns every order in the system. Staff only.
    async fn list_all(&self, subject: &str) -> Result<Vec<OrderDto>, OrderError>;

    /// Returns the orders owned by the subject.
    async fn list_mine(&self, subject: &str) -> Result<Vec<OrderDto>, OrderError>;

    /// Deletes an order. Permitted for staff or the order's owner.
    async fn delete_order(&self, subject: &str, order_id: i32) -> Result<(), OrderError>;
}
