//! `SeaORM` implementation of the `OrderService` trait.

use crate::db::Store;
use crate::entities::orders::OrderStatus;
use crate::entities::users;
use crate::services::order_service::{OrderDto, OrderError, OrderService};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmOrderService {
    store: Store,
}

impl SeaOrmOrderService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn resolve(&self, subject: &str) -> Result<users::Model, OrderError> {
        self.store
            .find_user_by_username(subject)
            .await?
            .ok_or(OrderError::Unauthorized)
    }
}

#[async_trait]
impl OrderService for SeaOrmOrderService {
    async fn create_order(
        &self,
        subject: &str,
        quantity: i32,
        pizza_size: &str,
    ) -> Result<OrderDto, OrderError> {
        if quantity < 1 {
            return Err(OrderError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }
        if pizza_size.is_empty() {
            return Err(OrderError::Validation(
                "Pizza size must not be empty".to_string(),
            ));
        }

        let user = self.resolve(subject).await?;

        let order = self.store.create_order(user.id, quantity, pizza_size).await?;

        info!("Order {} created by {}", order.id, user.username);

        Ok(order.into())
    }

    async fn update_status(
        &self,
        subject: &str,
        order_id: i32,
        new_status: OrderStatus,
    ) -> Result<OrderDto, OrderError> {
        let user = self.resolve(subject).await?;

        if !user.is_staff {
            return Err(OrderError::Forbidden);
        }

        let order = self
            .store
            .update_order_status(order_id, new_status)
            .await?
            .ok_or(OrderError::NotFound)?;

        info!(
            "Order {} status set to {:?} by {}",
            order.id, order.order_status, user.username
        );

        Ok(order.into())
    }

    async fn list_all(&self, subject: &str) -> Result<Vec<OrderDto>, OrderError> {
        let user = self.resolve(subject).await?;

        if !user.is_staff {
            return Err(OrderError::Forbidden);
        }

        let orders = self.store.list_all_orders().await?;
        Ok(orders.into_iter().map(OrderDto::from).collect())
    }

    async fn list_mine(&self, subject: &str) -> Result<Vec<OrderDto>, OrderError> {
        let user = self.resolve(subject).await?;

        let orders = self.store.list_orders_for_user(user.id).await?;
        Ok(orders.into_iter().map(OrderDto::from).collect())
    }

    async fn delete_order(&self, subject: &str, order_id: i32) -> Result<(), OrderError> {
        let user = self.resolve(subject).await?;

        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if !user.is_staff && order.user_id != Some(user.id) {
            return Err(OrderError::Forbidden);
        }

        if !self.store.delete_order(order_id).await? {
            return Err(OrderError::NotFound);
        }

        info!("Order {} deleted by {}", order_id, user.username);

        Ok(())
    }
}
