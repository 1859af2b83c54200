use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entities::orders::{self, OrderStatus};
use crate::entities::prelude::*;

pub struct OrderRepository {
    conn: DatabaseConnection,
}

impl OrderRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a new order owned by `user_id`; a failed insert rolls back and
    /// leaves no partial row behind.
    pub async fn create(
        &self,
        user_id: i32,
        quantity: i32,
        pizza_size: &str,
    ) -> Result<orders::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let txn = self.conn.begin().await?;

        let model = orders::ActiveModel {
            quantity: Set(quantity),
            pizza_size: Set(pizza_size.to_string()),
            order_status: Set(OrderStatus::Pending),
            user_id: Set(Some(user_id)),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert order")?;

        txn.commit().await?;

        Ok(model)
    }

    pub async fn get(&self, id: i32) -> Result<Option<orders::Model>> {
        let order = Orders::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query order")?;

        Ok(order)
    }

    /// Sets a new status; returns `None` when the order does not exist.
    pub async fn update_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<Option<orders::Model>> {
        let txn = self.conn.begin().await?;

        let Some(order) = Orders::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let mut active: orders::ActiveModel = order.into();
        active.order_status = Set(status);
        let updated = active
            .update(&txn)
            .await
            .context("Failed to update order status")?;

        txn.commit().await?;

        Ok(Some(updated))
    }

    pub async fn list_all(&self) -> Result<Vec<orders::Model>> {
        let rows = Orders::find()
            .order_by_asc(orders::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list orders")?;

        Ok(rows)
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<orders::Model>> {
        let rows = Orders::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_asc(orders::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list orders for user")?;

        Ok(rows)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Orders::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete order")?;

        Ok(result.rows_affected > 0)
    }
}
