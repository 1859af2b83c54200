use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::entities::orders::OrderStatus;
use crate::services::OrderDto;

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub quantity: i32,
    pub pizza_size: String,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub order_status: OrderStatus,
}

/// GET /orders/
/// Unauthenticated landing route.
pub async fn index() -> Json<ApiResponse<MessageResponse>> {
    Json(ApiResponse::success(MessageResponse {
        message: "Pizzarr order service".to_string(),
    }))
}

/// POST /orders/neworder
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderDto>>), ApiError> {
    let order = state
        .order_service
        .create_order(&user.username, payload.quantity, &payload.pizza_size)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

/// PATCH /orders/update/status/{order_id}
/// Staff only.
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(order_id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<OrderDto>>, ApiError> {
    let order = state
        .order_service
        .update_status(&user.username, order_id, payload.order_status)
        .await?;

    Ok(Json(ApiResponse::success(order)))
}

/// GET /orders/allorders
/// Staff only.
pub async fn list_all(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<OrderDto>>>, ApiError> {
    let orders = state.order_service.list_all(&user.username).await?;

    Ok(Json(ApiResponse::success(orders)))
}

/// GET /orders/myorders
pub async fn list_mine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<OrderDto>>>, ApiError> {
    let orders = state.order_service.list_mine(&user.username).await?;

    Ok(Json(ApiResponse::success(orders)))
}

/// DELETE /orders/deleteorder/{id}
/// Permitted for staff or the order's owner.
pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.order_service.delete_order(&user.username, id).await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Order {id} deleted"),
    })))
}
