use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::TokenService;
use crate::config::Config;
use crate::services::{SeaOrmAuthService, SeaOrmOrderService};
use crate::state::SharedState;

pub mod auth;
mod error;
mod observability;
mod orders;
mod types;

pub use error::ApiError;
pub use types::*;

use crate::services::{AuthService, OrderService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub auth_service: Arc<dyn AuthService>,

    pub order_service: Arc<dyn OrderService>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.shared.tokens
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let auth_service: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(
        shared.store.clone(),
        shared.tokens.clone(),
    ));
    let order_service: Arc<dyn OrderService> =
        Arc::new(SeaOrmOrderService::new(shared.store.clone()));

    Arc::new(AppState {
        shared,
        auth_service,
        order_service,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(protected_routes)
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/refreshtoken", post(auth::refresh_token))
        .route("/orders/", get(orders::index))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/", get(auth::get_current_user))
        .route("/orders/neworder", post(orders::create_order))
        .route("/orders/update/status/{order_id}", patch(orders::update_status))
        .route("/orders/allorders", get(orders::list_all))
        .route("/orders/myorders", get(orders::list_mine))
        .route("/orders/deleteorder/{id}", delete(orders::delete_order))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
