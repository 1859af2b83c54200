pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, TokenPair, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod order_service;
pub mod order_service_impl;
pub use order_service::{OrderDto, OrderError, OrderService};
pub use order_service_impl::SeaOrmOrderService;
