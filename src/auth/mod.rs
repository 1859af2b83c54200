pub mod bearer;
pub mod token;

pub use bearer::{BearerError, extract_bearer_token};
pub use token::{TokenError, TokenService};
