pub mod auth;
pub mod metrics;

pub use auth::{admin_auth_middleware, user_auth_middleware, TokenClaims};
pub use metrics::{track_requests, Metrics};
