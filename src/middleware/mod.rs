pub mod auth;
pub mod rate_limit;
pub mod validate;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use rate_limit::{rate_limit_middleware, RateDecision, RateLimiter};
pub use validate::ValidatedJson;
