// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and liveness endpoints. The auth routes are wrapped in
// the rate limiter by the router; nothing here reads an `AuthUser`.

pub mod auth;
pub mod health;

pub use health::{health, not_found, root};
