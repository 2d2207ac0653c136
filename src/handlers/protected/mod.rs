// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here is mounted behind `jwt_auth_middleware`, which places an
// `AuthUser` in the request extensions before the handler runs.

pub mod todos;

pub use todos::*;
