// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition endpoints that do not require authentication. Both sit
// behind the auth rate limiter and return the same `AuthResponse` shape.

pub mod login;    // POST /api/auth/login - authenticate and get JWT
pub mod register; // POST /api/auth/register - create new account

pub use login::login_post;
pub use register::register_post;

use crate::auth::{generate_jwt, AuthError, Claims};
use crate::config::AppConfig;
use crate::database::User;
use crate::types::AuthResponse;

/// Sign a token for `user` and wrap it with the public user fields
fn auth_response(config: &AppConfig, user: &User, message: &str) -> Result<AuthResponse, AuthError> {
    let claims = Claims::new(user.id, user.email.clone(), config.security.jwt_expiry_hours)?;
    let token = generate_jwt(&claims, &config.security.jwt_secret)?;

    Ok(AuthResponse {
        message: message.to_string(),
        token,
        user: user.to_public(),
    })
}
