// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{extract::State, Json};

use crate::auth::{hash_password, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::middleware::ValidatedJson;
use crate::state::AppState;
use crate::types::{AuthResponse, LoginRequest};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// POST /api/auth/login - Authenticate user and receive JWT token
///
/// Unknown email and wrong password produce the same 401 after the same
/// amount of bcrypt work, so neither the body nor the timing reveals which
/// emails are registered.
pub async fn login_post(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let Some(user) = state.users.find_by_email(&payload.email).await? else {
        // one bcrypt round at the configured cost, same work as a real check
        hash_password(payload.password, state.config.security.password_hash_cost).await?;
        tracing::warn!("Login failed: unknown account");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(payload.password, user.password_hash.clone()).await? {
        tracing::warn!("Login failed: bad password for user {}", user.id);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let response = super::auth_response(&state.config, &user, "Login successful")?;
    tracing::info!("User {} logged in", user.id);

    Ok(Json(response))
}
