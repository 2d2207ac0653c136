// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::hash_password;
use crate::error::{ApiError, ApiResult};
use crate::middleware::ValidatedJson;
use crate::state::AppState;
use crate::types::{AuthResponse, RegisterRequest};

/// POST /api/auth/register - Register new user account
///
/// Expected Input:
/// ```json
/// { "email": "a@x.com", "password": "Abcdefg1" }
/// ```
///
/// Responds 201 with `{ message, token, user: { id, email } }`. A taken
/// email, a malformed email or a weak password all yield 400.
pub async fn register_post(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    if state.users.find_by_email(&payload.email).await?.is_some() {
        tracing::info!("Registration rejected: email already registered");
        return Err(ApiError::bad_request("Email already registered"));
    }

    let password_hash = hash_password(payload.password, state.config.security.password_hash_cost).await?;

    // A concurrent registration can still win the race; the unique index
    // turns that into DatabaseError::DuplicateEmail -> 400.
    let user = state.users.create(&payload.email, &password_hash).await?;

    let response = super::auth_response(&state.config, &user, "User registered successfully")?;
    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(response)))
}
