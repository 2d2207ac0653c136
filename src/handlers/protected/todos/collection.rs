// handlers/protected/todos/collection.rs - GET/POST /api/todos handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::database::Todo;
use crate::error::ApiResult;
use crate::middleware::{AuthUser, ValidatedJson};
use crate::state::AppState;
use crate::types::{CreateTodoRequest, TodoFilter};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

/// GET /api/todos?filter=all|active|completed - newest first
pub async fn todos_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Todo>>> {
    let filter = TodoFilter::parse(query.filter.as_deref());
    let todos = state.todos.list(user.user_id, filter).await?;

    tracing::debug!("Listed {} {} todos for user {}", todos.len(), filter.as_str(), user.user_id);
    Ok(Json(todos))
}

/// POST /api/todos - create an active todo owned by the caller
pub async fn todos_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let todo = state.todos.create(user.user_id, &payload.text).await?;

    tracing::debug!("User {} <{}> created todo {}", user.user_id, user.email, todo.id);
    Ok((StatusCode::CREATED, Json(todo)))
}
