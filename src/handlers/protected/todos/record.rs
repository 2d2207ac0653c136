// handlers/protected/todos/record.rs - PATCH/DELETE /api/todos/:id handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::{parse_todo_id, TODO_NOT_FOUND};
use crate::database::Todo;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{AuthUser, ValidatedJson};
use crate::state::AppState;
use crate::types::{MessageResponse, UpdateTodoRequest};

/// PATCH /api/todos/:id - partial update of `text` and/or `completed`
pub async fn todo_patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UpdateTodoRequest>,
) -> ApiResult<Json<Todo>> {
    let id = parse_todo_id(&id)?;

    let todo = state
        .todos
        .update(user.user_id, id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found(TODO_NOT_FOUND))?;

    tracing::debug!("User {} <{}> updated todo {}", user.user_id, user.email, todo.id);
    Ok(Json(todo))
}

/// DELETE /api/todos/:id
pub async fn todo_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_todo_id(&id)?;

    if !state.todos.delete(user.user_id, id).await? {
        return Err(ApiError::not_found(TODO_NOT_FOUND));
    }

    tracing::debug!("User {} <{}> deleted todo {}", user.user_id, user.email, id);
    Ok(Json(MessageResponse {
        message: "Todo deleted successfully".to_string(),
    }))
}
