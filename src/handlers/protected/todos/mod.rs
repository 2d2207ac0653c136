// handlers/protected/todos - Todo CRUD scoped to the authenticated user
//
// The owner always comes from the verified token (`AuthUser`), never from
// the request body. Rows belonging to someone else answer 404, exactly like
// rows that do not exist.

pub mod collection; // GET/POST /api/todos
pub mod record;     // PATCH/DELETE /api/todos/:id

pub use collection::{todos_get, todos_post};
pub use record::{todo_delete, todo_patch};

use crate::error::{ApiError, ApiResult};
use crate::validation::FieldError;

pub(crate) const TODO_NOT_FOUND: &str = "Todo not found";

/// Path ids must be integers
pub(crate) fn parse_todo_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::validation_error(vec![FieldError::new("id", "Invalid todo ID")]))
}
