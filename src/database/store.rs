use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Todo, User};
use crate::types::{TodoFilter, UpdateTodoRequest};

/// Account persistence used by the auth handlers
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Insert a user. A taken email yields `DatabaseError::DuplicateEmail`.
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError>;
}

/// Todo persistence. Every method is scoped to `user_id`; rows owned by
/// anyone else behave exactly like rows that do not exist.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Newest first
    async fn list(&self, user_id: i64, filter: TodoFilter) -> Result<Vec<Todo>, DatabaseError>;

    async fn create(&self, user_id: i64, text: &str) -> Result<Todo, DatabaseError>;

    /// Apply the present fields of `patch`; `None` when no owned row matches
    async fn update(
        &self,
        user_id: i64,
        id: i64,
        patch: &UpdateTodoRequest,
    ) -> Result<Option<Todo>, DatabaseError>;

    /// `false` when no owned row matches
    async fn delete(&self, user_id: i64, id: i64) -> Result<bool, DatabaseError>;
}
