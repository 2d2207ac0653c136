use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Todo, User};
use crate::database::store::{TodoStore, UserStore};
use crate::types::{TodoFilter, UpdateTodoRequest};

const USER_COLUMNS: &str = "id, email, password_hash, created_at";
const TODO_COLUMNS: &str = "id, user_id, text, completed, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError> {
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, created_at) VALUES (?1, ?2, ?3) RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DatabaseError::DuplicateEmail)
            }
            Err(other) => Err(other.into()),
        }
    }
}

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: SqlitePool,
}

impl SqliteTodoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for SqliteTodoRepository {
    async fn list(&self, user_id: i64, filter: TodoFilter) -> Result<Vec<Todo>, DatabaseError> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos
             WHERE user_id = ?1 AND (?2 IS NULL OR completed = ?2)
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .bind(filter.completed())
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    async fn create(&self, user_id: i64, text: &str) -> Result<Todo, DatabaseError> {
        let now = Utc::now();
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (user_id, text, completed, created_at, updated_at)
             VALUES (?1, ?2, 0, ?3, ?3) RETURNING {TODO_COLUMNS}"
        ))
        .bind(user_id)
        .bind(text)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn update(
        &self,
        user_id: i64,
        id: i64,
        patch: &UpdateTodoRequest,
    ) -> Result<Option<Todo>, DatabaseError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos
             SET text = COALESCE(?1, text), completed = COALESCE(?2, completed), updated_at = ?3
             WHERE id = ?4 AND user_id = ?5
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(patch.text.as_deref())
        .bind(patch.completed)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn delete(&self, user_id: i64, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
