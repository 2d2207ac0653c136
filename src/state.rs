use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::database::{SqliteTodoRepository, SqliteUserRepository, TodoStore, UserStore};
use crate::middleware::RateLimiter;

/// Shared handler state. Cloned per request; everything inside is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: SqlitePool,
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
    pub auth_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Wire the SQLite repositories and the auth rate limiter from config
    pub fn new(config: AppConfig, pool: SqlitePool) -> Self {
        let users = Arc::new(SqliteUserRepository::new(pool.clone()));
        let todos = Arc::new(SqliteTodoRepository::new(pool.clone()));
        Self::with_stores(config, pool, users, todos)
    }

    pub fn with_stores(
        config: AppConfig,
        pool: SqlitePool,
        users: Arc<dyn UserStore>,
        todos: Arc<dyn TodoStore>,
    ) -> Self {
        let auth_limiter = Arc::new(RateLimiter::new(
            config.api.rate_limit_requests,
            Duration::from_secs(config.api.rate_limit_window_secs),
        ));

        Self {
            config: Arc::new(config),
            pool,
            users,
            todos,
            auth_limiter,
        }
    }
}
