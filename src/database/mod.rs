pub mod manager;
pub mod models;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::{Todo, User};
pub use repository::{SqliteTodoRepository, SqliteUserRepository};
pub use store::{TodoStore, UserStore};
