//! Users API: CRUD REST service for a single `User` entity backed by PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{Config, DbConfig};
pub use error::{AppError, ConfigError, StoreError};
pub use model::{CreateUser, UpdateUser, User, UserFilters};
pub use routes::{app, common_routes, user_routes};
pub use service::UserService;
pub use state::AppState;
pub use store::{connect, MemoryUserStore, PgUserStore, UserStore};
