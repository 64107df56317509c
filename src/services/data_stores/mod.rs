mod hashmap_project_store;
mod hashmap_rate_limit_store;
mod hashmap_user_store;
mod postgres_project_store;
mod postgres_user_store;
mod redis_rate_limit_store;

pub use hashmap_project_store::*;
pub use hashmap_rate_limit_store::*;
pub use hashmap_user_store::*;
pub use postgres_project_store::*;
pub use postgres_user_store::*;
pub use redis_rate_limit_store::*;
