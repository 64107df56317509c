use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{EmailClient, ProjectStore, RateLimitStore, UserStore};

pub type UserStoreType = Arc<RwLock<dyn UserStore + Send + Sync>>;
pub type ProjectStoreType = Arc<RwLock<dyn ProjectStore + Send + Sync>>;
pub type RateLimitStoreType = Arc<RwLock<dyn RateLimitStore + Send + Sync>>;
pub type EmailClientType = Arc<dyn EmailClient + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub user_store: UserStoreType,
    pub project_store: ProjectStoreType,
    pub email_client: EmailClientType,
    pub rate_limit_store: RateLimitStoreType,
}

impl AppState {
    pub fn new(
        user_store: UserStoreType,
        project_store: ProjectStoreType,
        email_client: EmailClientType,
        rate_limit_store: RateLimitStoreType,
    ) -> Self {
        Self {
            user_store,
            project_store,
            email_client,
            rate_limit_store,
        }
    }
}
