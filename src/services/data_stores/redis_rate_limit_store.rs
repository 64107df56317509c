use color_eyre::eyre::WrapErr;
use redis::Connection;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{RateLimitStore, RateLimitStoreError, UserId};

pub struct RedisRateLimitStore {
    conn: Arc<RwLock<Connection>>,
    max_requests: u64,
    window_seconds: u64,
}

impl RedisRateLimitStore {
    pub fn new(
        conn: Arc<RwLock<Connection>>,
        max_requests: u64,
        window_seconds: u64,
    ) -> Self {
        Self {
            conn,
            max_requests,
            window_seconds,
        }
    }
}

#[async_trait::async_trait]
impl RateLimitStore for RedisRateLimitStore {
    #[tracing::instrument(name = "Registering hit in Redis rate limiter", skip_all)]
    async fn register_hit(
        &mut self,
        user_id: &UserId,
    ) -> Result<(), RateLimitStoreError> {
        let key = get_key(user_id);
        let mut conn = self.conn.write().await;

        let (hits,): (u64,) = hit_pipeline(&key, self.window_seconds)
            .query(&mut *conn)
            .wrap_err("failed to register rate limit hit in Redis")
            .map_err(RateLimitStoreError::UnexpectedError)?;

        if hits > self.max_requests {
            return Err(RateLimitStoreError::LimitExceeded);
        }
        Ok(())
    }
}

const RATE_LIMIT_KEY_PREFIX: &str = "rate_limit:";

fn get_key(user_id: &UserId) -> String {
    format!("{}{}", RATE_LIMIT_KEY_PREFIX, user_id.as_ref())
}

// Opens the window with its expiry and counts the hit in one MULTI/EXEC, so a
// counter never exists without a TTL.
fn hit_pipeline(key: &str, window_seconds: u64) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .cmd("SET")
        .arg(key)
        .arg(0)
        .arg("EX")
        .arg(window_seconds)
        .arg("NX")
        .ignore()
        .cmd("INCR")
        .arg(key);
    pipe
}
