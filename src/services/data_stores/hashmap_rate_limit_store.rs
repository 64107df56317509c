use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::domain::{RateLimitStore, RateLimitStoreError, UserId};

/// Fixed-window counter kept in process memory.
pub struct HashmapRateLimitStore {
    max_requests: u32,
    window: Duration,
    windows: HashMap<UserId, (Instant, u32)>,
}

impl HashmapRateLimitStore {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: HashMap::new(),
        }
    }
}

#[async_trait::async_trait]
impl RateLimitStore for HashmapRateLimitStore {
    async fn register_hit(
        &mut self,
        user_id: &UserId,
    ) -> Result<(), RateLimitStoreError> {
        let now = Instant::now();
        let window = self.window;
        // Drop closed windows so the map only holds recently active users.
        self.windows
            .retain(|_, (opened, _)| now.duration_since(*opened) < window);

        let entry = self.windows.entry(user_id.clone()).or_insert((now, 0));

        if entry.1 >= self.max_requests {
            return Err(RateLimitStoreError::LimitExceeded);
        }

        entry.1 += 1;
        Ok(())
    }
}
