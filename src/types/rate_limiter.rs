use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};

use moka::future::Cache;

use crate::error::Error;

pub const REQUESTS_PER_MINUTE: u32 = 5;

/// Fixed-window attempt counter keyed by client address.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limit: u32,
    hits: Cache<String, Arc<AtomicU32>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        let hits = Cache::builder().time_to_live(window).build();
        Self { limit, hits }
    }

    pub fn per_minute() -> Self {
        Self::new(REQUESTS_PER_MINUTE, Duration::from_secs(60))
    }

    /// Counts one attempt for `key` and fails once the window is full.
    pub async fn check(&self, key: &str) -> Result<(), Error> {
        let counter = self
            .hits
            .get_with_by_ref(key, async { Arc::new(AtomicU32::new(0)) })
            .await;

        if counter.fetch_add(1, Ordering::SeqCst) >= self.limit {
            return Err(Error::RateLimitExceeded);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_per_address() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));

        assert!(limiter.check("203.0.113.7").await.is_ok());
        assert!(limiter.check("203.0.113.7").await.is_ok());
        assert!(matches!(
            limiter.check("203.0.113.7").await,
            Err(Error::RateLimitExceeded)
        ));
        assert!(limiter.check("198.51.100.1").await.is_ok());
    }

    #[tokio::test]
    async fn test_window_expires() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));

        assert!(limiter.check("203.0.113.7").await.is_ok());
        assert!(limiter.check("203.0.113.7").await.is_err());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(limiter.check("203.0.113.7").await.is_ok());
    }
}
