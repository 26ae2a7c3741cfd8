use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ProbeSettings;
use crate::error::Result;

/// Something that can wait; swapped out in tests
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real time, via tokio's timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Fixed-interval gate: every request after the first waits `interval`.
pub struct RateLimiter {
    interval: Duration,
    sleeper: Arc<dyn Sleeper>,
    primed: bool,
}

impl RateLimiter {
    pub fn new(interval: Duration, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            interval,
            sleeper,
            primed: false,
        }
    }

    /// Limiter for the storefront budget scaled by `settings.niceness`
    pub fn for_settings(settings: &ProbeSettings, sleeper: Arc<dyn Sleeper>) -> Result<Self> {
        Ok(Self::new(settings.request_interval()?, sleeper))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next request may go out.
    pub async fn acquire(&mut self) {
        if self.primed {
            self.sleeper.sleep(self.interval).await;
        } else {
            self.primed = true;
        }
    }
}
