//! Rate limiting for outbound API calls
//!
//! A [`Throttle`] hands out permits; callers acquire one before every call.
//! How permits are paced is up to the implementation.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Interval, MissedTickBehavior};

/// Acquire-before-call pacing capability
#[async_trait]
pub trait Throttle: Send + Sync {
    /// Wait until one permit is available and consume it
    async fn acquire(&self);
}

/// Throttle that releases one permit per period.
///
/// The first permit is available immediately. Permits do not accumulate while
/// nobody is waiting.
#[derive(Debug)]
pub struct IntervalThrottle {
    period: Duration,
    interval: Mutex<Interval>,
}

impl IntervalThrottle {
    /// Create a throttle releasing one permit every `period`.
    ///
    /// Must be called from within a tokio runtime. Panics if `period` is zero;
    /// use [`Unthrottled`] for no pacing.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            period,
            interval: Mutex::new(interval),
        }
    }

    /// Time between permits
    pub const fn period(&self) -> Duration {
        self.period
    }
}

#[async_trait]
impl Throttle for IntervalThrottle {
    async fn acquire(&self) {
        self.interval.lock().await.tick().await;
    }
}

/// Throttle that never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct Unthrottled;

#[async_trait]
impl Throttle for Unthrottled {
    async fn acquire(&self) {}
}

/// Build a throttle for a period given in milliseconds; 0 disables pacing
pub fn throttle_from_millis(millis: u64) -> Box<dyn Throttle> {
    if millis == 0 {
        Box::new(Unthrottled)
    } else {
        Box::new(IntervalThrottle::new(Duration::from_millis(millis)))
    }
}
