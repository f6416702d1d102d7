//! Resettable quiet-period timer for search input

use std::future;
use std::pin::Pin;
use tokio::time::{Duration, Instant, Sleep, sleep};

/// Fires once after `delay` has passed without another [`Debouncer::arm`]
///
/// Each `arm` pushes the deadline out again, so a burst of keystrokes yields
/// a single firing. Dropping the debouncer drops the pending timer with it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    sleep: Pin<Box<Sleep>>,
    armed: bool,
}

impl Debouncer {
    /// Create a disarmed debouncer
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            sleep: Box::pin(sleep(delay)),
            armed: false,
        }
    }

    /// Quiet period
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Start or restart the quiet period
    pub fn arm(&mut self) {
        self.sleep.as_mut().reset(Instant::now() + self.delay);
        self.armed = true;
    }

    /// Drop a pending firing
    pub const fn cancel(&mut self) {
        self.armed = false;
    }

    /// Whether a firing is pending
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Resolve when the pending quiet period ends; never resolves while
    /// disarmed. Cancel-safe.
    pub async fn fired(&mut self) {
        if !self.armed {
            future::pending::<()>().await;
        }

        self.sleep.as_mut().await;
        self.armed = false;
    }
}
