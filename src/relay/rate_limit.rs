use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces provider requests evenly to stay under a per-second budget.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Option<Duration>,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// `per_second == 0` never waits
    pub fn new(per_second: u32) -> Self {
        let interval = (per_second > 0).then(|| Duration::from_secs(1) / per_second);
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(0)
    }

    /// Wait until the next request may go out
    pub async fn acquire(&self) {
        let Some(interval) = self.interval else {
            return;
        };

        let mut next_slot = self.next_slot.lock().await;
        let now = Instant::now();
        let slot = match *next_slot {
            Some(slot) if slot > now => slot,
            _ => now,
        };
        *next_slot = Some(slot + interval);
        drop(next_slot);

        if slot > now {
            tracing::trace!(wait_ms = (slot - now).as_millis() as u64, "rate limited");
            tokio::time::sleep_until(slot).await;
        }
    }
}
