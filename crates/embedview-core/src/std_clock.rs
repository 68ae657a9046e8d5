//! Clock implementation backed by `web_time::Instant`.

use crate::platform::Clock;
use web_time::{Duration, Instant};

/// Uptime clock measured from the moment it was created.
#[derive(Debug, Clone)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Time remaining until `uptime_millis`, zero if it already passed.
    pub fn duration_until(&self, uptime_millis: u64) -> Duration {
        Duration::from_millis(uptime_millis.saturating_sub(self.uptime_millis()))
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn uptime_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_monotonic() {
        let clock = StdClock::new();
        let first = clock.uptime_millis();
        let second = clock.uptime_millis();
        assert!(second >= first);
    }

    #[test]
    fn past_deadline_has_no_wait() {
        let clock = StdClock::new();
        assert_eq!(clock.duration_until(0), Duration::ZERO);
    }
}
