use embedview_core::Clock;
use std::cell::Cell;

/// A clock that only moves when the test says so.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jumps to `uptime_millis`. Going backwards is allowed so tests can
    /// replay fixed timestamps.
    pub fn set(&self, uptime_millis: u64) {
        self.now.set(uptime_millis);
    }

    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get() + millis);
    }
}

impl Clock for ManualClock {
    fn uptime_millis(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_only_when_told() {
        let clock = ManualClock::new(5);
        assert_eq!(clock.uptime_millis(), 5);
        clock.advance(10);
        assert_eq!(clock.uptime_millis(), 15);
        clock.set(2);
        assert_eq!(clock.uptime_millis(), 2);
    }
}
