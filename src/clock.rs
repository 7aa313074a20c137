use std::time::Instant;

// Time source for the rate limiter. Injected at construction so tests can
// advance time manually instead of sleeping through windows.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

// Production clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
pub mod test_clock {
    use super::Clock;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    // Manually advanced clock for deterministic window-expiry tests
    pub struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        pub fn advance(&self, by: Duration) {
            *self.now.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }
}
