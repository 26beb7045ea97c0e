// Clock - time source for recording onsets and playback waits
// A virtual implementation lets tests check timing without real waits

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time source with a blocking wait
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;

    /// Suspend the caller for `duration`
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `Instant` and `thread::sleep`
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Simulated clock: `sleep` advances time instantly
///
/// Clones share the same time, so a test can hold one handle while the
/// components under test hold others.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now_micros: Arc<AtomicU64>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without anyone sleeping
    pub fn advance(&self, duration: Duration) {
        self.now_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn now_ms(&self) -> u64 {
        self.now_micros.load(Ordering::Relaxed) / 1_000
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.now_micros.load(Ordering::Relaxed))
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_clock_starts_at_zero() {
        let clock = VirtualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn test_virtual_sleep_advances() {
        let clock = VirtualClock::new();
        clock.sleep(Duration::from_millis(250));
        clock.advance(Duration::from_millis(10));
        assert_eq!(clock.now_ms(), 260);
    }

    #[test]
    fn test_virtual_clones_share_time() {
        let clock = VirtualClock::new();
        let handle = clock.clone();
        clock.sleep(Duration::from_millis(5));
        assert_eq!(handle.now(), Duration::from_millis(5));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let before = clock.now();
        clock.sleep(Duration::from_millis(2));
        assert!(clock.now() >= before + Duration::from_millis(2));
    }
}
