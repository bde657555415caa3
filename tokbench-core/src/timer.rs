//! Monotonic Timing
//!
//! Thin wrapper over `std::time::Instant`, which is monotonic on every
//! supported platform and has nanosecond resolution on Linux and macOS.

use std::time::{Duration, Instant};

/// Timer for measuring a single iteration
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since `start`
    #[inline(always)]
    pub fn stop(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed time since `start`, in seconds
    #[inline(always)]
    pub fn stop_seconds(&self) -> f64 {
        self.stop().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = timer.stop();

        assert!(elapsed >= Duration::from_millis(5));
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_timer_is_monotonic() {
        let timer = Timer::start();
        let a = timer.stop_seconds();
        let b = timer.stop_seconds();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
