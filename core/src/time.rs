//! Monotonic time capability injected into the engine.
//!
//! The capture runtime owns the clock; the engine only borrows it. The
//! reference must outlive the engine, which the borrow checker enforces.

use std::time::Instant;

/// Monotonic clock read synchronously during evaluation.
///
/// Implementations must be fast and non-blocking; `evaluate` calls this on
/// its hot path to stamp per-frame telemetry.
pub trait UptimeSource {
    /// Monotonic uptime in microseconds.
    fn uptime_us(&self) -> i64;
}

/// Process-clock implementation backed by `std::time::Instant`.
pub struct StdUptime {
    origin: Instant,
}

impl StdUptime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdUptime {
    fn default() -> Self {
        Self::new()
    }
}

impl UptimeSource for StdUptime {
    fn uptime_us(&self) -> i64 {
        self.origin.elapsed().as_micros() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_uptime_is_monotonic() {
        let clock = StdUptime::new();
        let first = clock.uptime_us();
        let second = clock.uptime_us();
        assert!(second >= first);
    }
}
