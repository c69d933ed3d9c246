/// Point-in-time view of an engine's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub processed: usize,
    pub errors: usize,
    /// Duration of the most recent successful evaluation, microseconds.
    pub last_duration_us: i64,
}

/// Per-engine evaluation counters. Engines are single-context objects, so
/// plain fields suffice; no interior locking.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    processed: usize,
    errors: usize,
    last_duration_us: i64,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_processed(&mut self, duration_us: i64) {
        self.processed += 1;
        self.last_duration_us = duration_us;
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            processed: self.processed,
            errors: self.errors,
            last_duration_us: self.last_duration_us,
        }
    }
}
