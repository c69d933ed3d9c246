use log::{debug, info, warn};

/// Thin wrapper over the `log` facade so stages share one logging surface.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    /// Per-frame detail; kept at debug so the hot path stays quiet by default.
    pub fn trace_frame(&self, message: &str) {
        debug!("{}", message);
    }

    pub fn alert(&self, message: &str) {
        warn!("{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
